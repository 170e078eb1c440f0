/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base16384.
 *
 * base16384 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base16384 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base16384. If not, see <https://www.gnu.org/licenses/>.
 */

use core::iter::FusedIterator;

/// Moves items from `iter` into `buf` until either runs out, returning the
/// number of items moved. `iter` is never polled once `buf` is full.
pub fn read_chunk<I: Iterator>(iter: &mut I, buf: &mut [I::Item]) -> usize {
    buf.iter_mut().zip(iter).map(|(slot, item)| *slot = item).count()
}

/// Like [`core::iter::Flatten`], but nameable without closures and able to
/// report how many items of the current sub-iterator are still pending.
pub struct Flatten<I, Sub> {
    iter: I,
    sub: Option<Sub>,
}

impl<I, Sub> Flatten<I, Sub> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            sub: None,
        }
    }

    pub fn inner(&self) -> &I {
        &self.iter
    }
}

impl<I, Sub: Iterator> Flatten<I, Sub> {
    /// Items already produced by the outer iterator but not yet yielded.
    /// Sub-iterators here are always exact-size.
    pub fn pending(&self) -> usize {
        self.sub.as_ref().map_or(0, |sub| sub.size_hint().0)
    }
}

impl<I, Sub: Iterator> Iterator for Flatten<I, Sub>
where
    I: Iterator<Item = Sub>,
{
    type Item = Sub::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sub) = &mut self.sub {
            if let Some(item) = sub.next() {
                return Some(item);
            }
        }
        for mut sub in &mut self.iter {
            if let Some(item) = sub.next() {
                self.sub = Some(sub);
                return Some(item);
            }
        }
        self.sub = None;
        None
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let init = match self.sub {
            Some(sub) => sub.fold(init, &mut f),
            None => init,
        };
        self.iter.fold(init, |b, item| item.fold(b, &mut f))
    }
}

impl<I, Sub: Iterator> FusedIterator for Flatten<I, Sub> where
    I: FusedIterator<Item = Sub>
{
}
