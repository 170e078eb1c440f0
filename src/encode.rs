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

//! Functions and types for encoding base16384 data.

use super::iter::{read_chunk, Flatten};
use super::tail::{self, encode_tail, marker_word, tail_len};
use super::word::pack;
use super::{BYTES_PER_CHUNK, ENCODED_CHUNK_LEN, ENCODE_SLACK};
use super::WORDS_PER_CHUNK;

use core::array;
use core::iter::{Fuse, FusedIterator, Take};
use thiserror::Error;

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// The output buffer given to [`encode`] or [`decode`](crate::decode()) was
/// too small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("output buffer too small: need {required} bytes, got {available}")]
pub struct CapacityError {
    /// Bytes the operation would write.
    pub required: usize,
    /// Length of the buffer that was provided.
    pub available: usize,
}

/// Alias of <code>[Result]\<T, [CapacityError]></code>.
pub type EncodeResult<T> = Result<T, CapacityError>;

/// The exact number of bytes [`encode`] produces for `len` input bytes.
///
/// This is `len / 7 * 8`, plus 4, 6, 8 or 10 bytes (marker included) when
/// `len` isn't a multiple of 7.
pub const fn encoded_len(len: usize) -> usize {
    len / BYTES_PER_CHUNK * ENCODED_CHUNK_LEN
        + tail_len(len % BYTES_PER_CHUNK)
}

/// A generous output size for encoding `len` bytes: [`encoded_len`] plus
/// 24 bytes of slack.
///
/// Any buffer this large is accepted by [`encode`]; only the returned count
/// is meaningful.
pub const fn encode_length(len: usize) -> usize {
    encoded_len(len) + ENCODE_SLACK
}

// `output` must be exactly `encoded_len(input.len())` bytes.
fn encode_exact(input: &[u8], output: &mut [u8]) {
    let chunks = input.chunks_exact(BYTES_PER_CHUNK);
    let rest = chunks.remainder();
    let body_len = chunks.len() * ENCODED_CHUNK_LEN;
    let (body, tail_out) = output.split_at_mut(body_len);

    body.chunks_exact_mut(ENCODED_CHUNK_LEN).zip(chunks).for_each(
        |(dst, src)| {
            let mut group = [0; ENCODED_CHUNK_LEN];
            group[..BYTES_PER_CHUNK].copy_from_slice(src);
            dst.copy_from_slice(&pack(group));
        },
    );

    if !rest.is_empty() {
        encode_tail(rest, tail_out);
    }
}

/// Encodes `input` into `output`, returning the number of bytes written.
///
/// `output` needs at least [`encoded_len`]`(input.len())` bytes; if it is
/// shorter, nothing is written and a [`CapacityError`] is returned. Bytes
/// past the returned count are left untouched.
///
/// ```
/// let mut buf = [0; base16384::encode_length(1)];
/// let n = base16384::encode(&[0x41], &mut buf).unwrap();
/// assert_eq!(buf[..n], [0x5e, 0x40, b'=', 1]);
/// ```
pub fn encode(input: &[u8], output: &mut [u8]) -> EncodeResult<usize> {
    let required = encoded_len(input.len());
    let available = output.len();
    if available < required {
        return Err(CapacityError {
            required,
            available,
        });
    }
    encode_exact(input, &mut output[..required]);
    Ok(required)
}

/// Encodes `input` into a newly allocated [`Vec`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut output = vec![0; encoded_len(input.len())];
    encode_exact(input, &mut output);
    output
}

// Lower and upper bounds on the number of words produced from `hint` bytes.
fn words_hint(hint: (usize, Option<usize>)) -> (usize, Option<usize>) {
    fn min_words(len: usize) -> usize {
        len / BYTES_PER_CHUNK * WORDS_PER_CHUNK
            + tail::lanes(len % BYTES_PER_CHUNK)
    }

    let (lower, upper) = hint;
    (
        min_words(lower),
        upper.and_then(|n| {
            // No length up to `n` needs more than `min_words(n)` plus the
            // marker.
            min_words(n).checked_add(1)
        }),
    )
}

struct BytesToUnflatWords<I>(I);

type BytesToUnflatWordsItem = Take<array::IntoIter<u16, 5>>;

impl<I> Iterator for BytesToUnflatWords<I>
where
    I: FusedIterator<Item = u8>,
{
    type Item = BytesToUnflatWordsItem;

    fn next(&mut self) -> Option<Self::Item> {
        let mut group = [0; ENCODED_CHUNK_LEN];
        let num_bytes = read_chunk(&mut self.0, &mut group[..BYTES_PER_CHUNK]);
        if num_bytes == 0 {
            return None;
        }

        let packed = pack(group);
        let mut words = [0; WORDS_PER_CHUNK + 1];
        words.iter_mut().zip(packed.chunks_exact(2)).for_each(|(w, b)| {
            *w = u16::from_be_bytes([b[0], b[1]]);
        });

        if num_bytes == BYTES_PER_CHUNK {
            return Some(words.into_iter().take(WORDS_PER_CHUNK));
        }
        let lanes = tail::lanes(num_bytes);
        words[lanes] = marker_word(num_bytes);
        Some(words.into_iter().take(lanes + 1))
    }
}

impl<I: FusedIterator<Item = u8>> FusedIterator for BytesToUnflatWords<I> {}

/// Iterator returned by [`encode_to_words`].
pub struct WordEncoder<I>(
    Flatten<BytesToUnflatWords<Fuse<I>>, BytesToUnflatWordsItem>,
);

impl<I: Iterator> WordEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self(Flatten::new(BytesToUnflatWords(iter.fuse())))
    }
}

impl<I> Iterator for WordEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.0.pending();
        let (lower, upper) = words_hint(self.0.inner().0.size_hint());
        (
            lower.saturating_add(pending),
            upper.and_then(|n| n.checked_add(pending)),
        )
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for WordEncoder<I> {}

struct WordsToUnflatBytes<I>(I);

impl<I: Iterator<Item = u16>> Iterator for WordsToUnflatBytes<I> {
    type Item = array::IntoIter<u8, 2>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|w| w.to_be_bytes().into_iter())
    }
}

impl<I: FusedIterator<Item = u16>> FusedIterator for WordsToUnflatBytes<I> {}

/// Iterator returned by [`encode_to_bytes`].
pub struct BytesEncoder<I>(
    Flatten<WordsToUnflatBytes<WordEncoder<I>>, array::IntoIter<u8, 2>>,
);

impl<I: Iterator> BytesEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self(Flatten::new(WordsToUnflatBytes(WordEncoder::new(iter))))
    }
}

impl<I> Iterator for BytesEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.0.pending();
        let (lower, upper) = self.0.inner().0.size_hint();
        (
            lower.saturating_mul(2).saturating_add(pending),
            upper
                .and_then(|n| n.checked_mul(2))
                .and_then(|n| n.checked_add(pending)),
        )
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for BytesEncoder<I> {}

/// Lazily encodes bytes as a sequence of 16-bit code units.
///
/// These are the same values [`encode`] writes in big-endian order, the
/// final marker included as the single unit `0x3d00 | r`.
pub fn encode_to_words<I>(bytes: I) -> WordEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    WordEncoder::new(bytes.into_iter())
}

/// Lazily encodes bytes as UTF-16BE bytes.
///
/// Collecting the iterator gives the same result as [`encode_to_vec`].
pub fn encode_to_bytes<I>(bytes: I) -> BytesEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesEncoder::new(bytes.into_iter())
}
