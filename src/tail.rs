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

//! The partial final group.
//!
//! `r` leftover bytes are zero-padded to a full group and packed like any
//! other; only the first [`lanes(r)`](lanes) code words are kept, followed by
//! the marker `=`, `r`. Decoding pads the words back out with field-zero
//! words and keeps the first `r` bytes.

use super::word::{pack, unpack};
use super::{BASE, BYTES_PER_CHUNK, ENCODED_CHUNK_LEN};

pub const MARKER: u8 = b'=';
pub const MARKER_LEN: usize = 2;

/// Number of code words holding `r` leftover bytes (`ceil(8r / 14)`).
pub const fn lanes(r: usize) -> usize {
    match r {
        1 => 1,
        2 | 3 => 2,
        4 | 5 => 3,
        6 => 4,
        _ => 0,
    }
}

/// Encoded length of a partial group of `r` bytes, marker included.
pub const fn tail_len(r: usize) -> usize {
    match lanes(r) {
        0 => 0,
        n => n * 2 + MARKER_LEN,
    }
}

/// Returns the leftover count if `word` is a tail marker.
pub fn marker_count(word: u16) -> Option<u8> {
    let [hi, lo] = word.to_be_bytes();
    (hi == MARKER).then_some(lo)
}

/// The marker as a single 16-bit code unit.
pub const fn marker_word(r: usize) -> u16 {
    u16::from_be_bytes([MARKER, r as u8])
}

/// Encodes `bytes` (1 to 6 of them) into `out`, which must be exactly
/// `tail_len(bytes.len())` long.
pub fn encode_tail(bytes: &[u8], out: &mut [u8]) {
    let r = bytes.len();
    let mut group = [0; ENCODED_CHUNK_LEN];
    group[..r].copy_from_slice(bytes);
    let words = pack(group);
    let (body, marker) = out.split_at_mut(out.len() - MARKER_LEN);
    body.copy_from_slice(&words[..body.len()]);
    marker.copy_from_slice(&[MARKER, r as u8]);
}

/// Decodes the `lanes(out.len())` code words in `words` into `out`.
pub fn decode_tail(words: &[u8], out: &mut [u8]) {
    debug_assert!(out.len() < BYTES_PER_CHUNK);
    debug_assert_eq!(words.len(), lanes(out.len()) * 2);
    let mut group = [0; ENCODED_CHUNK_LEN];
    group.chunks_exact_mut(2).for_each(|w| {
        w.copy_from_slice(&BASE.to_be_bytes());
    });
    group[..words.len()].copy_from_slice(words);
    let len = out.len();
    out.copy_from_slice(&unpack(group)[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_table() {
        let table: [usize; 8] = core::array::from_fn(tail_len);
        assert_eq!(table, [0, 4, 6, 6, 8, 8, 10, 0]);
    }

    #[test]
    fn marker_words() {
        assert_eq!(marker_word(3), 0x3d03);
        assert_eq!(marker_count(0x3d03), Some(3));
        assert_eq!(marker_count(0x4e3d), None);
    }

    #[test]
    fn single_byte() {
        let mut out = [0; 4];
        encode_tail(&[0x41], &mut out);
        assert_eq!(out, [0x5e, 0x40, b'=', 1]);

        let mut back = [0; 1];
        decode_tail(&out[..2], &mut back);
        assert_eq!(back, [0x41]);
    }

    #[test]
    fn six_bytes() {
        let mut out = [0; 10];
        encode_tail(&[0xff; 6], &mut out);
        let expected = [0x8d, 0xff, 0x8d, 0xff, 0x8d, 0xff, 0x8d, 0x00];
        assert_eq!(out[..8], expected);
        assert_eq!(out[8..], [b'=', 6]);

        let mut back = [0; 6];
        decode_tail(&out[..8], &mut back);
        assert_eq!(back, [0xff; 6]);
    }
}
