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

use super::{BASE, BASE_LANES};

const FIELD_MASK: u16 = 0x3fff;

/// A 16-bit code unit in the band used for encoded data (U+4E00..=U+8DFF).
///
/// Code words are never surrogates and never byte-order marks, so they
/// survive any conforming UTF-16 or UTF-8 transcoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeWord(u16);

impl CodeWord {
    /// The smallest code word, carrying the field 0.
    pub const MIN: Self = Self(BASE);
    /// The largest code word, carrying the field 0x3fff.
    pub const MAX: Self = Self(BASE + FIELD_MASK);

    /// Returns `None` if `word` lies outside the code-word band.
    pub const fn new(word: u16) -> Option<Self> {
        if word >= Self::MIN.0 && word <= Self::MAX.0 {
            Some(Self(word))
        } else {
            None
        }
    }

    /// Builds a code word from its 14-bit payload.
    ///
    /// Returns `None` if `field` doesn't fit in 14 bits.
    pub const fn from_field(field: u16) -> Option<Self> {
        if field <= FIELD_MASK {
            Some(Self(BASE + field))
        } else {
            None
        }
    }

    /// The 14-bit payload.
    pub const fn field(self) -> u16 {
        self.0 - BASE
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<CodeWord> for u16 {
    fn from(w: CodeWord) -> u16 {
        w.0
    }
}

/// Packs the first 7 bytes of `group` into 4 big-endian code words.
///
/// The eighth byte never reaches the output; callers may leave anything
/// there.
pub(crate) fn pack(group: [u8; 8]) -> [u8; 8] {
    let mut shift = u64::from_be_bytes(group) >> 2;
    let mut sum = shift & 0x3fff_0000_0000_0000;
    shift >>= 2;
    sum |= shift & 0x0000_3fff_0000_0000;
    shift >>= 2;
    sum |= shift & 0x0000_0000_3fff_0000;
    shift >>= 2;
    sum |= shift & 0x0000_0000_0000_3fff;
    (sum + BASE_LANES).to_be_bytes()
}

/// Inverse of [`pack`]. The last byte of the result is always 0.
///
/// Words outside the code-word band are not rejected; the subtraction wraps.
pub(crate) fn unpack(words: [u8; 8]) -> [u8; 8] {
    let mut shift = u64::from_be_bytes(words).wrapping_sub(BASE_LANES);
    shift <<= 2;
    let mut sum = shift & 0xfffc_0000_0000_0000;
    shift <<= 2;
    sum |= shift & 0x0003_fff0_0000_0000;
    shift <<= 2;
    sum |= shift & 0x0000_000f_ffc0_0000;
    shift <<= 2;
    sum |= shift & 0x0000_0000_003f_ff00;
    sum.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(CodeWord::new(0x4dff), None);
        assert_eq!(CodeWord::new(0x4e00), Some(CodeWord::MIN));
        assert_eq!(CodeWord::new(0x8dff), Some(CodeWord::MAX));
        assert_eq!(CodeWord::new(0x8e00), None);
        assert_eq!(CodeWord::from_field(0x4000), None);
        assert_eq!(CodeWord::from_field(0x3fff).map(u16::from), Some(0x8dff));
        assert_eq!(CodeWord::MAX.field(), 0x3fff);
    }

    #[test]
    fn pack_ignores_eighth_byte() {
        let a = pack([1, 2, 3, 4, 5, 6, 7, 0]);
        let b = pack([1, 2, 3, 4, 5, 6, 7, 0xff]);
        assert_eq!(a, b);
        assert_eq!(a, [0x4e, 0x40, 0x6e, 0x30, 0x5e, 0x14, 0x54, 0x07]);
    }

    #[test]
    fn unpack_inverts_pack() {
        let group = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0];
        assert_eq!(unpack(pack(group)), group);
        let ones = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0];
        assert_eq!(unpack(pack([0xff; 8])), ones);
    }
}
