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

//! Base16384: binary data as UTF-16BE text.
//!
//! Every 7 bytes of input become 4 big-endian 16-bit code units, each
//! carrying 14 bits offset into the CJK block starting at U+4E00. When the
//! input length isn't a multiple of 7, the final partial group is followed
//! by a two-byte marker: `=` and the number of leftover bytes (1–6).
//!
//! ```
//! let encoded = base16384::encode_to_vec(b"Hello");
//! assert_eq!(encoded, [0x60, 0x19, 0x64, 0xc6, 0x7f, 0xbc, b'=', 5]);
//! assert_eq!(base16384::decode_to_vec(&encoded).unwrap(), b"Hello");
//! ```
//!
//! The slice functions ([`encode`], [`decode`]) write into caller-provided
//! buffers and never allocate. Size those buffers with [`encoded_len`] /
//! [`decoded_len`], or with the over-provisioning [`encode_length`] /
//! [`decode_length`] calculators.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod decode;
pub mod encode;
mod iter;
mod tail;
mod word;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(all(test, feature = "std"))]
mod tests;

const BYTES_PER_CHUNK: usize = 7;
const WORDS_PER_CHUNK: usize = 4;
const ENCODED_CHUNK_LEN: usize = WORDS_PER_CHUNK * 2;

/// Offset added to every 14-bit field. Fields therefore map to U+4E00..U+8DFF.
const BASE: u16 = 0x4e00;
const BASE_LANES: u64 = 0x4e00_4e00_4e00_4e00;

/// Extra bytes [`encode_length`] reserves past the exact encoded length.
const ENCODE_SLACK: usize = 8 + 16;
/// Extra bytes [`decode_length`] reserves past the body's decoded length.
const DECODE_SLACK: usize = 1 + 16;

pub use word::CodeWord;

pub use encode::CapacityError;
pub use encode::{encode, encode_length, encoded_len};
pub use encode::{encode_to_bytes, encode_to_words};
#[cfg(feature = "alloc")]
pub use encode::encode_to_vec;

pub use decode::{decode, decode_length, decode_length_with_tail, decoded_len};
pub use decode::{decode_bytes, decode_words};
pub use decode::{DecodeConfig, DecodeError, TailError};
#[cfg(feature = "alloc")]
pub use decode::decode_to_vec;
