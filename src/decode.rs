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

//! Functions and types for decoding base16384 data.

use super::encode::CapacityError;
use super::iter::Flatten;
use super::tail::{self, decode_tail, marker_count, tail_len, MARKER};
use super::word::unpack;
use super::{BASE, BYTES_PER_CHUNK, DECODE_SLACK, ENCODED_CHUNK_LEN};
use super::WORDS_PER_CHUNK;

use core::array;
use core::iter::{Fuse, FusedIterator, Map, Take};
use thiserror::Error;

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// An error encountered while decoding.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input was not a valid number of bytes: odd, or not a whole
    /// number of 4-word groups once the tail is set aside. Holds the length
    /// seen (for the iterator decoders, the length read so far).
    #[error("bad input length ({0} bytes)")]
    BadLength(usize),
    /// The `=` tail marker or the words before it were invalid.
    #[error("malformed tail: {0}")]
    MalformedTail(#[from] TailError),
    /// The output buffer was too small.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Details for [`DecodeError::MalformedTail`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TailError {
    /// The leftover count after `=` was not between 1 and 6.
    #[error("leftover count {0} is not between 1 and 6")]
    BadCount(u8),
    /// The input was too short to hold the code words the marker announces.
    #[error("{len} bytes cannot hold a tail of {count} bytes")]
    MissingWords {
        /// The leftover count from the marker.
        count: u8,
        /// Length of the input.
        len: usize,
    },
    /// The marker was followed by more data. Only the iterator decoders
    /// report this; the slice decoders look for the marker at the end only.
    #[error("tail marker is not at the end of the input")]
    NotLast,
}

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Used by the `*_with` functions to configure the decoding process.
#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub struct DecodeConfig {
    /// If true, an odd trailing byte is ignored, and so are trailing code
    /// words that neither fill a group nor end in a tail marker. The
    /// iterator decoders additionally ignore anything after the marker.
    /// [default: false]
    pub relaxed: bool,
}

impl DecodeConfig {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            relaxed: false,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the full groups end and how many bytes the tail holds.
#[derive(Clone, Copy, Debug)]
struct Layout {
    body: usize,
    tail: usize,
}

impl Layout {
    fn parse(input: &[u8], config: DecodeConfig) -> DecodeResult<Self> {
        let mut len = input.len();
        if len % 2 != 0 {
            if !config.relaxed {
                return Err(DecodeError::BadLength(len));
            }
            len -= 1;
        }

        let (body, tail) = match input[..len] {
            [.., MARKER, count] => {
                let r = usize::from(count);
                if tail_len(r) == 0 {
                    return Err(TailError::BadCount(count).into());
                }
                let body = len.checked_sub(tail_len(r)).ok_or(
                    TailError::MissingWords {
                        count,
                        len,
                    },
                )?;
                (body, r)
            }
            _ => (len, 0),
        };

        let misaligned = body % ENCODED_CHUNK_LEN;
        if misaligned != 0 && !(config.relaxed && tail == 0) {
            return Err(DecodeError::BadLength(input.len()));
        }
        Ok(Self {
            body: body - misaligned,
            tail,
        })
    }

    fn decoded_len(self) -> usize {
        self.body / ENCODED_CHUNK_LEN * BYTES_PER_CHUNK + self.tail
    }
}

// `output` must be exactly `layout.decoded_len()` bytes.
fn decode_exact(input: &[u8], layout: Layout, output: &mut [u8]) {
    let body_len = layout.body / ENCODED_CHUNK_LEN * BYTES_PER_CHUNK;
    let (body, tail_out) = output.split_at_mut(body_len);

    body.chunks_exact_mut(BYTES_PER_CHUNK)
        .zip(input[..layout.body].chunks_exact(ENCODED_CHUNK_LEN))
        .for_each(|(dst, src)| {
            let mut group = [0; ENCODED_CHUNK_LEN];
            group.copy_from_slice(src);
            dst.copy_from_slice(&unpack(group)[..BYTES_PER_CHUNK]);
        });

    if layout.tail != 0 {
        let words = &input[layout.body..][..tail::lanes(layout.tail) * 2];
        decode_tail(words, tail_out);
    }
}

/// A generous output size for decoding `len` bytes of encoded data.
///
/// Equivalent to [`decode_length_with_tail`]`(len, 0)`. This is enough for
/// any input of that length, tail or not.
pub const fn decode_length(len: usize) -> usize {
    decode_length_with_tail(len, 0)
}

/// Like [`decode_length`], but for input known to end in a tail of
/// `leftover` bytes. Leftover counts outside 1–6 are treated as no tail.
pub const fn decode_length_with_tail(len: usize, leftover: usize) -> usize {
    len.saturating_sub(tail_len(leftover)) / ENCODED_CHUNK_LEN
        * BYTES_PER_CHUNK
        + leftover
        + DECODE_SLACK
}

/// The exact number of bytes [`decode`] would produce for `input`.
///
/// Fails exactly when [`decode`] would fail for a reason other than
/// capacity.
pub fn decoded_len(input: &[u8]) -> DecodeResult<usize> {
    decoded_len_with(input, DecodeConfig::new())
}

/// Like [`decoded_len`], but takes a configuration object.
pub fn decoded_len_with(
    input: &[u8],
    config: DecodeConfig,
) -> DecodeResult<usize> {
    Layout::parse(input, config).map(Layout::decoded_len)
}

/// Decodes `input` into `output`, returning the number of bytes written.
///
/// The input is validated in full before anything is written. `output`
/// needs at least [`decoded_len`]`(input)` bytes; [`decode_length`] of the
/// input length is always enough.
///
/// ```
/// let input = [0x5e, 0x40, b'=', 1];
/// let mut buf = [0; base16384::decode_length(4)];
/// let n = base16384::decode(&input, &mut buf).unwrap();
/// assert_eq!(buf[..n], [0x41]);
/// ```
pub fn decode(input: &[u8], output: &mut [u8]) -> DecodeResult<usize> {
    decode_with(input, output, DecodeConfig::new())
}

/// Like [`decode`], but takes a configuration object.
pub fn decode_with(
    input: &[u8],
    output: &mut [u8],
    config: DecodeConfig,
) -> DecodeResult<usize> {
    let layout = Layout::parse(input, config)?;
    let required = layout.decoded_len();
    let available = output.len();
    if available < required {
        return Err(CapacityError {
            required,
            available,
        }
        .into());
    }
    decode_exact(input, layout, &mut output[..required]);
    Ok(required)
}

/// Decodes `input` into a newly allocated [`Vec`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec(input: &[u8]) -> DecodeResult<Vec<u8>> {
    decode_to_vec_with(input, DecodeConfig::new())
}

/// Like [`decode_to_vec`], but takes a configuration object.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec_with(
    input: &[u8],
    config: DecodeConfig,
) -> DecodeResult<Vec<u8>> {
    let layout = Layout::parse(input, config)?;
    let mut output = vec![0; layout.decoded_len()];
    decode_exact(input, layout, &mut output);
    Ok(output)
}

struct BytesToWords<I> {
    iter: Fuse<I>,
    len: usize,
    relaxed: bool,
}

impl<I: Iterator> BytesToWords<I> {
    pub fn new(iter: I, config: DecodeConfig) -> Self {
        Self {
            iter: iter.fuse(),
            len: 0,
            relaxed: config.relaxed,
        }
    }
}

impl<I> Iterator for BytesToWords<I>
where
    I: Iterator<Item = u8>,
{
    type Item = DecodeResult<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        let hi = self.iter.next()?;
        self.len += 1;
        match self.iter.next() {
            Some(lo) => {
                self.len += 1;
                Some(Ok(u16::from_be_bytes([hi, lo])))
            }
            None if self.relaxed => None,
            None => Some(Err(DecodeError::BadLength(self.len))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (lower / 2, upper.map(|n| n / 2 + n % 2))
    }
}

struct WordsToUnflatBytes<I> {
    iter: I,
    peeked: Option<DecodeResult<u16>>,
    config: DecodeConfig,
    words: usize,
    done: bool,
}

type WordsToUnflatBytesItem = Take<array::IntoIter<DecodeResult<u8>, 7>>;

impl<I> WordsToUnflatBytes<I>
where
    I: Iterator<Item = DecodeResult<u16>>,
{
    pub fn new(iter: I, config: DecodeConfig) -> Self {
        Self {
            iter,
            peeked: None,
            config,
            words: 0,
            done: false,
        }
    }

    fn peek(&mut self) -> Option<&DecodeResult<u16>> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        self.peeked.as_ref()
    }

    fn next_word(&mut self) -> DecodeResult<Option<u16>> {
        let word = self.peeked.take().or_else(|| self.iter.next());
        let word = word.transpose()?;
        self.words += usize::from(word.is_some());
        Ok(word)
    }

    /// Reads the next group of up to 4 words, returning its decoded bytes
    /// and how many of them are meaningful.
    fn read_group(&mut self) -> DecodeResult<Option<([u8; 8], usize)>> {
        let mut group = [0; ENCODED_CHUNK_LEN];
        group.chunks_exact_mut(2).for_each(|w| {
            w.copy_from_slice(&BASE.to_be_bytes());
        });

        let mut len = 0;
        while len < WORDS_PER_CHUNK {
            let word = match self.next_word()? {
                Some(word) => word,
                None => break,
            };
            if let Some(count) = marker_count(word) {
                return self.read_tail(&group[..len * 2], count).map(Some);
            }
            group[len * 2..][..2].copy_from_slice(&word.to_be_bytes());
            len += 1;
        }

        match len {
            0 => Ok(None),
            WORDS_PER_CHUNK => {
                // A six-byte tail fills all four words; only the next word
                // tells it apart from a full group.
                let count = match self.peek() {
                    Some(Ok(word)) => marker_count(*word),
                    _ => None,
                };
                if let Some(count) = count {
                    self.next_word()?;
                    return self.read_tail(&group, count).map(Some);
                }
                Ok(Some((unpack(group), BYTES_PER_CHUNK)))
            }
            _ if self.config.relaxed => Ok(None),
            _ => Err(DecodeError::BadLength(self.words * 2)),
        }
    }

    fn read_tail(
        &mut self,
        words: &[u8],
        count: u8,
    ) -> DecodeResult<([u8; 8], usize)> {
        let r = usize::from(count);
        if tail_len(r) == 0 {
            return Err(TailError::BadCount(count).into());
        }
        if words.len() != tail::lanes(r) * 2 {
            let len = self.words * 2;
            return Err(if len < tail_len(r) {
                TailError::MissingWords {
                    count,
                    len,
                }
                .into()
            } else {
                DecodeError::BadLength(len)
            });
        }
        if !self.config.relaxed && self.peek().is_some() {
            return Err(TailError::NotLast.into());
        }
        let mut bytes = [0; ENCODED_CHUNK_LEN];
        decode_tail(words, &mut bytes[..r]);
        Ok((bytes, r))
    }

    /// Upper bound on the bytes still to come, not counting any that were
    /// already handed out in a group.
    fn remaining_hint(&self) -> Option<usize> {
        if self.done {
            return Some(0);
        }
        let peeked = usize::from(self.peeked.is_some());
        let (_, upper) = self.iter.size_hint();
        upper.and_then(|n| n.checked_add(peeked)).and_then(|words| {
            if words == 0 {
                return Some(0);
            }
            // A partial group decodes to at most 6 bytes, and a trailing
            // partial group spans at most 5 words.
            (words / WORDS_PER_CHUNK)
                .checked_mul(BYTES_PER_CHUNK)
                .and_then(|n| n.checked_add(3))
        })
    }
}

impl<I> Iterator for WordsToUnflatBytes<I>
where
    I: Iterator<Item = DecodeResult<u16>>,
{
    type Item = WordsToUnflatBytesItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut items = [Ok(0); BYTES_PER_CHUNK];
        match self.read_group() {
            Ok(Some((bytes, len))) => {
                self.done = len < BYTES_PER_CHUNK;
                items.iter_mut().zip(bytes).for_each(|(item, b)| {
                    *item = Ok(b);
                });
                Some(items.into_iter().take(len))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                items[0] = Err(e);
                Some(items.into_iter().take(1))
            }
        }
    }
}

impl<I> FusedIterator for WordsToUnflatBytes<I> where
    I: Iterator<Item = DecodeResult<u16>>
{
}

type OkWord = fn(u16) -> DecodeResult<u16>;

/// Iterator returned by [`decode_words`].
pub struct WordDecoder<I>(
    Flatten<WordsToUnflatBytes<Map<I, OkWord>>, WordsToUnflatBytesItem>,
);

impl<I> WordDecoder<I>
where
    I: Iterator<Item = u16>,
{
    pub(crate) fn new(iter: I, config: DecodeConfig) -> Self {
        let iter = iter.map(Ok as OkWord);
        Self(Flatten::new(WordsToUnflatBytes::new(iter, config)))
    }
}

impl<I> Iterator for WordDecoder<I>
where
    I: Iterator<Item = u16>,
{
    type Item = DecodeResult<u8>;

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
        let upper = self.0.inner().remaining_hint();
        (pending, upper.and_then(|n| n.checked_add(pending)))
    }
}

impl<I: Iterator<Item = u16>> FusedIterator for WordDecoder<I> {}

/// Iterator returned by [`decode_bytes`].
pub struct BytesDecoder<I>(
    Flatten<WordsToUnflatBytes<BytesToWords<I>>, WordsToUnflatBytesItem>,
);

impl<I> BytesDecoder<I>
where
    I: Iterator<Item = u8>,
{
    pub(crate) fn new(iter: I, config: DecodeConfig) -> Self {
        let iter = BytesToWords::new(iter, config);
        Self(Flatten::new(WordsToUnflatBytes::new(iter, config)))
    }
}

impl<I> Iterator for BytesDecoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = DecodeResult<u8>;

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
        let upper = self.0.inner().remaining_hint();
        (pending, upper.and_then(|n| n.checked_add(pending)))
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for BytesDecoder<I> {}

/// Decodes a sequence of 16-bit code units.
///
/// A unit whose high byte is `=` is taken as the tail marker. Iteration
/// ends after the first error.
pub fn decode_words<I>(words: I) -> WordDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u16>,
{
    decode_words_with(words, DecodeConfig::new())
}

/// Decodes a sequence of 16-bit code units with the given config.
pub fn decode_words_with<I>(
    words: I,
    config: DecodeConfig,
) -> WordDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u16>,
{
    WordDecoder::new(words.into_iter(), config)
}

/// Decodes UTF-16BE bytes.
///
/// Collecting the iterator into a <code>Result\<Vec\<u8>, _></code> gives
/// the same result as [`decode_to_vec`] for any input whose marker, if any,
/// is at the end.
pub fn decode_bytes<I>(bytes: I) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    decode_bytes_with(bytes, DecodeConfig::new())
}

/// Decodes UTF-16BE bytes with the given config.
pub fn decode_bytes_with<I>(
    bytes: I,
    config: DecodeConfig,
) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesDecoder::new(bytes.into_iter(), config)
}
