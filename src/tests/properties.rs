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

use quickcheck_macros::quickcheck;
use rand::Rng;

use super::units;
use crate::decode::decode_to_vec_with;
use crate::{decode_length, decode_length_with_tail, decoded_len};
use crate::{decode_to_vec, encode_to_vec, encoded_len, CodeWord};
use crate::{DecodeConfig, BYTES_PER_CHUNK};

#[quickcheck]
fn round_trip(data: Vec<u8>) -> bool {
    decode_to_vec(&encode_to_vec(&data)) == Ok(data)
}

#[quickcheck]
fn relaxed_agrees_on_valid_input(data: Vec<u8>) -> bool {
    let relaxed = DecodeConfig {
        relaxed: true,
    };
    decode_to_vec_with(&encode_to_vec(&data), relaxed) == Ok(data)
}

#[quickcheck]
fn length_is_a_function_of_input_length(data: Vec<u8>) -> bool {
    let encoded = encode_to_vec(&data);
    encoded.len() == encoded_len(data.len())
        && decoded_len(&encoded) == Ok(data.len())
}

#[quickcheck]
fn words_stay_in_band(data: Vec<u8>) -> bool {
    let encoded = encode_to_vec(&data);
    let mut words = units(&encoded);
    if data.len() % BYTES_PER_CHUNK != 0 {
        words.pop();
    }
    words.iter().all(|&w| CodeWord::new(w).is_some())
}

#[quickcheck]
fn no_surrogates_or_byte_order_marks(data: Vec<u8>) -> bool {
    units(&encode_to_vec(&data)).into_iter().all(|w| {
        !(0xd800..=0xdfff).contains(&w) && w != 0xfeff && w != 0xfffe
    })
}

#[quickcheck]
fn marker_follows_partial_group(data: Vec<u8>) -> bool {
    let encoded = encode_to_vec(&data);
    match data.len() % BYTES_PER_CHUNK {
        0 => !encoded.contains(&b'='),
        r => encoded[encoded.len() - 2..] == [b'=', r as u8],
    }
}

#[quickcheck]
fn groups_concatenate(a: Vec<u8>, b: Vec<u8>) -> bool {
    let whole = a.len() / BYTES_PER_CHUNK * BYTES_PER_CHUNK;
    let a = &a[..whole];
    let mut joined = encode_to_vec(a);
    joined.extend(encode_to_vec(&b));
    joined == encode_to_vec(&[a, &b[..]].concat())
}

#[quickcheck]
fn calculators_are_large_enough(len: u32) -> bool {
    let len = len as usize;
    let encoded = encoded_len(len);
    decode_length(encoded) >= len
        && decode_length_with_tail(encoded, len % BYTES_PER_CHUNK) >= len
}

#[test]
fn large_random_round_trips() {
    let mut rng = rand::rng();
    let lengths = [0, 1, 6, 7, 8, 13, 14, 700]
        .into_iter()
        .chain((0..4).map(|_| rng.random_range(0..=1_000_000)));
    for len in lengths.collect::<Vec<_>>() {
        let mut data = vec![0; len];
        rng.fill(&mut data[..]);
        let encoded = encode_to_vec(&data);
        assert_eq!(encoded.len(), encoded_len(len));
        assert_eq!(decode_to_vec(&encoded).unwrap(), data, "length {len}");
    }
}
