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

use super::hex;
use crate::decode::{decode_to_vec_with, decode_with};
use crate::{decode, decode_to_vec, decoded_len, encode, encode_to_vec};
use crate::{CapacityError, DecodeConfig, DecodeError, TailError};

const RELAXED: DecodeConfig = DecodeConfig {
    relaxed: true,
};

#[test]
fn empty_input_decodes_to_nothing() {
    assert_eq!(decode(&[], &mut []), Ok(0));
    assert_eq!(decode_to_vec(&[]), Ok(vec![]));
}

#[test]
fn odd_length() {
    assert_eq!(decode_to_vec(&[0x4e]), Err(DecodeError::BadLength(1)));
    let mut encoded = encode_to_vec(b"Hello, world!");
    encoded.push(0);
    assert_eq!(decode_to_vec(&encoded), Err(DecodeError::BadLength(19)));
    assert_eq!(
        decode_to_vec_with(&encoded, RELAXED).unwrap(),
        b"Hello, world!",
    );
}

#[test]
fn partial_group_without_marker() {
    let input = hex("4e004e00");
    assert_eq!(decode_to_vec(&input), Err(DecodeError::BadLength(4)));
    assert_eq!(decode_to_vec_with(&input, RELAXED), Ok(vec![]));

    let mut input = encode_to_vec(b"1234567");
    input.extend(hex("5e40"));
    assert_eq!(decode_to_vec_with(&input, RELAXED).unwrap(), b"1234567");
}

#[test]
fn bad_count() {
    for count in [0, 7, 0xff] {
        let input = [0x4e, 0x00, b'=', count];
        assert_eq!(
            decode_to_vec(&input),
            Err(DecodeError::MalformedTail(TailError::BadCount(count))),
        );
    }
}

#[test]
fn missing_words() {
    assert_eq!(
        decoded_len(&[b'=', 6]),
        Err(DecodeError::MalformedTail(TailError::MissingWords {
            count: 6,
            len: 2,
        })),
    );
    assert_eq!(
        decoded_len(&hex("4e003d02")),
        Err(DecodeError::MalformedTail(TailError::MissingWords {
            count: 2,
            len: 4,
        })),
    );
}

#[test]
fn misaligned_body_before_tail() {
    let mut input = encode_to_vec(b"1234567");
    input.extend(hex("4e00"));
    input.extend(encode_to_vec(b"A"));
    assert_eq!(decode_to_vec(&input), Err(DecodeError::BadLength(14)));
    assert_eq!(
        decode_to_vec_with(&input, RELAXED),
        Err(DecodeError::BadLength(14)),
    );
}

#[test]
fn encode_capacity() {
    let mut buf = [0; 5];
    assert_eq!(
        encode(&[1, 2, 3], &mut buf),
        Err(CapacityError {
            required: 6,
            available: 5,
        }),
    );
    assert_eq!(buf, [0; 5]);
}

#[test]
fn decode_capacity() {
    let encoded = encode_to_vec(b"Hello");
    let mut buf = [0; 4];
    let err = decode(&encoded, &mut buf).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Capacity(CapacityError {
            required: 5,
            available: 4,
        }),
    );
    assert_eq!(buf, [0; 4]);

    let mut buf = [0; 5];
    assert_eq!(decode_with(&encoded, &mut buf, RELAXED), Ok(5));
    assert_eq!(buf, *b"Hello");
}

#[test]
fn messages() {
    let err = DecodeError::from(TailError::BadCount(9));
    assert_eq!(
        err.to_string(),
        "malformed tail: leftover count 9 is not between 1 and 6",
    );
    let err = DecodeError::from(CapacityError {
        required: 8,
        available: 2,
    });
    let message = "output buffer too small: need 8 bytes, got 2";
    assert_eq!(err.to_string(), message);
    assert_eq!(
        DecodeError::BadLength(3).to_string(),
        "bad input length (3 bytes)",
    );
}
