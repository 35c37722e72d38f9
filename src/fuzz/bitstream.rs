/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    text: Vec<u8>,
    capacity: u16,
}

pub fn harness(data: FuzzCase) {
    let bits: Vec<u8> = data
        .text
        .iter()
        .filter(|&&c| c == b'0' || c == b'1')
        .map(|&c| c - b'0')
        .collect();
    let expected: Vec<u8> = bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0, |byte, &bit| (byte << 1) | bit))
        .collect();

    assert_eq!(read_bitstream(data.text.as_slice()).unwrap(), expected);

    let mut buffer = vec![0_u8; data.capacity as usize];
    match load_bitstream(data.text.as_slice(), &mut buffer) {
        Ok(len) => {
            assert_eq!(len, expected.len());
            assert_eq!(&buffer[..len], expected.as_slice());
        }
        Err(LoadError::BufferFull { capacity }) => {
            assert_eq!(capacity, buffer.len());
            assert!(expected.len() > capacity);
            assert_eq!(buffer.as_slice(), &expected[..capacity]);
        }
        Err(e) => panic!("unexpected error {}", e),
    }
}
