/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use cl_bitpack::prelude::*;
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::error::Error;

const N: usize = 1000;

fn gen_values(rng: &mut SmallRng, width: usize) -> Vec<u64> {
    let mask = if width == 64 {
        u64::MAX
    } else {
        (1 << width) - 1
    };
    (0..N).map(|_| rng.random::<u64>() & mask).collect()
}

#[test]
fn test_roundtrip() -> Result<(), Box<dyn Error>> {
    let mut rng = SmallRng::seed_from_u64(0);
    for line_bytes in [8, 17, 64, 128] {
        let layout = Layout::new(line_bytes)?;
        for width in 1..=64 {
            let values = gen_values(&mut rng, width);
            for start_line in [0, 3] {
                let lines = start_line + layout.lines_needed(N, width)?;
                let mut buffer = CacheLineBuf::with_lines(lines, layout)?;
                buffer.pack(start_line, &values, width)?;
                assert_eq!(
                    buffer.unpack::<u64>(start_line, N, width)?,
                    values,
                    "line_bytes: {}, width: {}",
                    line_bytes,
                    width
                );
                // the lines before the start are untouched
                assert!(
                    buffer.as_slice()[..start_line * line_bytes]
                        .iter()
                        .all(|&b| b == 0)
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_roundtrip_narrow_types() -> Result<(), Box<dyn Error>> {
    let mut rng = SmallRng::seed_from_u64(1);
    let layout = Layout::default();
    for width in 1..=8 {
        let values: Vec<u8> = gen_values(&mut rng, width)
            .into_iter()
            .map(|x| x as u8)
            .collect();
        let lines = layout.lines_needed(N, width)?;
        let mut buffer = CacheLineBuf::with_lines(lines, layout)?;
        buffer.pack(0, &values, width)?;
        assert_eq!(buffer.unpack::<u8>(0, N, width)?, values);
        // a wider type reads the same values
        let wide: Vec<u32> = values.iter().map(|&x| x as u32).collect();
        assert_eq!(buffer.unpack::<u32>(0, N, width)?, wide);
    }
    Ok(())
}

#[test]
fn test_overwrite_roundtrip_on_dirty_buffer() -> Result<(), Box<dyn Error>> {
    let mut rng = SmallRng::seed_from_u64(2);
    let layout = Layout::default();
    let mut codec = LineCodec::<Overwrite>::new(layout);
    for width in [3, 8, 21, 64] {
        let values = gen_values(&mut rng, width);
        let lines = layout.lines_needed(N, width)?;
        let mut buffer = CacheLineBuf::with_lines(lines, layout)?;
        buffer.as_mut_slice().fill(0xa5);
        buffer.pack_with(&mut codec, 0, &values, width)?;
        assert_eq!(codec.unpack::<u64>(buffer.as_slice(), 0, N, width)?, values);
    }
    Ok(())
}

#[test]
fn test_significant_bits_only() -> Result<(), Box<dyn Error>> {
    // 5 at width 8 on a zeroed buffer reads back as 5
    let mut buffer = CacheLineBuf::with_lines(1, Layout::default())?;
    buffer.pack(0, &[5_u8], 8)?;
    assert_eq!(buffer.as_slice()[0], 0b0000_0101);
    assert_eq!(buffer.unpack::<u8>(0, 1, 8)?, [5]);

    // on a dirty buffer, only bits up to the most significant set bit of
    // the value are ORed in
    buffer.as_mut_slice()[0] = 0b1000_0010;
    buffer.pack(0, &[5_u8], 8)?;
    assert_eq!(buffer.as_slice()[0], 0b1000_0111);
    assert_eq!(buffer.unpack::<u8>(0, 1, 8)?, [0b1000_0111]);
    Ok(())
}

#[test]
fn test_line_rollover() -> Result<(), Box<dyn Error>> {
    // 73 values of 7 bits fit in a 64-byte line, leaving its last bit unused
    let layout = Layout::default();
    assert_eq!(layout.values_per_line(7)?, 73);
    let mut buffer = CacheLineBuf::with_lines(2, layout)?;
    buffer.pack(0, &[0x7f_u8; 74], 7)?;
    let line = buffer.line(0).unwrap();
    assert!(line[..63].iter().all(|&b| b == 0xff));
    assert_eq!(line[63], 0x7f);
    // the 74th value is at the start of the next line
    assert_eq!(&buffer.line(1).unwrap()[..2], &[0x7f, 0]);
    assert_eq!(buffer.unpack::<u8>(1, 1, 7)?, [0x7f]);

    // a 64-bit value never straddles lines, even if bits are left over
    let layout = Layout::new(12)?;
    let mut buffer = CacheLineBuf::with_lines(2, layout)?;
    buffer.pack(0, &[u64::MAX, u64::MAX], 64)?;
    assert_eq!(&buffer.as_slice()[8..12], &[0; 4]);
    assert_eq!(&buffer.as_slice()[12..20], &[0xff; 8]);
    Ok(())
}

#[test]
fn test_failed_calls_do_not_modify() -> Result<(), Box<dyn Error>> {
    let layout = Layout::default();
    let mut buffer = CacheLineBuf::with_lines(2, layout)?;
    buffer.pack(0, &[1_u8, 2, 3], 8)?;
    let before = buffer.clone();

    assert_eq!(
        buffer.pack(0, &[1_u64; 3], 0),
        Err(CodecError::InvalidBitWidth { width: 0, max: 64 })
    );
    assert_eq!(
        buffer.pack(0, &[1_u64, 1 << 20, 1], 20),
        Err(CodecError::ValueTooWide { index: 1, width: 20 })
    );
    assert_eq!(
        buffer.pack(1, &[1_u64; 9], 64),
        Err(CodecError::OutOfBounds {
            needed: 136,
            len: 128
        })
    );
    assert_eq!(
        buffer.change_endian(129),
        Err(CodecError::OutOfBounds {
            needed: 129,
            len: 128
        })
    );
    assert_eq!(buffer, before);
    Ok(())
}

#[test]
fn test_change_endian() -> Result<(), Box<dyn Error>> {
    let layout = Layout::default();
    let mut rng = SmallRng::seed_from_u64(3);
    let original: Vec<u8> = (0..300).map(|_| rng.random()).collect();
    let mut data = original.clone();

    change_endian(&mut data, 256, &layout)?;
    for line in 0..4 {
        for i in 0..64 {
            assert_eq!(data[line * 64 + i], original[line * 64 + 63 - i]);
        }
    }
    assert_eq!(&data[256..], &original[256..]);
    change_endian(&mut data, 256, &layout)?;
    assert_eq!(data, original);

    // a partial last line is reversed within its own length
    change_endian(&mut data, 70, &layout)?;
    let reversed: Vec<u8> = original[64..70].iter().rev().copied().collect();
    assert_eq!(&data[64..70], reversed.as_slice());
    assert_eq!(data[70], original[70]);
    Ok(())
}

#[test]
fn test_swap_then_unpack() -> Result<(), Box<dyn Error>> {
    // after the swap, the first byte of the image is the most significant
    // byte of the line read as a little-endian word
    let layout = Layout::new(8)?;
    let mut buffer = CacheLineBuf::with_lines(1, layout)?;
    let image = "00000001 00000000 00000000 00000000 00000000 00000000 00000000 00000010";
    buffer.load_bitstream(image.as_bytes())?;
    buffer.change_endian(8)?;
    assert_eq!(buffer.unpack::<u64>(0, 1, 64)?, [0x0100_0000_0000_0002]);
    assert_eq!(buffer.unpack::<u8>(0, 8, 8)?, [2, 0, 0, 0, 0, 0, 0, 1]);
    Ok(())
}

#[test]
fn test_count_and_dbg() -> Result<(), Box<dyn Error>> {
    let layout = Layout::default();
    let mut data = vec![0_u8; 256];
    let mut codec = CountCodec::<_>::new(DbgCodec::new(<LineCodec>::new(layout)));
    codec.pack(&mut data, 0, &[7_u16; 100], 10)?;
    assert!(codec.pack(&mut data, 0, &[7_u16; 1000], 10).is_err());
    assert_eq!(codec.unpack::<u16>(&data, 0, 100, 10)?, vec![7; 100]);
    assert_eq!(codec.values_packed, 100);
    assert_eq!(codec.bits_packed, 1000);
    assert_eq!(codec.values_unpacked, 100);
    assert_eq!(codec.bits_unpacked, 1000);
    Ok(())
}
