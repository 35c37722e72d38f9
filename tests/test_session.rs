/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use cl_bitpack::prelude::*;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

fn write_image(name: &str, data: &[u8]) -> Result<PathBuf, Box<dyn Error>> {
    let path = std::env::temp_dir().join(format!("cl_bitpack_{}.dat", name));
    write_bitstream(File::create(&path)?, data, 64)?;
    Ok(path)
}

fn config() -> SessionConfig {
    SessionConfig {
        buffer_len: 256,
        ..Default::default()
    }
}

#[test]
fn test_image_file() -> Result<(), Box<dyn Error>> {
    let data: Vec<u8> = (0..200).map(|x| (x * 13) as u8).collect();
    let path = write_image("file_roundtrip", &data)?;
    assert_eq!(read_bitstream_file(&path)?, data);
    let mut buffer = vec![0; 256];
    assert_eq!(load_bitstream_file(&path, &mut buffer)?, 200);
    assert_eq!(&buffer[..200], data.as_slice());
    assert!(buffer[200..].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn test_identity_kernel() -> Result<(), Box<dyn Error>> {
    let data: Vec<u8> = (0..100).collect();
    let initial = write_image("identity_initial", &data)?;
    let config = config();
    let device = SoftwareDevice::new(config.layout, config.registers);
    let mut session = Session::prepare(device, config, &initial)?;
    assert_eq!(session.initial_len(), 100);
    assert_eq!(session.address() % 64, 0);

    // line 0 is reversed, line 1 holds 36 bytes at its end
    let buffer = session.buffer()?;
    assert_eq!(buffer[0], 63);
    assert_eq!(buffer[63], 0);
    assert!(buffer[64..92].iter().all(|&b| b == 0));
    assert_eq!(buffer[92], 99);
    assert_eq!(buffer[127], 64);

    assert!(!session.is_finished()?);
    session.start()?;
    assert!(session.is_finished()?);
    let registers = config.registers;
    let line_address = session.address() / 64;
    assert_eq!(session.device_mut().read_register(registers.offset)?, line_address);
    assert_eq!(session.device_mut().read_register(registers.cycles)?, 4);

    assert_eq!(session.verify(&initial)?, Comparison::Equal);

    let mut wrong = data.clone();
    wrong[5] ^= 0xff;
    let expected = write_image("identity_wrong", &wrong)?;
    assert_eq!(
        session.verify(&expected)?,
        Comparison::Mismatch {
            offset: 58,
            actual: 5,
            expected: 5 ^ 0xff
        }
    );

    session.finish()?;
    Ok(())
}

#[test]
fn test_packing_kernel() -> Result<(), Box<dyn Error>> {
    // the device doubles the 16-bit values in the first line
    let config = config();
    let layout = config.layout;
    let device = SoftwareDevice::new(layout, config.registers).with_kernel(move |data| {
        let mut codec = LineCodec::<Overwrite>::new(layout);
        let values = codec.unpack::<u16>(data, 0, 32, 16).unwrap_or_default();
        let doubled: Vec<u16> = values.iter().map(|&x| x.wrapping_mul(2)).collect();
        let _ = codec.pack(data, 0, &doubled, 16);
    });

    let initial = write_image("packing_initial", &[])?;
    let mut session = Session::prepare(device, config, &initial)?;
    assert_eq!(session.initial_len(), 0);
    let values: Vec<u16> = (0..32).map(|x| x * 1000).collect();
    session.pack(0, &values, 16)?;
    session.start()?;
    assert!(session.is_finished()?);

    let doubled: Vec<u16> = values.iter().map(|&x| x.wrapping_mul(2)).collect();
    assert_eq!(session.unpack::<u16>(0, 32, 16)?, doubled);

    // the image of the expected result, as a bitstream file lists it
    let mut line = CacheLineBuf::with_lines(1, layout)?;
    line.pack(0, &doubled, 16)?;
    line.change_endian(64)?;
    let expected = write_image("packing_expected", line.as_slice())?;
    assert!(session.verify(&expected)?.is_equal());
    Ok(())
}

#[test]
fn test_unknown_buffer() -> Result<(), Box<dyn Error>> {
    let config = config();
    let mut device = SoftwareDevice::new(config.layout, config.registers);
    let (id, address) = device.allocate(64)?;
    device.release(id)?;
    assert_eq!(device.buffer(id), Err(SoftwareDeviceError::UnknownBuffer(id)));
    device.write_register(config.registers.offset, address / 64)?;
    assert!(device.write_register(config.registers.offset_valid, 1).is_err());
    assert!(!device.is_finished()?);
    Ok(())
}
