/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Hand a buffer to an accelerator and check the result.

A [`Session`] allocates a buffer on a [`Device`], fills it with a
bitstream image, normalizes the order of the bytes in each cache line with
[`change_endian`], and tells the device where the buffer is. Once the device
is done, [`Session::verify`] loads the expected image in the same way and
compares it with the buffer, reporting the first differing byte.

Waiting for the device is left to the caller, who can poll
[`Session::is_finished`] as appropriate for the device at hand.

*/

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

use crate::impls::*;
use crate::traits::*;
use crate::utils::{Comparison, compare};

/// The configuration of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// The size in bytes of the buffer shared with the device.
    pub buffer_len: usize,
    pub layout: Layout,
    pub registers: RegisterMap,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_len: 1 << 20,
            layout: Layout::default(),
            registers: RegisterMap::default(),
        }
    }
}

/// The error returned by a [`Session`].
#[derive(Debug)]
pub enum SessionError<E> {
    Device(E),
    Load(LoadError),
    Codec(CodecError),
}

impl<E: Display> Display for SessionError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Device(e) => write!(f, "Device error: {}", e),
            SessionError::Load(e) => write!(f, "{}", e),
            SessionError::Codec(e) => write!(f, "{}", e),
        }
    }
}

impl<E: Error + 'static> Error for SessionError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Device(e) => Some(e),
            SessionError::Load(e) => Some(e),
            SessionError::Codec(e) => Some(e),
        }
    }
}

impl<E> From<LoadError> for SessionError<E> {
    fn from(e: LoadError) -> Self {
        SessionError::Load(e)
    }
}

impl<E> From<CodecError> for SessionError<E> {
    fn from(e: CodecError) -> Self {
        SessionError::Codec(e)
    }
}

/// A buffer shared with a [`Device`], from loading to verification.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let dir = std::env::temp_dir();
/// let image = dir.join("cl_bitpack_session_doc.dat");
/// write_bitstream(std::fs::File::create(&image)?, &[0x01, 0x80], 64)?;
///
/// let config = SessionConfig { buffer_len: 128, ..Default::default() };
/// let device = SoftwareDevice::new(config.layout, config.registers);
/// let mut session = Session::prepare(device, config, &image)?;
/// assert_eq!(session.initial_len(), 2);
/// // the last two bytes of the first line, after the swap
/// assert_eq!(&session.buffer()?[62..64], &[0x80, 0x01]);
///
/// session.start()?;
/// assert!(session.is_finished()?);
/// assert!(session.verify(&image)?.is_equal());
/// session.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Session<D: Device> {
    device: D,
    config: SessionConfig,
    buffer: BufferId,
    address: u64,
    initial_len: usize,
}

impl<D: Device> Session<D> {
    /// Allocate a buffer on `device` and fill it with the bitstream image at
    /// `initial`, with the bytes of each line reversed.
    ///
    /// The buffer is released if loading fails.
    pub fn prepare(
        mut device: D,
        config: SessionConfig,
        initial: impl AsRef<Path>,
    ) -> Result<Self, SessionError<D::Error>> {
        let (buffer, address) = device
            .allocate(config.buffer_len)
            .map_err(SessionError::Device)?;
        match Self::fill(&mut device, &config, buffer, initial.as_ref()) {
            Ok(initial_len) => Ok(Self {
                device,
                config,
                buffer,
                address,
                initial_len,
            }),
            Err(e) => {
                let _ = device.release(buffer);
                Err(e)
            }
        }
    }

    fn fill(
        device: &mut D,
        config: &SessionConfig,
        buffer: BufferId,
        initial: &Path,
    ) -> Result<usize, SessionError<D::Error>> {
        let data = device.buffer_mut(buffer).map_err(SessionError::Device)?;
        reset(data, config.buffer_len)?;
        let len = load_bitstream_file(initial, data)?;
        change_endian(data, config.buffer_len, &config.layout)?;
        Ok(len)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Return the number of bytes of the initial image.
    pub fn initial_len(&self) -> usize {
        self.initial_len
    }

    /// Return the physical address of the buffer.
    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn buffer(&self) -> Result<&[u8], SessionError<D::Error>> {
        self.device
            .buffer(self.buffer)
            .map_err(SessionError::Device)
    }

    pub fn buffer_mut(&mut self) -> Result<&mut [u8], SessionError<D::Error>> {
        self.device
            .buffer_mut(self.buffer)
            .map_err(SessionError::Device)
    }

    /// Pack scalar values into the buffer, ORing significant bits.
    pub fn pack<V: Value>(
        &mut self,
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), SessionError<D::Error>> {
        let mut codec = <LineCodec>::new(self.config.layout);
        codec.pack(self.buffer_mut()?, start_line, values, width)?;
        Ok(())
    }

    pub fn unpack<V: Value>(
        &self,
        start_line: usize,
        count: usize,
        width: usize,
    ) -> Result<Vec<V>, SessionError<D::Error>> {
        let mut codec = <LineCodec>::new(self.config.layout);
        Ok(codec.unpack(self.buffer()?, start_line, count, width)?)
    }

    /// Tell the device the address of the buffer, in cache lines, and start
    /// it.
    pub fn start(&mut self) -> Result<(), SessionError<D::Error>> {
        let line_address = self.address / self.config.layout.line_bytes() as u64;
        let registers = self.config.registers;
        self.device
            .write_register(registers.offset, line_address)
            .map_err(SessionError::Device)?;
        self.device
            .write_register(registers.offset_valid, 1)
            .map_err(SessionError::Device)
    }

    pub fn is_finished(&mut self) -> Result<bool, SessionError<D::Error>> {
        self.device.is_finished().map_err(SessionError::Device)
    }

    /// Compare the buffer with the bitstream image at `expected`, loaded and
    /// byte-swapped as the initial image was.
    ///
    /// Only the cache lines containing bytes of the expected image are
    /// compared.
    pub fn verify(
        &self,
        expected: impl AsRef<Path>,
    ) -> Result<Comparison, SessionError<D::Error>> {
        let mut image = CacheLineBuf::new(self.config.buffer_len, self.config.layout);
        let len = load_bitstream_file(expected, image.as_mut_slice())?;
        image.change_endian(image.len())?;
        // after the swap, the bytes of a partial line sit at its end
        let line_bytes = self.config.layout.line_bytes();
        let covered = (len.div_ceil(line_bytes) * line_bytes).min(image.len());
        Ok(compare(self.buffer()?, &image.as_slice()[..covered]))
    }

    /// Release the buffer and give back the device.
    pub fn finish(mut self) -> Result<D, SessionError<D::Error>> {
        self.device
            .release(self.buffer)
            .map_err(SessionError::Device)?;
        Ok(self.device)
    }
}
