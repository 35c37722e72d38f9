/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

/// Identifier of a buffer allocated by a [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// The offsets of the registers used to hand a buffer to an accelerator.
///
/// The accelerator is told the address of the buffer, in cache lines, through
/// [`offset`](RegisterMap::offset), and starts when `1` is written to
/// [`offset_valid`](RegisterMap::offset_valid); it raises
/// [`finished`](RegisterMap::finished) to `1` when done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegisterMap {
    pub offset: u64,
    pub offset_valid: u64,
    pub finished: u64,
    pub cycles: u64,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            offset: 0x0,
            offset_valid: 0x8,
            finished: 0x80,
            cycles: 0x88,
        }
    }
}

/// The accelerator sharing buffers with the host.
///
/// Implementations own the memory they allocate: the host accesses it
/// through [`buffer`](Device::buffer) and [`buffer_mut`](Device::buffer_mut)
/// while the accelerator is idle. The host must not touch a buffer between
/// starting the accelerator and observing [`is_finished`](Device::is_finished).
pub trait Device {
    type Error: Error + Send + Sync + 'static;

    /// Allocate a zeroed buffer of `len` bytes, returning its identifier and
    /// its physical address.
    fn allocate(&mut self, len: usize) -> Result<(BufferId, u64), Self::Error>;

    fn buffer(&self, id: BufferId) -> Result<&[u8], Self::Error>;

    fn buffer_mut(&mut self, id: BufferId) -> Result<&mut [u8], Self::Error>;

    /// Write a 64-bit memory-mapped register.
    fn write_register(&mut self, offset: u64, value: u64) -> Result<(), Self::Error>;

    /// Read a 64-bit memory-mapped register.
    fn read_register(&mut self, offset: u64) -> Result<u64, Self::Error>;

    /// Return whether the accelerator has signalled completion.
    fn is_finished(&mut self) -> Result<bool, Self::Error>;

    /// Return whether the accelerator is simulated.
    fn is_simulated(&self) -> bool;

    /// Give a buffer back to the device.
    fn release(&mut self, id: BufferId) -> Result<(), Self::Error>;
}
