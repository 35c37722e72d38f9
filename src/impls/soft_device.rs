/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::impls::CacheLineBuf;
use crate::traits::*;

/// Base of the fake physical addresses handed out by [`SoftwareDevice`].
pub const SOFT_BASE_ADDRESS: u64 = 0x1_0000_0000;

/// Alignment of the fake physical addresses handed out by
/// [`SoftwareDevice`].
pub const SOFT_PAGE_BYTES: u64 = 4096;

/// The error returned by [`SoftwareDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftwareDeviceError {
    /// No live buffer has this identifier.
    UnknownBuffer(BufferId),
    /// The device was started with an address, in cache lines, that is not
    /// the start of a live buffer.
    NoBufferAt { line_address: u64 },
}

impl Error for SoftwareDeviceError {}

impl Display for SoftwareDeviceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SoftwareDeviceError::UnknownBuffer(id) => write!(f, "Unknown buffer {}", id.0),
            SoftwareDeviceError::NoBufferAt { line_address } => write!(
                f,
                "No buffer starts at cache-line address {:#x}",
                line_address
            ),
        }
    }
}

type Kernel = Box<dyn FnMut(&mut [u8])>;

/// An in-memory [`Device`].
///
/// Buffers are [`CacheLineBuf`]s at fake, page-aligned physical addresses.
/// Registers are plain memory reading as zero until written, except that
/// writing `1` to [`offset_valid`](RegisterMap::offset_valid) runs the
/// device kernel synchronously on the buffer whose cache-line address is in
/// [`offset`](RegisterMap::offset), stores in
/// [`cycles`](RegisterMap::cycles) the number of lines of the buffer, and
/// raises [`finished`](RegisterMap::finished).
///
/// The default kernel leaves the buffer unchanged.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let regs = RegisterMap::default();
/// let mut device = SoftwareDevice::new(Layout::default(), regs)
///     .with_kernel(|data| data.iter_mut().for_each(|b| *b = !*b));
/// let (id, address) = device.allocate(128)?;
/// device.write_register(regs.offset, address / 64)?;
/// device.write_register(regs.offset_valid, 1)?;
/// assert!(device.is_finished()?);
/// assert_eq!(device.read_register(regs.cycles)?, 2);
/// assert!(device.buffer(id)?.iter().all(|&b| b == 0xff));
/// device.release(id)?;
/// # Ok::<(), SoftwareDeviceError>(())
/// ```
pub struct SoftwareDevice {
    layout: Layout,
    registers: RegisterMap,
    values: HashMap<u64, u64>,
    buffers: BTreeMap<BufferId, (u64, CacheLineBuf)>,
    next_id: usize,
    next_address: u64,
    kernel: Kernel,
}

impl SoftwareDevice {
    pub fn new(layout: Layout, registers: RegisterMap) -> Self {
        Self {
            layout,
            registers,
            values: HashMap::new(),
            buffers: BTreeMap::new(),
            next_id: 0,
            next_address: SOFT_BASE_ADDRESS,
            kernel: Box::new(|_| {}),
        }
    }

    /// Set the computation performed when the device is started.
    pub fn with_kernel(mut self, kernel: impl FnMut(&mut [u8]) + 'static) -> Self {
        self.kernel = Box::new(kernel);
        self
    }

    pub fn registers(&self) -> RegisterMap {
        self.registers
    }

    fn entry(&self, id: BufferId) -> Result<&(u64, CacheLineBuf), SoftwareDeviceError> {
        self.buffers
            .get(&id)
            .ok_or(SoftwareDeviceError::UnknownBuffer(id))
    }

    fn start(&mut self) -> Result<(), SoftwareDeviceError> {
        let line_address = self.values.get(&self.registers.offset).copied().unwrap_or(0);
        let line_bytes = self.layout.line_bytes() as u64;
        let (_, buffer) = self
            .buffers
            .values_mut()
            .find(|(address, _)| address / line_bytes == line_address)
            .ok_or(SoftwareDeviceError::NoBufferAt { line_address })?;
        (self.kernel)(buffer.as_mut_slice());
        let lines = buffer.lines() as u64;
        self.values.insert(self.registers.cycles, lines);
        self.values.insert(self.registers.finished, 1);
        Ok(())
    }
}

impl Debug for SoftwareDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareDevice")
            .field("layout", &self.layout)
            .field("registers", &self.registers)
            .field("values", &self.values)
            .field("buffers", &self.buffers.len())
            .finish_non_exhaustive()
    }
}

impl Device for SoftwareDevice {
    type Error = SoftwareDeviceError;

    fn allocate(&mut self, len: usize) -> Result<(BufferId, u64), Self::Error> {
        let id = BufferId(self.next_id);
        let address = self.next_address;
        self.next_id += 1;
        self.next_address += (len as u64).div_ceil(SOFT_PAGE_BYTES).max(1) * SOFT_PAGE_BYTES;
        self.buffers
            .insert(id, (address, CacheLineBuf::new(len, self.layout)));
        Ok((id, address))
    }

    fn buffer(&self, id: BufferId) -> Result<&[u8], Self::Error> {
        Ok(self.entry(id)?.1.as_slice())
    }

    fn buffer_mut(&mut self, id: BufferId) -> Result<&mut [u8], Self::Error> {
        self.buffers
            .get_mut(&id)
            .map(|(_, buffer)| buffer.as_mut_slice())
            .ok_or(SoftwareDeviceError::UnknownBuffer(id))
    }

    fn write_register(&mut self, offset: u64, value: u64) -> Result<(), Self::Error> {
        self.values.insert(offset, value);
        if offset == self.registers.offset_valid && value == 1 {
            self.values.insert(self.registers.finished, 0);
            self.start()?;
        }
        Ok(())
    }

    fn read_register(&mut self, offset: u64) -> Result<u64, Self::Error> {
        Ok(self.values.get(&offset).copied().unwrap_or(0))
    }

    fn is_finished(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_register(self.registers.finished)? == 1)
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn release(&mut self, id: BufferId) -> Result<(), Self::Error> {
        self.buffers
            .remove(&id)
            .map(|_| ())
            .ok_or(SoftwareDeviceError::UnknownBuffer(id))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_addresses_are_page_aligned() {
        let mut device = SoftwareDevice::new(Layout::default(), RegisterMap::default());
        let (a, pa) = device.allocate(10).unwrap();
        let (b, pb) = device.allocate(5000).unwrap();
        let (_, pc) = device.allocate(0).unwrap();
        assert_ne!(a, b);
        assert_eq!(pa, SOFT_BASE_ADDRESS);
        assert_eq!(pb, SOFT_BASE_ADDRESS + 4096);
        assert_eq!(pc, SOFT_BASE_ADDRESS + 3 * 4096);
        assert_eq!(device.buffer(b).unwrap().len(), 5000);
    }

    #[test]
    fn test_release() {
        let mut device = SoftwareDevice::new(Layout::default(), RegisterMap::default());
        let (id, _) = device.allocate(64).unwrap();
        device.release(id).unwrap();
        assert_eq!(device.release(id), Err(SoftwareDeviceError::UnknownBuffer(id)));
        assert!(device.buffer_mut(id).is_err());
    }

    #[test]
    fn test_start_without_buffer() {
        let regs = RegisterMap::default();
        let mut device = SoftwareDevice::new(Layout::default(), regs);
        device.write_register(regs.offset, 42).unwrap();
        assert_eq!(
            device.write_register(regs.offset_valid, 1),
            Err(SoftwareDeviceError::NoBufferAt { line_address: 42 })
        );
        assert!(!device.is_finished().unwrap());
    }

    #[test]
    fn test_kernel_sees_selected_buffer() {
        let regs = RegisterMap::default();
        let mut device = SoftwareDevice::new(Layout::default(), regs).with_kernel(|data| {
            data[0] = 0x42;
        });
        let (first, _) = device.allocate(64).unwrap();
        let (second, address) = device.allocate(64).unwrap();
        device.write_register(regs.offset, address / 64).unwrap();
        device.write_register(regs.offset_valid, 1).unwrap();
        assert_eq!(device.buffer(first).unwrap()[0], 0);
        assert_eq!(device.buffer(second).unwrap()[0], 0x42);
        assert!(device.is_simulated());
    }
}
