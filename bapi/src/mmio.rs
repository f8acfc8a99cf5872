//! Memory-mapped register access.
use bytemuck::{Pod, Zeroable};
use derive_more::Display;

/// A physical memory address.
///
/// Firmware runs with device memory identity mapped, so these are written to directly.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Default, Pod, Zeroable, Hash)]
#[display(fmt = "p:0x{:x}", _0)]
#[repr(transparent)]
pub struct PhysicalAddress(pub usize);

impl PhysicalAddress {
    /// The address `offset` bytes past this one.
    pub const fn add(self, offset: usize) -> Self {
        Self(self.0 + offset)
    }
}

/// 32-bit register writes.
pub trait Mmio {
    /// Write `value` to the register at `addr`.
    fn write32(&mut self, addr: PhysicalAddress, value: u32);
}

impl<M: Mmio + ?Sized> Mmio for &mut M {
    fn write32(&mut self, addr: PhysicalAddress, value: u32) {
        (**self).write32(addr, value)
    }
}

/// Writes straight to device memory with volatile stores.
#[derive(Debug)]
pub struct DirectMmio {
    _private: (),
}

impl DirectMmio {
    /// Create a writer that dereferences physical addresses.
    ///
    /// # Safety
    /// Every address later passed to [Mmio::write32] must be identity mapped, 4-byte aligned
    /// device memory that is safe to write at the time of the call.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Mmio for DirectMmio {
    fn write32(&mut self, addr: PhysicalAddress, value: u32) {
        log::trace!("mmio {addr} <- 0x{value:08x}");
        // SAFETY: guaranteed by the contract of `DirectMmio::new`.
        unsafe { (addr.0 as *mut u32).write_volatile(value) }
    }
}
