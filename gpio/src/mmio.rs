//! MMIO access seams.
//!
//! All register traffic in this crate goes through [`RegisterBus`], and
//! all settle waits go through [`Delay`]. The real implementations are
//! a volatile-access bus and whatever timer the platform provides;
//! tests substitute recording fakes.

/// 32-bit register bus.
///
/// One call means exactly one bus access; implementations must not
/// cache, coalesce, or reorder.
pub trait RegisterBus {
    /// Read a 32-bit register at `addr`.
    fn read(&mut self, addr: usize) -> u32;

    /// Write a 32-bit register at `addr`.
    fn write(&mut self, addr: usize, value: u32);
}

/// Busy-wait delay collaborator.
///
/// Waits at least `units` platform time-units; no granularity promise
/// beyond "at least requested".
pub trait Delay {
    fn wait(&mut self, units: u32);
}

/// Direct memory-mapped register access.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create a direct MMIO bus.
    ///
    /// # Safety
    /// The peripheral register window must be mapped (or the CPU must
    /// be running with identity mapping) for every address later passed
    /// to [`RegisterBus::read`] / [`RegisterBus::write`].
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&mut self, addr: usize) -> u32 {
        // Safety: construction asserted the window is mapped.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write(&mut self, addr: usize, value: u32) {
        // Safety: construction asserted the window is mapped.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }
}
