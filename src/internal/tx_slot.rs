//! Single-slot transmit descriptor.
//!
//! Holds the caller's buffer while a DMA transmit is in flight. Claiming the
//! slot is a check-and-set under a critical section, so a second
//! `begin_transmit` racing the first sees `Busy`.

use core::cell::Cell;

use critical_section::Mutex;

use crate::driver::error::{DmaError, DmaResult};

/// Transmit descriptor: the in-flight buffer, or empty.
pub(crate) struct TxSlot {
    active: Mutex<Cell<Option<&'static [u8]>>>,
}

impl TxSlot {
    /// Create an empty slot.
    pub(crate) const fn new() -> Self {
        Self {
            active: Mutex::new(Cell::new(None)),
        }
    }

    /// Claim the slot for `buffer`.
    ///
    /// # Errors
    /// - `Busy` - a transmit is already in flight
    pub(crate) fn claim(&self, buffer: &'static [u8]) -> DmaResult<()> {
        critical_section::with(|cs| {
            let active = self.active.borrow(cs);
            if active.get().is_some() {
                return Err(DmaError::Busy);
            }
            active.set(Some(buffer));
            Ok(())
        })
    }

    /// Release the slot, returning the buffer that was in flight.
    pub(crate) fn release(&self) -> Option<&'static [u8]> {
        critical_section::with(|cs| self.active.borrow(cs).take())
    }

    /// True while a transmit is in flight.
    pub(crate) fn is_busy(&self) -> bool {
        critical_section::with(|cs| self.active.borrow(cs).get().is_some())
    }
}
