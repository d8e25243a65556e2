//! Receive index tracker for the circular DMA buffer.
//!
//! The DMA engine writes into the ring on its own; the only view software has
//! of the fill level is the stream's remaining-count register. This tracker
//! turns successive remaining-count observations into "N new bytes" reports
//! while keeping `last_emitted` (the offset already handed to the consumer)
//! consistent across the UART idle-line handler and the DMA complete handler,
//! which run on different interrupt lines and may preempt each other.
//!
//! Every read-compute-update of `last_emitted` happens inside one critical
//! section. The remaining-count register is read inside the same section so
//! the observation and the update are one unit.

use core::cell::Cell;

use critical_section::Mutex;

/// Index bookkeeping for one circular receive buffer of `capacity` bytes.
///
/// Never touches buffer contents.
pub(crate) struct RxIndexTracker {
    capacity: usize,
    last_emitted: Mutex<Cell<usize>>,
}

impl RxIndexTracker {
    /// Create a tracker for a ring of `capacity` bytes, starting at offset 0.
    pub(crate) const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            last_emitted: Mutex::new(Cell::new(0)),
        }
    }

    /// Offset already reported to the consumer, always `< capacity`.
    pub(crate) fn last_emitted(&self) -> usize {
        critical_section::with(|cs| self.last_emitted.borrow(cs).get())
    }

    /// Idle-line event.
    ///
    /// `remaining` is called inside the critical section to sample the
    /// hardware remaining-count. Returns the number of newly received bytes,
    /// or `None` when there is nothing new to report.
    ///
    /// A sample at or behind the last emitted offset means the DMA already
    /// wrapped but the buffer-full event has not been processed yet. The
    /// offset is left untouched so that event reports the tail and a later
    /// idle event picks up the bytes past the wrap.
    pub(crate) fn on_idle<F>(&self, remaining: F) -> Option<usize>
    where
        F: FnOnce() -> usize,
    {
        let new_bytes = critical_section::with(|cs| {
            let last = self.last_emitted.borrow(cs);
            let received = self.capacity.saturating_sub(remaining());
            if received >= self.capacity || received <= last.get() {
                return 0;
            }
            let new_bytes = received - last.get();
            last.set(received);
            new_bytes
        });

        (new_bytes > 0).then_some(new_bytes)
    }

    /// Buffer-full event: the remaining-count reached zero and the hardware
    /// wrapped its write pointer.
    ///
    /// Reports the tail not yet emitted and resets the offset to 0.
    pub(crate) fn on_buffer_full(&self) -> Option<usize> {
        let new_bytes = critical_section::with(|cs| {
            let last = self.last_emitted.borrow(cs);
            let new_bytes = self.capacity - last.get();
            last.set(0);
            new_bytes
        });

        (new_bytes > 0).then_some(new_bytes)
    }

    /// Drop any partially tracked reception.
    pub(crate) fn reset(&self) {
        critical_section::with(|cs| self.last_emitted.borrow(cs).set(0));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
