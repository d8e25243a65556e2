//! Notifications delivered to the upper serial layer.
//!
//! Every handler invocation emits at most one event per serviced cause. Events
//! are never batched and never dropped, except that a receive reconciliation
//! finding zero new bytes emits nothing.

/// Where newly received bytes can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxPath {
    /// One byte taken from the data register by the interrupt handler and
    /// carried here
    Register(u8),
    /// Bytes landed in the circular DMA buffer after the previously reported
    /// offset; fetch them with [`Channel::copy_rx`](crate::Channel::copy_rx)
    Dma,
}

/// Driver event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialEvent {
    /// `count` new bytes are available
    RxReady {
        /// Number of new bytes
        count: usize,
        /// Where the bytes are
        path: RxPath,
    },
    /// The in-flight DMA transmit has fully drained
    TxDone,
}

impl SerialEvent {
    /// Shorthand for a DMA receive report
    #[inline(always)]
    pub const fn rx_dma(count: usize) -> Self {
        SerialEvent::RxReady {
            count,
            path: RxPath::Dma,
        }
    }

    /// Shorthand for a byte taken from the data register
    #[inline(always)]
    pub const fn byte(value: u8) -> Self {
        SerialEvent::RxReady {
            count: 1,
            path: RxPath::Register(value),
        }
    }

    /// Received byte count carried by this event (0 for `TxDone`)
    pub const fn rx_count(&self) -> usize {
        match self {
            SerialEvent::RxReady { count, .. } => *count,
            SerialEvent::TxDone => 0,
        }
    }
}

/// Consumer of driver events
///
/// Called from interrupt context with interrupts enabled. Implementations
/// must not block. Calling back into the channel (for example
/// [`Channel::begin_transmit`](crate::Channel::begin_transmit) from a
/// `TxDone`) is allowed.
pub trait NotificationSink {
    /// Deliver one event
    fn notify(&self, event: SerialEvent);
}

impl<F> NotificationSink for F
where
    F: Fn(SerialEvent),
{
    fn notify(&self, event: SerialEvent) {
        self(event);
    }
}
