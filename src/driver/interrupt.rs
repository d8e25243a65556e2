//! Interrupt dispatch for a serial channel.
//!
//! This module provides the [`UartStatus`] structure for parsing the USART
//! status register, and the three handlers a board's interrupt vectors call:
//!
//! | Vector              | Handler                                   |
//! |---------------------|-------------------------------------------|
//! | USART               | [`Channel::on_uart_interrupt`]            |
//! | RX DMA stream       | [`Channel::on_dma_rx_complete`]           |
//! | TX DMA stream       | [`Channel::on_dma_tx_complete`]           |
//!
//! # Example
//!
//! ```ignore
//! #[interrupt]
//! fn USART2() {
//!     SERIAL2.on_uart_interrupt(&SINK);
//! }
//!
//! #[interrupt]
//! fn DMA1_CHANNEL6() {
//!     SERIAL2.on_dma_rx_complete(&SINK);
//! }
//!
//! #[interrupt]
//! fn DMA1_CHANNEL7() {
//!     SERIAL2.on_dma_tx_complete(&SINK);
//! }
//! ```

use super::channel::Channel;
use super::config::Capabilities;
use super::event::{NotificationSink, SerialEvent};
use crate::hal::SerialHw;
use crate::internal::constants::{
    DR_BYTE_MASK, SR_FE, SR_IDLE, SR_NE, SR_ORE, SR_PE, SR_RXNE, SR_TC, SR_TXE,
};

// =============================================================================
// UART Status
// =============================================================================

/// Status flags parsed from the USART status register.
///
/// ```ignore
/// let status = UartStatus::from_raw(hw.read_status());
/// if status.idle {
///     // reconcile the DMA receive index
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartStatus {
    /// A byte is waiting in the data register
    pub rx_not_empty: bool,
    /// Line went idle after activity
    pub idle: bool,
    /// Last frame left the shift register
    pub tx_complete: bool,
    /// Transmit data register can take a byte
    pub tx_empty: bool,
    /// A byte was lost because the data register was still full
    pub overrun: bool,
    /// Parity mismatch on the received byte
    pub parity_error: bool,
    /// Stop bit missing on the received byte
    pub framing_error: bool,
    /// Noise detected on the received byte
    pub noise: bool,
}

impl UartStatus {
    /// Create from raw status register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            rx_not_empty: (status & SR_RXNE) != 0,
            idle: (status & SR_IDLE) != 0,
            tx_complete: (status & SR_TC) != 0,
            tx_empty: (status & SR_TXE) != 0,
            overrun: (status & SR_ORE) != 0,
            parity_error: (status & SR_PE) != 0,
            framing_error: (status & SR_FE) != 0,
            noise: (status & SR_NE) != 0,
        }
    }

    /// Convert back to the register layout
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.rx_not_empty {
            val |= SR_RXNE;
        }
        if self.idle {
            val |= SR_IDLE;
        }
        if self.tx_complete {
            val |= SR_TC;
        }
        if self.tx_empty {
            val |= SR_TXE;
        }
        if self.overrun {
            val |= SR_ORE;
        }
        if self.parity_error {
            val |= SR_PE;
        }
        if self.framing_error {
            val |= SR_FE;
        }
        if self.noise {
            val |= SR_NE;
        }
        val
    }

    /// Check if any receive-side error is flagged
    #[inline]
    pub fn has_error(&self) -> bool {
        self.overrun || self.parity_error || self.framing_error || self.noise
    }

    /// Conditions cleared by the status-then-data register read sequence
    #[inline]
    fn needs_data_read(&self) -> bool {
        self.idle || self.overrun
    }
}

// =============================================================================
// Handlers
// =============================================================================

impl<H: SerialHw, const CAP: usize> Channel<H, CAP> {
    /// Current USART status
    pub fn uart_status(&self) -> UartStatus {
        UartStatus::from_raw(self.hw().read_status())
    }

    /// USART interrupt handler
    ///
    /// Services, in order: byte-ready (when byte receive is enabled), idle
    /// line (when DMA receive is enabled), transmission complete, overrun.
    ///
    /// The data register is read at most once per invocation. A byte-ready
    /// read takes the byte into the event and also clears idle and overrun;
    /// otherwise idle and overrun are cleared by a discard read at the end.
    pub fn on_uart_interrupt<S>(&self, sink: &S)
    where
        S: NotificationSink + ?Sized,
    {
        let status = self.uart_status();
        let capabilities = self.capabilities();
        let mut data_read = false;

        if status.rx_not_empty && capabilities.contains(Capabilities::BYTE_RX) {
            let byte = (self.hw().read_data() & DR_BYTE_MASK) as u8;
            data_read = true;
            sink.notify(SerialEvent::byte(byte));
        }

        if status.idle && capabilities.contains(Capabilities::DMA_RX) {
            let new_bytes = self.rx_index.on_idle(|| self.hw().rx_dma_remaining());
            if let Some(count) = new_bytes {
                sink.notify(SerialEvent::rx_dma(count));
            }
        }

        if status.tx_complete {
            self.hw().clear_status(SR_TC);
        }

        #[cfg(feature = "defmt")]
        if status.overrun {
            defmt::warn!("uart overrun, byte lost");
        } else if status.has_error() {
            defmt::debug!("uart line error: {}", status);
        }

        if status.needs_data_read() && !data_read {
            let _ = self.hw().read_data();
        }
    }

    /// RX DMA stream interrupt handler
    ///
    /// On transfer complete, reports the tail of the ring not yet emitted and
    /// resets the receive offset to 0, then clears the flag.
    pub fn on_dma_rx_complete<S>(&self, sink: &S)
    where
        S: NotificationSink + ?Sized,
    {
        if !self.hw().rx_dma_complete() {
            return;
        }

        if self.capabilities().contains(Capabilities::DMA_RX) {
            if let Some(count) = self.rx_index.on_buffer_full() {
                sink.notify(SerialEvent::rx_dma(count));
            }
        }
        self.hw().clear_rx_dma_complete();
    }

    /// TX DMA stream interrupt handler
    ///
    /// On transfer complete, clears the flag and releases the transmit slot
    /// before emitting [`SerialEvent::TxDone`], so the sink may start the
    /// next transmit directly. A completion with no transmit in flight emits
    /// nothing.
    pub fn on_dma_tx_complete<S>(&self, sink: &S)
    where
        S: NotificationSink + ?Sized,
    {
        if !self.hw().tx_dma_complete() {
            return;
        }

        self.hw().clear_tx_dma_complete();
        if self.tx_slot.release().is_some() {
            sink.notify(SerialEvent::TxDone);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
