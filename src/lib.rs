//! UART Idle-Line DMA Driver
//!
//! A `no_std`, `no_alloc` driver core for a USART whose receive side streams
//! into a circular DMA buffer and whose transmit side drains caller buffers
//! through a one-shot DMA stream.
//!
//! The hard part of such a driver is knowing how many bytes arrived. The DMA
//! engine only exposes a remaining-count register; the driver combines the
//! USART idle-line interrupt with the DMA transfer-complete interrupt to
//! turn that counter into exact "N new bytes" reports, without losing or
//! duplicating a byte across buffer wrap-around.
//!
//! # Architecture
//!
//! 1. **Channel** ([`driver::channel`]): lifecycle, DMA transmit start,
//!    polled byte I/O, receive buffer access
//! 2. **Interrupts** ([`driver::interrupt`]): USART, RX DMA and TX DMA
//!    handlers emitting [`SerialEvent`]s to a [`NotificationSink`]
//! 3. **HAL** ([`hal`]): the [`SerialHw`] trait a board implements for its
//!    USART registers and DMA streams
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and driver logging
//! - `async`: Enable [`AsyncSerialState`] with awaitable receive and
//!   transmit-done futures
//!
//! # Example
//!
//! ```ignore
//! use uart_idle_dma::{Capabilities, Channel, LineConfig, SerialEvent};
//!
//! static SERIAL2: Channel<Usart2Hw, 64> = Channel::new(Usart2Hw::new());
//!
//! fn on_event(event: SerialEvent) {
//!     // hand off to the upper serial layer
//! }
//!
//! SERIAL2.configure(LineConfig::new().with_baud_rate(115_200))?;
//! SERIAL2.open(Capabilities::DMA_RX | Capabilities::DMA_TX)?;
//!
//! #[interrupt]
//! fn USART2() {
//!     SERIAL2.on_uart_interrupt(&on_event);
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live in Cargo.toml [lints.clippy].

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::channel::{Channel, ChannelDefault};
pub use driver::config::{
    Capabilities, DataBits, Direction, LineConfig, Parity, State, StopBits,
};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::event::{NotificationSink, RxPath, SerialEvent};
pub use driver::interrupt::UartStatus;
pub use driver::registry::{ChannelId, ChannelRegistry};
pub use hal::SerialHw;

#[cfg(feature = "async")]
pub use sync::asynch::{AsyncSerialState, RxPending};

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        DEFAULT_BAUD_RATE, DEFAULT_RX_BUFFER_SIZE, MAX_BAUD_RATE, MIN_BAUD_RATE,
        REGISTER_QUEUE_LEN, RX_POLL_TIMEOUT, TX_READY_TIMEOUT,
    };

    /// USART status register bits reported by
    /// [`SerialHw::read_status`](crate::SerialHw::read_status).
    pub mod status {
        pub use crate::internal::constants::{
            SR_FE, SR_IDLE, SR_NE, SR_ORE, SR_PE, SR_RXNE, SR_TC, SR_TXE,
        };
    }
}
