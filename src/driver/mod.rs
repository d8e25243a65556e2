//! Core driver components for a DMA-backed UART channel.
//!
//! - [`config`] - Line parameters, capabilities and lifecycle state
//! - [`error`] - Error types and result aliases
//! - [`event`] - Notifications delivered to the upper serial layer
//! - [`channel`] - The channel state machine, transmit start and byte I/O
//! - [`interrupt`] - Status parsing and the three interrupt handlers
//! - [`registry`] - Fixed table of channels indexed by id
//!
//! # Example
//!
//! ```ignore
//! use uart_idle_dma::driver::{Capabilities, Channel, LineConfig};
//!
//! static SERIAL2: Channel<Usart2Hw, 64> = Channel::new(Usart2Hw::new());
//!
//! SERIAL2.configure(LineConfig::new().with_baud_rate(57_600))?;
//! SERIAL2.open(Capabilities::DMA_RX | Capabilities::DMA_TX)?;
//! ```

// Submodules
pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod interrupt;
pub mod registry;

// Re-exports for convenience
pub use channel::{Channel, ChannelDefault};
pub use config::{Capabilities, DataBits, Direction, LineConfig, Parity, State, StopBits};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use event::{NotificationSink, RxPath, SerialEvent};
pub use interrupt::UartStatus;
pub use registry::{ChannelId, ChannelRegistry};
