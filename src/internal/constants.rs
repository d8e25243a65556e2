//! Centralized Constants
//!
//! Single source of truth for the magic numbers used by the UART driver.
//!
//! # Organization
//!
//! - **Status register bits**: USART status-register layout the
//!   [`SerialHw`](crate::hal::SerialHw) collaborator reports in
//! - **Buffer sizes**: default receive ring capacity
//! - **Line limits**: supported baud rate range
//! - **Timing**: bounded hardware-ready polls

// =============================================================================
// Status Register Bits (USART_SR layout)
// =============================================================================

/// Parity error
pub const SR_PE: u32 = 1 << 0;

/// Framing error
pub const SR_FE: u32 = 1 << 1;

/// Noise detected
pub const SR_NE: u32 = 1 << 2;

/// Overrun error - a byte arrived while the data register was still full
pub const SR_ORE: u32 = 1 << 3;

/// Idle line detected
pub const SR_IDLE: u32 = 1 << 4;

/// Read data register not empty
pub const SR_RXNE: u32 = 1 << 5;

/// Transmission complete
pub const SR_TC: u32 = 1 << 6;

/// Transmit data register empty
pub const SR_TXE: u32 = 1 << 7;

/// Mask of the received byte in the data register
pub const DR_BYTE_MASK: u16 = 0x00FF;

// =============================================================================
// Buffer Sizes
// =============================================================================

/// Default circular receive buffer capacity in bytes
pub const DEFAULT_RX_BUFFER_SIZE: usize = 64;

/// Byte-ready bytes the async state holds for a task; later bytes are dropped
pub const REGISTER_QUEUE_LEN: usize = 16;

// =============================================================================
// Line Limits
// =============================================================================

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Lowest supported baud rate
pub const MIN_BAUD_RATE: u32 = 1_200;

/// Highest supported baud rate (oversampling by 16 at 72 MHz)
pub const MAX_BAUD_RATE: u32 = 4_500_000;

// =============================================================================
// Timing
// =============================================================================

/// Maximum iterations waiting for the transmit data register to drain
pub const TX_READY_TIMEOUT: u32 = 100_000;

/// Maximum iterations a blocking read spins before reporting a timeout
pub const RX_POLL_TIMEOUT: u32 = 1_000_000;
