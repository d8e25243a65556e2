//! Serial channel: one physical UART line with its DMA streams.
//!
//! A [`Channel`] owns the circular receive buffer, the receive index tracker
//! and the transmit descriptor, and drives a [`SerialHw`] implementation
//! through the `closed -> configured -> open -> closed` lifecycle.
//!
//! Every method takes `&self` so one `static` channel can be shared between
//! thread code and the three interrupt handlers (UART, DMA RX complete,
//! DMA TX complete). Shared state is guarded by short critical sections;
//! handlers never hold one across a notification.
//!
//! # Example
//!
//! ```ignore
//! static SERIAL2: Channel<Usart2Hw, 64> = Channel::new(Usart2Hw::new());
//!
//! SERIAL2.configure(LineConfig::new().with_baud_rate(57_600))?;
//! SERIAL2.open(Capabilities::DMA_RX | Capabilities::DMA_TX)?;
//!
//! static GREETING: [u8; 5] = *b"hello";
//! SERIAL2.begin_transmit(&GREETING, GREETING.len())?;
//! ```

use core::cell::UnsafeCell;
use core::sync::atomic::{Ordering, compiler_fence};

use super::config::{Capabilities, Direction, LineConfig, State};
use super::error::{ConfigError, DmaError, IoError, Result};
use crate::hal::SerialHw;
use crate::internal::constants::{
    DEFAULT_RX_BUFFER_SIZE, DR_BYTE_MASK, RX_POLL_TIMEOUT, SR_RXNE, SR_TC, SR_TXE,
    TX_READY_TIMEOUT,
};
use crate::internal::rx_index::RxIndexTracker;
use crate::internal::tx_slot::TxSlot;
use crate::sync::CriticalSectionCell;

/// Lifecycle state, active engines and applied line parameters
#[derive(Debug, Clone, Copy)]
struct Control {
    state: State,
    capabilities: Capabilities,
    line: LineConfig,
}

impl Control {
    const fn new() -> Self {
        Self {
            state: State::Closed,
            capabilities: Capabilities::NONE,
            line: LineConfig::new(),
        }
    }
}

/// Circular receive buffer written by the DMA engine
struct RxBuffer<const CAP: usize>(UnsafeCell<[u8; CAP]>);

impl<const CAP: usize> RxBuffer<CAP> {
    const fn new() -> Self {
        Self(UnsafeCell::new([0u8; CAP]))
    }

    fn as_mut_ptr(&self) -> *mut u8 {
        self.0.get().cast::<u8>()
    }
}

// SAFETY: the buffer is only written by DMA hardware and only read through
// raw-pointer copies in `Channel::copy_rx`; no references to its contents are
// ever handed out.
unsafe impl<const CAP: usize> Sync for RxBuffer<CAP> {}

/// One serial line.
///
/// # Type Parameters
/// * `H` - Hardware collaborator for this USART and its DMA streams
/// * `CAP` - Circular receive buffer capacity in bytes
pub struct Channel<H, const CAP: usize> {
    hw: H,
    control: CriticalSectionCell<Control>,
    pub(super) rx_index: RxIndexTracker,
    pub(super) tx_slot: TxSlot,
    rx_buffer: RxBuffer<CAP>,
}

/// Channel with the default 64-byte receive buffer
pub type ChannelDefault<H> = Channel<H, DEFAULT_RX_BUFFER_SIZE>;

impl<H: SerialHw, const CAP: usize> Channel<H, CAP> {
    /// Create a closed channel (const, suitable for static initialization)
    pub const fn new(hw: H) -> Self {
        const { assert!(CAP > 0, "receive buffer capacity must be non-zero") };
        Self {
            hw,
            control: CriticalSectionCell::new(Control::new()),
            rx_index: RxIndexTracker::new(CAP),
            tx_slot: TxSlot::new(),
            rx_buffer: RxBuffer::new(),
        }
    }

    /// Hardware collaborator
    #[inline(always)]
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.control.get().state
    }

    /// Currently active engines
    pub fn capabilities(&self) -> Capabilities {
        self.control.get().capabilities
    }

    /// Last applied line parameters
    pub fn line_config(&self) -> LineConfig {
        self.control.get().line
    }

    /// Receive buffer capacity in bytes
    #[inline(always)]
    pub const fn rx_capacity(&self) -> usize {
        CAP
    }

    /// Offset in the receive buffer already reported to the consumer
    pub fn rx_offset(&self) -> usize {
        self.rx_index.last_emitted()
    }

    /// True while a DMA transmit is in flight
    pub fn is_transmitting(&self) -> bool {
        self.tx_slot.is_busy()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Apply line parameters
    ///
    /// Valid from `Closed` or `Configured`; moves the channel to `Configured`.
    ///
    /// # Errors
    /// - `InvalidBaudRate` - baud rate out of range (state unchanged)
    /// - `InvalidState` - channel is open
    pub fn configure(&self, config: LineConfig) -> Result<()> {
        config.validate()?;

        self.control.with(|ctl| {
            if ctl.state == State::Open {
                return Err(ConfigError::InvalidState.into());
            }

            self.hw.apply_line_config(&config);
            ctl.line = config;
            ctl.state = State::Configured;

            #[cfg(feature = "defmt")]
            defmt::debug!("uart configured: {}", config);

            Ok(())
        })
    }

    /// Arm the requested engines
    ///
    /// Valid from `Configured`; moves the channel to `Open`.
    ///
    /// # Errors
    /// - `NoCapabilities` - empty capability set
    /// - `InvalidState` - channel not configured
    pub fn open(&self, capabilities: Capabilities) -> Result<()> {
        if capabilities.is_empty() {
            return Err(ConfigError::NoCapabilities.into());
        }

        self.control.with(|ctl| {
            if ctl.state != State::Configured {
                return Err(ConfigError::InvalidState.into());
            }

            self.arm(capabilities);
            ctl.capabilities = capabilities;
            ctl.state = State::Open;
            self.hw.set_irq_line(Self::needs_irq_line(capabilities));

            #[cfg(feature = "defmt")]
            defmt::info!("uart open: capabilities={=u8:#b}", capabilities.bits());

            Ok(())
        })
    }

    /// Disarm every active engine and return to `Closed`
    ///
    /// Any in-flight transmit is aborted and any partially tracked reception
    /// is dropped.
    ///
    /// # Errors
    /// - `InvalidState` - channel not open
    pub fn suspend(&self) -> Result<()> {
        self.control.with(|ctl| {
            if ctl.state != State::Open {
                return Err(ConfigError::InvalidState.into());
            }
            self.close(ctl);
            Ok(())
        })
    }

    /// Enable or disable byte-interrupt receive while open
    ///
    /// Clearing the last active engine suspends the channel.
    ///
    /// # Errors
    /// - `InvalidState` - channel not open
    pub fn set_interrupt_enabled(&self, enable: bool) -> Result<()> {
        self.toggle(Capabilities::BYTE_RX, enable)
    }

    /// Enable or disable one DMA direction while open
    ///
    /// Enabling RX restarts the circular transfer at offset 0. Disabling TX
    /// aborts any in-flight transmit. Clearing the last active engine
    /// suspends the channel.
    ///
    /// # Errors
    /// - `InvalidState` - channel not open
    pub fn set_dma_enabled(&self, direction: Direction, enable: bool) -> Result<()> {
        self.toggle(direction.capability(), enable)
    }

    fn toggle(&self, capability: Capabilities, enable: bool) -> Result<()> {
        self.control.with(|ctl| {
            if ctl.state != State::Open {
                return Err(ConfigError::InvalidState.into());
            }

            let active = ctl.capabilities.contains(capability);
            if enable && !active {
                self.arm(capability);
            } else if !enable && active {
                self.disarm(capability);
            }
            ctl.capabilities.set(capability, enable);

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "uart capability {=u8:#b} -> {}, active={=u8:#b}",
                capability.bits(),
                enable,
                ctl.capabilities.bits()
            );

            if ctl.capabilities.is_empty() {
                self.close(ctl);
            } else {
                self.hw.set_irq_line(Self::needs_irq_line(ctl.capabilities));
            }
            Ok(())
        })
    }

    fn arm(&self, capabilities: Capabilities) {
        if capabilities.contains(Capabilities::DMA_RX) {
            self.rx_index.reset();
            self.hw.start_rx_dma(self.rx_buffer.as_mut_ptr(), CAP);
        }
        if capabilities.contains(Capabilities::DMA_TX) {
            self.hw.arm_tx_dma();
        }
        if capabilities.contains(Capabilities::BYTE_RX) {
            self.hw.set_byte_interrupt(true);
        }
    }

    fn disarm(&self, capabilities: Capabilities) {
        if capabilities.contains(Capabilities::BYTE_RX) {
            self.hw.set_byte_interrupt(false);
        }
        if capabilities.contains(Capabilities::DMA_RX) {
            self.hw.stop_rx_dma();
            self.rx_index.reset();
        }
        if capabilities.contains(Capabilities::DMA_TX) {
            self.hw.disarm_tx_dma();
            self.tx_slot.release();
        }
    }

    fn close(&self, ctl: &mut Control) {
        self.disarm(ctl.capabilities);
        self.hw.set_irq_line(false);
        self.rx_index.reset();
        ctl.capabilities = Capabilities::NONE;
        ctl.state = State::Closed;

        #[cfg(feature = "defmt")]
        defmt::info!("uart suspended");
    }

    /// Both receive paths signal through the USART interrupt line
    const fn needs_irq_line(capabilities: Capabilities) -> bool {
        capabilities.contains(Capabilities::BYTE_RX) || capabilities.contains(Capabilities::DMA_RX)
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Start a DMA transmit of `buffer[..size]` and return immediately
    ///
    /// Completion is reported later as [`SerialEvent::TxDone`] from
    /// [`on_dma_tx_complete`](Self::on_dma_tx_complete).
    ///
    /// [`SerialEvent::TxDone`]: crate::SerialEvent::TxDone
    ///
    /// # Errors
    /// - `InvalidLength` - `size` is zero or exceeds `buffer.len()`
    /// - `InvalidState` - channel not open
    /// - `NotArmed` - DMA transmit not enabled
    /// - `Busy` - a transmit is already in flight (no state change)
    pub fn begin_transmit(&self, buffer: &'static [u8], size: usize) -> Result<()> {
        if size == 0 || size > buffer.len() {
            return Err(DmaError::InvalidLength.into());
        }
        let frame = &buffer[..size];

        self.control.with(|ctl| {
            if ctl.state != State::Open {
                return Err(ConfigError::InvalidState.into());
            }
            if !ctl.capabilities.contains(Capabilities::DMA_TX) {
                return Err(DmaError::NotArmed.into());
            }

            self.tx_slot.claim(frame)?;
            self.hw.start_tx_dma(frame.as_ptr(), frame.len());

            #[cfg(feature = "defmt")]
            defmt::trace!("uart tx dma start: {=usize} bytes", size);

            Ok(())
        })
    }

    // =========================================================================
    // Single-byte I/O
    // =========================================================================

    /// Write one byte through the data register
    ///
    /// Polls the transmit-empty flag; does not depend on interrupts.
    ///
    /// # Errors
    /// - `InvalidState` - line not configured
    /// - `Timeout` - transmit register never drained
    pub fn write_byte(&self, value: u8) -> Result<()> {
        if self.state() == State::Closed {
            return Err(IoError::InvalidState.into());
        }

        for _ in 0..TX_READY_TIMEOUT {
            if self.hw.read_status() & SR_TXE != 0 {
                self.hw.write_data(u16::from(value));
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(IoError::Timeout.into())
    }

    /// Non-blocking poll of the receive data register
    pub fn read_byte(&self) -> Option<u8> {
        if self.hw.read_status() & SR_RXNE != 0 {
            Some((self.hw.read_data() & DR_BYTE_MASK) as u8)
        } else {
            None
        }
    }

    /// True if the transmit data register can take a byte
    pub fn tx_ready(&self) -> bool {
        self.hw.read_status() & SR_TXE != 0
    }

    /// True if a byte is waiting in the receive data register
    pub fn rx_ready(&self) -> bool {
        self.hw.read_status() & SR_RXNE != 0
    }

    /// Wait for the last written byte to leave the shift register
    ///
    /// # Errors
    /// - `Timeout` - transmission never completed
    pub fn flush(&self) -> Result<()> {
        for _ in 0..TX_READY_TIMEOUT {
            if self.hw.read_status() & SR_TC != 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(IoError::Timeout.into())
    }

    // =========================================================================
    // Receive buffer access
    // =========================================================================

    /// Copy bytes out of the circular receive buffer
    ///
    /// Starts at `start` (taken modulo the capacity) and wraps at the end of
    /// the ring. Copies `min(out.len(), capacity)` bytes and returns that
    /// count. Only bytes already reported through
    /// [`SerialEvent::RxReady`](crate::SerialEvent::RxReady) are meaningful.
    pub fn copy_rx(&self, start: usize, out: &mut [u8]) -> usize {
        let len = out.len().min(CAP);
        let start = start % CAP;
        let first = len.min(CAP - start);
        let base = self.rx_buffer.as_mut_ptr().cast_const();

        compiler_fence(Ordering::Acquire);
        // SAFETY: both segments lie inside the CAP-byte buffer and `out` is a
        // distinct exclusive borrow, so source and destination never overlap.
        unsafe {
            core::ptr::copy_nonoverlapping(base.add(start), out.as_mut_ptr(), first);
            core::ptr::copy_nonoverlapping(base, out.as_mut_ptr().add(first), len - first);
        }
        len
    }

    /// Blocking read used by the `embedded-io` adapter
    pub(crate) fn read_blocking(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut first = None;
        for _ in 0..RX_POLL_TIMEOUT {
            first = self.read_byte();
            if first.is_some() {
                break;
            }
            core::hint::spin_loop();
        }
        let Some(byte) = first else {
            return Err(IoError::Timeout.into());
        };

        buf[0] = byte;
        let mut count = 1;
        while count < buf.len() {
            match self.read_byte() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

// =============================================================================
// embedded-io
// =============================================================================

impl<H: SerialHw, const CAP: usize> embedded_io::ErrorType for Channel<H, CAP> {
    type Error = super::error::Error;
}

impl<H: SerialHw, const CAP: usize> embedded_io::Write for Channel<H, CAP> {
    /// Returns the bytes accepted before a timeout, if any; the error only
    /// surfaces when nothing was written.
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        for (written, &byte) in buf.iter().enumerate() {
            if let Err(err) = self.write_byte(byte) {
                return if written > 0 { Ok(written) } else { Err(err) };
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Channel::flush(self)
    }
}

impl<H: SerialHw, const CAP: usize> embedded_io::WriteReady for Channel<H, CAP> {
    fn write_ready(&mut self) -> Result<bool> {
        Ok(self.tx_ready())
    }
}

impl<H: SerialHw, const CAP: usize> embedded_io::Read for Channel<H, CAP> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_blocking(buf)
    }
}

impl<H: SerialHw, const CAP: usize> embedded_io::ReadReady for Channel<H, CAP> {
    fn read_ready(&mut self) -> Result<bool> {
        Ok(self.rx_ready())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
