//! Hardware Abstraction Layer
//!
//! The driver core never touches registers directly. Board support code
//! implements [`SerialHw`] for one USART instance plus its RX/TX DMA streams,
//! and the channel drives it.
//!
//! Clock, pin and alternate-function setup as well as interrupt priority
//! programming happen before the channel is constructed and are not part of
//! this trait.
//!
//! # Status layout
//!
//! [`SerialHw::read_status`] reports the USART status register using the bit
//! positions in [`status`](crate::constants::status). Implementations for
//! peripherals with a different layout translate into that layout.

use crate::driver::config::LineConfig;

/// Register-level operations for one USART plus its DMA streams
///
/// All methods take `&self`: they are thin volatile register accessors that
/// may be called from thread context and from any of the channel's
/// interrupt handlers.
pub trait SerialHw {
    /// Program baud rate, word length, stop bits and parity, then enable
    /// the USART for both directions
    fn apply_line_config(&self, config: &LineConfig);

    /// Read the status register (USART_SR layout)
    fn read_status(&self) -> u32;

    /// Clear status bits (write-0-to-clear on USART_SR)
    fn clear_status(&self, bits: u32);

    /// Read the data register
    fn read_data(&self) -> u16;

    /// Write the data register
    fn write_data(&self, value: u16);

    /// Enable or disable the byte-ready (RXNE) interrupt
    fn set_byte_interrupt(&self, enable: bool);

    /// Enable or disable the USART interrupt line at the interrupt controller
    fn set_irq_line(&self, enable: bool);

    /// Start circular peripheral-to-memory DMA over `buffer[..len]`, enable
    /// the transfer-complete and idle-line interrupts and the USART RX DMA
    /// request
    fn start_rx_dma(&self, buffer: *mut u8, len: usize);

    /// Stop RX DMA, clear its completion flag and disable the idle-line
    /// interrupt
    fn stop_rx_dma(&self);

    /// Hardware remaining-count of the RX stream, counting down from the
    /// buffer length
    fn rx_dma_remaining(&self) -> usize;

    /// True if the RX stream transfer-complete flag is set
    fn rx_dma_complete(&self) -> bool;

    /// Clear the RX stream transfer-complete flag
    fn clear_rx_dma_complete(&self);

    /// Enable the TX stream's completion interrupt
    fn arm_tx_dma(&self);

    /// Stop the TX stream, clear its completion flag and disable its
    /// interrupt
    fn disarm_tx_dma(&self);

    /// Start a one-shot memory-to-peripheral transfer of `buffer[..len]`
    fn start_tx_dma(&self, buffer: *const u8, len: usize);

    /// True if the TX stream transfer-complete flag is set
    fn tx_dma_complete(&self) -> bool;

    /// Clear the TX stream transfer-complete flag
    fn clear_tx_dma_complete(&self);
}

impl<T: SerialHw + ?Sized> SerialHw for &T {
    fn apply_line_config(&self, config: &LineConfig) {
        (**self).apply_line_config(config);
    }

    fn read_status(&self) -> u32 {
        (**self).read_status()
    }

    fn clear_status(&self, bits: u32) {
        (**self).clear_status(bits);
    }

    fn read_data(&self) -> u16 {
        (**self).read_data()
    }

    fn write_data(&self, value: u16) {
        (**self).write_data(value);
    }

    fn set_byte_interrupt(&self, enable: bool) {
        (**self).set_byte_interrupt(enable);
    }

    fn set_irq_line(&self, enable: bool) {
        (**self).set_irq_line(enable);
    }

    fn start_rx_dma(&self, buffer: *mut u8, len: usize) {
        (**self).start_rx_dma(buffer, len);
    }

    fn stop_rx_dma(&self) {
        (**self).stop_rx_dma();
    }

    fn rx_dma_remaining(&self) -> usize {
        (**self).rx_dma_remaining()
    }

    fn rx_dma_complete(&self) -> bool {
        (**self).rx_dma_complete()
    }

    fn clear_rx_dma_complete(&self) {
        (**self).clear_rx_dma_complete();
    }

    fn arm_tx_dma(&self) {
        (**self).arm_tx_dma();
    }

    fn disarm_tx_dma(&self) {
        (**self).disarm_tx_dma();
    }

    fn start_tx_dma(&self, buffer: *const u8, len: usize) {
        (**self).start_tx_dma(buffer, len);
    }

    fn tx_dma_complete(&self) -> bool {
        (**self).tx_dma_complete()
    }

    fn clear_tx_dma_complete(&self) {
        (**self).clear_tx_dma_complete();
    }
}
