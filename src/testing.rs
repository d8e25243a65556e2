//! Testing utilities and mock implementations
//!
//! Mock hardware and recording sinks for exercising the serial driver on the
//! host without a USART or DMA controller.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use crate::driver::config::LineConfig;
use crate::driver::event::{NotificationSink, RxPath, SerialEvent};
use crate::hal::SerialHw;
use crate::internal::constants::{SR_IDLE, SR_ORE, SR_RXNE, SR_TC, SR_TXE};

// =============================================================================
// Mock Serial Hardware
// =============================================================================

/// Side-effecting hardware call, recorded in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    ApplyLineConfig(LineConfig),
    ClearStatus(u32),
    WriteData(u16),
    ByteInterrupt(bool),
    IrqLine(bool),
    StartRxDma(usize),
    StopRxDma,
    ClearRxDmaComplete,
    ArmTxDma,
    DisarmTxDma,
    StartTxDma(usize),
    ClearTxDmaComplete,
}

/// Mock USART plus RX/TX DMA streams
///
/// The status register starts with an idle transmitter (TXE and TC set).
/// Reading the data register clears RXNE, IDLE and ORE, following the
/// status-then-data read sequence of the real peripheral.
///
/// # Example
///
/// ```ignore
/// let channel: Channel<MockSerialHw, 64> = Channel::new(MockSerialHw::new());
/// // ... configure + open with DMA_RX ...
/// channel.hw().dma_receive(&[1, 2, 3]);
/// channel.hw().raise(SR_IDLE);
/// channel.on_uart_interrupt(&sink);
/// ```
pub struct MockSerialHw {
    status: Cell<u32>,
    data: Cell<u16>,
    data_reads: Cell<usize>,
    rx_ring: Cell<Option<(*mut u8, usize)>>,
    rx_remaining: Cell<usize>,
    rx_complete: Cell<bool>,
    tx_complete: Cell<bool>,
    tx_data: RefCell<Vec<u8>>,
    written: RefCell<Vec<u16>>,
    tx_stall_after: Cell<Option<usize>>,
    calls: RefCell<Vec<HwCall>>,
}

impl MockSerialHw {
    pub fn new() -> Self {
        Self {
            status: Cell::new(SR_TXE | SR_TC),
            data: Cell::new(0),
            data_reads: Cell::new(0),
            rx_ring: Cell::new(None),
            rx_remaining: Cell::new(0),
            rx_complete: Cell::new(false),
            tx_complete: Cell::new(false),
            tx_data: RefCell::new(Vec::new()),
            written: RefCell::new(Vec::new()),
            tx_stall_after: Cell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Current raw status register
    pub fn status(&self) -> u32 {
        self.status.get()
    }

    /// Set status bits
    pub fn raise(&self, bits: u32) {
        self.status.set(self.status.get() | bits);
    }

    /// Latch a byte into the data register and set RXNE
    pub fn receive_byte(&self, value: u16) {
        self.data.set(value);
        self.raise(SR_RXNE);
    }

    /// Simulate the RX DMA stream writing `bytes` into the armed ring
    ///
    /// Wraps like a circular stream: the remaining-count reloads to the ring
    /// length and the transfer-complete flag is set.
    pub fn dma_receive(&self, bytes: &[u8]) {
        let Some((ptr, len)) = self.rx_ring.get() else {
            panic!("RX DMA not started");
        };
        for &byte in bytes {
            let offset = len - self.rx_remaining.get();
            // SAFETY: `ptr` is the channel's receive ring of `len` bytes and
            // `offset < len`.
            unsafe { ptr.add(offset).write_volatile(byte) };
            self.rx_remaining.set(self.rx_remaining.get() - 1);
            if self.rx_remaining.get() == 0 {
                self.rx_remaining.set(len);
                self.rx_complete.set(true);
            }
        }
    }

    /// Simulate the TX DMA stream draining the in-flight buffer
    pub fn complete_tx(&self) {
        self.tx_complete.set(true);
    }

    /// Bytes handed to the last `start_tx_dma`
    pub fn tx_data(&self) -> Vec<u8> {
        self.tx_data.borrow().clone()
    }

    /// Leave TXE clear once `n` values have been written to the data register
    pub fn stall_tx_after(&self, n: usize) {
        self.tx_stall_after.set(Some(n));
    }

    /// Values written to the data register
    pub fn written(&self) -> Vec<u16> {
        self.written.borrow().clone()
    }

    /// Number of data register reads
    pub fn data_reads(&self) -> usize {
        self.data_reads.get()
    }

    /// Recorded side-effecting calls
    pub fn calls(&self) -> Vec<HwCall> {
        self.calls.borrow().clone()
    }

    /// Clear the call log
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Last interrupt-line state requested
    pub fn last_irq_line(&self) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            HwCall::IrqLine(on) => Some(*on),
            _ => None,
        })
    }

    fn record(&self, call: HwCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for MockSerialHw {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialHw for MockSerialHw {
    fn apply_line_config(&self, config: &LineConfig) {
        self.record(HwCall::ApplyLineConfig(*config));
    }

    fn read_status(&self) -> u32 {
        self.status.get()
    }

    fn clear_status(&self, bits: u32) {
        self.record(HwCall::ClearStatus(bits));
        self.status.set(self.status.get() & !bits);
    }

    fn read_data(&self) -> u16 {
        self.data_reads.set(self.data_reads.get() + 1);
        self.status
            .set(self.status.get() & !(SR_RXNE | SR_IDLE | SR_ORE));
        self.data.get()
    }

    fn write_data(&self, value: u16) {
        self.record(HwCall::WriteData(value));
        self.written.borrow_mut().push(value);
        if self.tx_stall_after.get() == Some(self.written.borrow().len()) {
            self.status.set(self.status.get() & !SR_TXE);
        }
    }

    fn set_byte_interrupt(&self, enable: bool) {
        self.record(HwCall::ByteInterrupt(enable));
    }

    fn set_irq_line(&self, enable: bool) {
        self.record(HwCall::IrqLine(enable));
    }

    fn start_rx_dma(&self, buffer: *mut u8, len: usize) {
        self.record(HwCall::StartRxDma(len));
        self.rx_ring.set(Some((buffer, len)));
        self.rx_remaining.set(len);
        self.rx_complete.set(false);
    }

    fn stop_rx_dma(&self) {
        self.record(HwCall::StopRxDma);
        self.rx_ring.set(None);
        self.rx_complete.set(false);
        self.status.set(self.status.get() & !SR_IDLE);
    }

    fn rx_dma_remaining(&self) -> usize {
        self.rx_remaining.get()
    }

    fn rx_dma_complete(&self) -> bool {
        self.rx_complete.get()
    }

    fn clear_rx_dma_complete(&self) {
        self.record(HwCall::ClearRxDmaComplete);
        self.rx_complete.set(false);
    }

    fn arm_tx_dma(&self) {
        self.record(HwCall::ArmTxDma);
    }

    fn disarm_tx_dma(&self) {
        self.record(HwCall::DisarmTxDma);
        self.tx_complete.set(false);
    }

    fn start_tx_dma(&self, buffer: *const u8, len: usize) {
        self.record(HwCall::StartTxDma(len));
        // SAFETY: the channel only passes slices of `'static` buffers.
        let bytes = unsafe { core::slice::from_raw_parts(buffer, len) };
        *self.tx_data.borrow_mut() = bytes.to_vec();
        self.tx_complete.set(false);
    }

    fn tx_dma_complete(&self) -> bool {
        self.tx_complete.get()
    }

    fn clear_tx_dma_complete(&self) {
        self.record(HwCall::ClearTxDmaComplete);
        self.tx_complete.set(false);
    }
}

// =============================================================================
// Recording Sink
// =============================================================================

/// Notification sink that records every event
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<SerialEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SerialEvent> {
        self.events.borrow().clone()
    }

    /// Sum of all reported receive counts
    pub fn rx_total(&self) -> usize {
        self.events.borrow().iter().map(SerialEvent::rx_count).sum()
    }

    /// Bytes carried by data-register receive events, in order
    pub fn register_bytes(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SerialEvent::RxReady {
                    path: RxPath::Register(byte),
                    ..
                } => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn tx_done_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| **e == SerialEvent::TxDone)
            .count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: SerialEvent) {
        self.events.borrow_mut().push(event);
    }
}

// =============================================================================
// Counting Waker
// =============================================================================

#[cfg(feature = "async")]
pub use waker::CountingWaker;

#[cfg(feature = "async")]
mod waker {
    use core::task::{RawWaker, RawWakerVTable, Waker};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Waker that counts how many times it was woken
    #[derive(Clone)]
    pub struct CountingWaker {
        count: Arc<AtomicUsize>,
    }

    impl CountingWaker {
        pub fn new() -> Self {
            Self {
                count: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        pub fn waker(&self) -> Waker {
            fn clone_fn(ptr: *const ()) -> RawWaker {
                let arc = unsafe { Arc::from_raw(ptr as *const AtomicUsize) };
                let cloned = arc.clone();
                core::mem::forget(arc);
                RawWaker::new(Arc::into_raw(cloned) as *const (), &VTABLE)
            }

            fn wake_fn(ptr: *const ()) {
                let arc = unsafe { Arc::from_raw(ptr as *const AtomicUsize) };
                arc.fetch_add(1, Ordering::SeqCst);
            }

            fn wake_by_ref_fn(ptr: *const ()) {
                let arc = unsafe { Arc::from_raw(ptr as *const AtomicUsize) };
                arc.fetch_add(1, Ordering::SeqCst);
                core::mem::forget(arc);
            }

            fn drop_fn(ptr: *const ()) {
                unsafe {
                    drop(Arc::from_raw(ptr as *const AtomicUsize));
                }
            }

            static VTABLE: RawWakerVTable =
                RawWakerVTable::new(clone_fn, wake_fn, wake_by_ref_fn, drop_fn);

            let raw = RawWaker::new(Arc::into_raw(self.count.clone()) as *const (), &VTABLE);
            unsafe { Waker::from_raw(raw) }
        }
    }
}
