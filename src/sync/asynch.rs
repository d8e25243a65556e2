//! Async/await support for serial channels.
//!
//! [`AsyncSerialState`] is a [`NotificationSink`]: pass it to the channel's
//! interrupt handlers and await its futures from task code.
//!
//! ```ignore
//! static SERIAL2: Channel<Usart2Hw, 64> = Channel::new(Usart2Hw::new());
//! static SERIAL2_STATE: AsyncSerialState = AsyncSerialState::new();
//!
//! #[interrupt]
//! fn USART2() {
//!     SERIAL2.on_uart_interrupt(&SERIAL2_STATE);
//! }
//!
//! async fn reader() {
//!     let mut offset = 0;
//!     loop {
//!         let pending = SERIAL2_STATE.wait_rx().await;
//!         let mut chunk = [0u8; 64];
//!         let n = SERIAL2.copy_rx(offset, &mut chunk[..pending.dma.min(chunk.len())]);
//!         offset = (offset + n) % SERIAL2.rx_capacity();
//!
//!         let mut bytes = [0u8; 16];
//!         let k = SERIAL2_STATE.take_bytes(&mut bytes);
//!         handle(&chunk[..n], &bytes[..k]);
//!     }
//! }
//! ```

use core::future::poll_fn;
use core::task::Poll;

use super::primitives::{AtomicWaker, CriticalSectionCell};
use crate::driver::event::{NotificationSink, RxPath, SerialEvent};
use crate::internal::constants::REGISTER_QUEUE_LEN;

/// Received bytes accumulated since the last [`AsyncSerialState::wait_rx`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxPending {
    /// Bytes available in the DMA ring
    pub dma: usize,
    /// Bytes queued from the data register, see [`AsyncSerialState::take_bytes`]
    pub register: usize,
}

impl RxPending {
    /// Total new bytes
    pub const fn total(&self) -> usize {
        self.dma + self.register
    }

    const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// FIFO of data-register bytes, full queue drops the newest byte
#[derive(Debug, Clone, Copy, Default)]
struct ByteQueue {
    buf: [u8; REGISTER_QUEUE_LEN],
    head: usize,
    len: usize,
}

impl ByteQueue {
    const fn new() -> Self {
        Self {
            buf: [0; REGISTER_QUEUE_LEN],
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) -> bool {
        if self.len == REGISTER_QUEUE_LEN {
            return false;
        }
        self.buf[(self.head + self.len) % REGISTER_QUEUE_LEN] = byte;
        self.len += 1;
        true
    }

    fn pop_into(&mut self, out: &mut [u8]) -> usize {
        let n = self.len.min(out.len());
        for slot in &mut out[..n] {
            *slot = self.buf[self.head];
            self.head = (self.head + 1) % REGISTER_QUEUE_LEN;
        }
        self.len -= n;
        n
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Pending {
    rx: RxPending,
    bytes: ByteQueue,
    tx_done: bool,
}

/// Event accumulator bridging interrupt notifications to async tasks
pub struct AsyncSerialState {
    pending: CriticalSectionCell<Pending>,
    rx_waker: AtomicWaker,
    tx_waker: AtomicWaker,
}

impl AsyncSerialState {
    /// Create an empty state (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            pending: CriticalSectionCell::new(Pending {
                rx: RxPending {
                    dma: 0,
                    register: 0,
                },
                bytes: ByteQueue::new(),
                tx_done: false,
            }),
            rx_waker: AtomicWaker::new(),
            tx_waker: AtomicWaker::new(),
        }
    }

    /// Wait until at least one byte was reported, then take the counts
    pub async fn wait_rx(&self) -> RxPending {
        poll_fn(|cx| {
            self.rx_waker.register(cx.waker());
            match self.take_rx() {
                Some(pending) => Poll::Ready(pending),
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Wait for the in-flight DMA transmit to complete
    pub async fn wait_tx_done(&self) {
        poll_fn(|cx| {
            self.tx_waker.register(cx.waker());
            if self.take_tx_done() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await;
    }

    /// Take accumulated receive counts without waiting
    pub fn take_rx(&self) -> Option<RxPending> {
        self.pending.with(|p| {
            if p.rx.is_empty() {
                None
            } else {
                Some(core::mem::take(&mut p.rx))
            }
        })
    }

    /// Move queued data-register bytes into `out`, oldest first
    ///
    /// Returns how many bytes were written. Bytes that arrived while the
    /// queue was full were dropped and are not reported here.
    pub fn take_bytes(&self, out: &mut [u8]) -> usize {
        self.pending.with(|p| p.bytes.pop_into(out))
    }

    /// Take a pending transmit completion without waiting
    pub fn take_tx_done(&self) -> bool {
        self.pending.with(|p| core::mem::take(&mut p.tx_done))
    }

    /// Drop anything accumulated, e.g. after suspending the channel
    pub fn reset(&self) {
        self.pending.with(|p| *p = Pending::default());
    }
}

impl Default for AsyncSerialState {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for AsyncSerialState {
    fn notify(&self, event: SerialEvent) {
        match event {
            SerialEvent::RxReady { count, path } => {
                self.pending.with(|p| match path {
                    RxPath::Dma => p.rx.dma += count,
                    RxPath::Register(byte) => {
                        if p.bytes.push(byte) {
                            p.rx.register += 1;
                        }
                    }
                });
                self.rx_waker.wake();
            }
            SerialEvent::TxDone => {
                self.pending.with(|p| p.tx_done = true);
                self.tx_waker.wake();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
