//! Synchronization and Concurrency Support
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!   - [`AtomicWaker`] - Async waker storage for interrupts
//!
//! - **Async Support** (`asynch`): Async/await support for serial channels
//!   - [`AsyncSerialState`] - Notification sink with awaitable receive and
//!     transmit-done futures
//!
//! # Feature Flags
//!
//! - `async`: Enables `AtomicWaker` and the `asynch` module

mod primitives;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::CriticalSectionCell;

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(feature = "async")]
pub use asynch::{AsyncSerialState, RxPending};
