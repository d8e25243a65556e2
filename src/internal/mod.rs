//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`constants`]: Status register bits, buffer sizes, line limits, timeouts
//! - [`rx_index`]: Receive index bookkeeping for the circular DMA buffer
//! - [`tx_slot`]: Single in-flight transmit descriptor
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Do not depend on any types
//! or functions in this module from external code. They are subject to change
//! without notice.

pub(crate) mod constants;
pub(crate) mod rx_index;
pub(crate) mod tx_slot;
