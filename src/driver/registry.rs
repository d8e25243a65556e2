//! Fixed table of serial channels.
//!
//! Boards with several USARTs keep their channels in one `static`
//! [`ChannelRegistry`] and look them up by [`ChannelId`] from interrupt
//! vectors and task code.
//!
//! ```ignore
//! static SERIAL: ChannelRegistry<BoardUart, 64, 2> = ChannelRegistry::new([
//!     Channel::new(BoardUart::usart1()),
//!     Channel::new(BoardUart::usart2()),
//! ]);
//!
//! #[interrupt]
//! fn USART2() {
//!     if let Some(channel) = SERIAL.get(ChannelId(1)) {
//!         channel.on_uart_interrupt(&SINK);
//!     }
//! }
//! ```

use super::channel::Channel;

/// Index of a channel inside a [`ChannelRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u8);

impl ChannelId {
    /// Index into the registry table
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// `N` serial channels sharing one hardware type and receive capacity
pub struct ChannelRegistry<H, const CAP: usize, const N: usize> {
    channels: [Channel<H, CAP>; N],
}

impl<H, const CAP: usize, const N: usize> ChannelRegistry<H, CAP, N> {
    /// Build a registry (const, suitable for static initialization)
    ///
    /// Fails to compile for more than 256 channels, the range of [`ChannelId`].
    pub const fn new(channels: [Channel<H, CAP>; N]) -> Self {
        const { assert!(N <= 256, "ChannelId addresses at most 256 channels") };
        Self { channels }
    }

    /// Channel with the given id, or `None` if out of range
    #[inline]
    pub fn get(&self, id: ChannelId) -> Option<&Channel<H, CAP>> {
        self.channels.get(id.index())
    }

    /// All channels with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, &Channel<H, CAP>)> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, channel)| (ChannelId(i as u8), channel))
    }

    /// Number of channels
    pub const fn len(&self) -> usize {
        N
    }

    /// True if the registry holds no channels
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}
