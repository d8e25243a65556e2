//! Configuration types for the UART DMA driver

use super::error::{ConfigError, ConfigResult};
use crate::internal::constants::{DEFAULT_BAUD_RATE, MAX_BAUD_RATE, MIN_BAUD_RATE};

/// Data word width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataBits {
    /// 8 data bits
    #[default]
    Eight = 8,
    /// 9 data bits
    Nine = 9,
}

impl TryFrom<u8> for DataBits {
    type Error = ConfigError;

    fn try_from(bits: u8) -> ConfigResult<Self> {
        match bits {
            8 => Ok(DataBits::Eight),
            9 => Ok(DataBits::Nine),
            _ => Err(ConfigError::InvalidConfig),
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StopBits {
    /// 1 stop bit
    #[default]
    One = 1,
    /// 2 stop bits
    Two = 2,
}

impl TryFrom<u8> for StopBits {
    type Error = ConfigError;

    fn try_from(bits: u8) -> ConfigResult<Self> {
        match bits {
            1 => Ok(StopBits::One),
            2 => Ok(StopBits::Two),
            _ => Err(ConfigError::InvalidConfig),
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity bit
    #[default]
    None,
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Serial line parameters
///
/// Applied with [`Channel::configure`](crate::Channel::configure) while the
/// channel is closed or configured; immutable while the channel is open.
///
/// # Example
///
/// ```ignore
/// let config = LineConfig::new()
///     .with_baud_rate(57_600)
///     .with_parity(Parity::Even);
/// channel.configure(config)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data word width
    pub data_bits: DataBits,
    /// Stop bit count
    pub stop_bits: StopBits,
    /// Parity mode
    pub parity: Parity,
}

impl LineConfig {
    /// Create the default 115200 8N1 configuration (const, for statics)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
        }
    }

    /// Set the baud rate
    #[must_use]
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the data word width
    #[must_use]
    pub const fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Set the stop bit count
    #[must_use]
    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Set the parity mode
    #[must_use]
    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Check that every parameter is within the supported range
    ///
    /// # Errors
    /// - `InvalidBaudRate` - baud rate outside `MIN_BAUD_RATE..=MAX_BAUD_RATE`
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.baud_rate < MIN_BAUD_RATE || self.baud_rate > MAX_BAUD_RATE {
            return Err(ConfigError::InvalidBaudRate);
        }
        Ok(())
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Set of independently toggleable channel engines
///
/// Any combination of byte-interrupt receive, DMA receive and DMA transmit
/// may be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities(u8);

impl Capabilities {
    /// No engines
    pub const NONE: Self = Self(0);
    /// Byte-ready interrupt receive
    pub const BYTE_RX: Self = Self(1 << 0);
    /// Circular DMA receive with idle-line detection
    pub const DMA_RX: Self = Self(1 << 1);
    /// One-shot DMA transmit
    pub const DMA_TX: Self = Self(1 << 2);
    /// All engines
    pub const ALL: Self = Self(0b111);

    /// Raw bit representation
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Combine two sets
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True if every engine in `other` is also in `self`
    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True if no engine is set
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add engines to the set
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Remove engines from the set
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Add or remove engines depending on `on`
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl core::ops::BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// DMA transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Peripheral to memory (receive)
    Rx,
    /// Memory to peripheral (transmit)
    Tx,
}

impl Direction {
    /// The capability flag driving this direction
    pub const fn capability(self) -> Capabilities {
        match self {
            Direction::Rx => Capabilities::DMA_RX,
            Direction::Tx => Capabilities::DMA_TX,
        }
    }
}

/// Channel lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No line parameters applied, nothing armed
    #[default]
    Closed,
    /// Line parameters applied, no interrupts or DMA armed
    Configured,
    /// One or more capabilities active
    Open,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_config_default_is_115200_8n1() {
        let config = LineConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config, LineConfig::new());
    }

    #[test]
    fn line_config_builder_sets_fields() {
        let config = LineConfig::new()
            .with_baud_rate(9_600)
            .with_data_bits(DataBits::Nine)
            .with_stop_bits(StopBits::Two)
            .with_parity(Parity::Odd);

        assert_eq!(config.baud_rate, 9_600);
        assert_eq!(config.data_bits, DataBits::Nine);
        assert_eq!(config.stop_bits, StopBits::Two);
        assert_eq!(config.parity, Parity::Odd);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_baud() {
        assert_eq!(
            LineConfig::new().with_baud_rate(0).validate(),
            Err(ConfigError::InvalidBaudRate)
        );
        assert_eq!(
            LineConfig::new()
                .with_baud_rate(MAX_BAUD_RATE + 1)
                .validate(),
            Err(ConfigError::InvalidBaudRate)
        );
        assert!(LineConfig::new().with_baud_rate(MIN_BAUD_RATE).validate().is_ok());
        assert!(LineConfig::new().with_baud_rate(MAX_BAUD_RATE).validate().is_ok());
    }

    #[test]
    fn data_bits_from_u8() {
        assert_eq!(DataBits::try_from(8), Ok(DataBits::Eight));
        assert_eq!(DataBits::try_from(9), Ok(DataBits::Nine));
        assert_eq!(DataBits::try_from(7), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn stop_bits_from_u8() {
        assert_eq!(StopBits::try_from(1), Ok(StopBits::One));
        assert_eq!(StopBits::try_from(2), Ok(StopBits::Two));
        assert_eq!(StopBits::try_from(3), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn capabilities_compose_independently() {
        let mut caps = Capabilities::BYTE_RX | Capabilities::DMA_TX;
        assert!(caps.contains(Capabilities::BYTE_RX));
        assert!(caps.contains(Capabilities::DMA_TX));
        assert!(!caps.contains(Capabilities::DMA_RX));

        caps.insert(Capabilities::DMA_RX);
        assert_eq!(caps, Capabilities::ALL);

        caps.remove(Capabilities::BYTE_RX);
        assert!(!caps.contains(Capabilities::BYTE_RX));
        assert!(caps.contains(Capabilities::DMA_RX | Capabilities::DMA_TX));

        caps.set(Capabilities::DMA_RX | Capabilities::DMA_TX, false);
        assert!(caps.is_empty());
    }

    #[test]
    fn direction_maps_to_capability() {
        assert_eq!(Direction::Rx.capability(), Capabilities::DMA_RX);
        assert_eq!(Direction::Tx.capability(), Capabilities::DMA_TX);
    }

    #[test]
    fn state_defaults_to_closed() {
        assert_eq!(State::default(), State::Closed);
    }
}
