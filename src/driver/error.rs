//! Error types for the UART DMA driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Line configuration and state-machine failures
//! - [`DmaError`]: Transmit descriptor and DMA engine issues
//! - [`IoError`]: Runtime single-byte I/O failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most channel methods.
//!
//! Receive overrun is not represented here. It is recovered inside the
//! interrupt dispatcher and only shows up upstream as a gap in the byte
//! stream.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and state-machine errors
///
/// The channel stays in its prior state when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unsupported line parameter (data width, stop bits)
    InvalidConfig,
    /// Baud rate outside the supported range
    InvalidBaudRate,
    /// `open` called with an empty capability set
    NoCapabilities,
    /// Operation not valid in the current channel state
    InvalidState,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidBaudRate => "unsupported baud rate",
            ConfigError::NoCapabilities => "no capabilities requested",
            ConfigError::InvalidState => "invalid channel state",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Transmit descriptor and DMA engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// A transmit is already in flight on this channel
    Busy,
    /// Zero-length transfer or size larger than the supplied buffer
    InvalidLength,
    /// The DMA engine for this direction is not armed
    NotArmed,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::Busy => "transmit in flight",
            DmaError::InvalidLength => "invalid transfer length",
            DmaError::NotArmed => "DMA engine not armed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime single-byte I/O errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Hardware-ready poll did not complete in time
    Timeout,
    /// Line not configured
    InvalidState,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::InvalidState => "line not configured",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match channel.begin_transmit(&FRAME, FRAME.len()) {
///     Err(Error::Dma(DmaError::Busy)) => { /* retry after TxDone */ }
///     Err(Error::Config(ConfigError::InvalidState)) => { /* not open */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::Config(ConfigError::InvalidConfig | ConfigError::InvalidBaudRate) => {
                embedded_io::ErrorKind::InvalidInput
            }
            Error::Io(IoError::Timeout) => embedded_io::ErrorKind::TimedOut,
            Error::Dma(DmaError::Busy) => embedded_io::ErrorKind::Interrupted,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for channel operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;
    use embedded_io::Error as _;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::InvalidConfig,
            ConfigError::InvalidBaudRate,
            ConfigError::NoCapabilities,
            ConfigError::InvalidState,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "{variant:?} has empty string");
        }
    }

    #[test]
    fn config_error_display() {
        let display = format!("{}", ConfigError::InvalidBaudRate);
        assert_eq!(display, "unsupported baud rate");
    }

    #[test]
    fn dma_error_display() {
        let display = format!("{}", DmaError::Busy);
        assert_eq!(display, "transmit in flight");
    }

    #[test]
    fn io_error_display() {
        let display = format!("{}", IoError::Timeout);
        assert_eq!(display, "operation timed out");
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(
            Error::from(ConfigError::InvalidConfig),
            Error::Config(ConfigError::InvalidConfig)
        );
        assert_eq!(Error::from(DmaError::Busy), Error::Dma(DmaError::Busy));
        assert_eq!(Error::from(IoError::Timeout), Error::Io(IoError::Timeout));
    }

    #[test]
    fn error_display_carries_domain_prefix() {
        let display = format!("{}", Error::Dma(DmaError::InvalidLength));
        assert!(display.starts_with("dma:"));
        assert!(display.contains("length"));

        let display = format!("{}", Error::Config(ConfigError::NoCapabilities));
        assert!(display.starts_with("config:"));
    }

    #[test]
    fn error_maps_to_embedded_io_kind() {
        assert_eq!(
            Error::Io(IoError::Timeout).kind(),
            embedded_io::ErrorKind::TimedOut
        );
        assert_eq!(
            Error::Config(ConfigError::InvalidBaudRate).kind(),
            embedded_io::ErrorKind::InvalidInput
        );
        assert_eq!(
            Error::Io(IoError::InvalidState).kind(),
            embedded_io::ErrorKind::Other
        );
    }

    #[test]
    fn dma_result_type_works() {
        fn test_fn() -> DmaResult<u32> {
            Err(DmaError::Busy)
        }

        assert_eq!(test_fn(), Err(DmaError::Busy));
    }
}
