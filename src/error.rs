//! Unified error type for kraken-status.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! None of these is fatal: the status machine turns each one into a
//! placeholder, a dropped event or a skipped paint.

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A clock or sensor reading could not be taken.
    TelemetryUnavailable,

    /// A key event referenced a key number with no button mapping.
    InputDecode(u8),

    /// The panel rejected a paint or flush.
    DisplayWrite,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::TelemetryUnavailable => f.write_str("telemetry unavailable"),
            Error::InputDecode(key) => write!(f, "unknown key number {}", key),
            Error::DisplayWrite => f.write_str("display write failed"),
        }
    }
}
