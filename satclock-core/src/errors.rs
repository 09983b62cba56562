//! Error Types for the Clock Source
//!
//! ## Design Philosophy
//!
//! Almost nothing that goes wrong while keeping time is an error in the
//! `Result` sense. A stale fix, a wrapped counter or an overflowing fraction
//! are all recovered locally by the clock state machine, and the outer
//! service only ever sees the clock drop back to "unlocked".
//!
//! What remains are setup and input-shape problems, and those follow the
//! same embedded rules as the rest of the crate:
//!
//! 1. **Small Size**: variants carry at most a couple of words.
//! 2. **No Heap Allocation**: messages are `&'static str`.
//! 3. **Copy Semantics**: errors are cheap to return and to store in stats.
//!
//! ## Error Categories
//!
//! ### Setup
//! - `PulseAlreadyBound`: the single process-wide PPS binding is taken
//! - `LineUnavailable`: the edge interrupt could not be armed
//!
//! ### Input Shape
//! - `InvalidDateTime`: a decoded calendar field is out of range
//! - `InvalidHundredths`: sub-second hundredths outside `0..=99`
//! - `SourceFull`: an in-memory byte source cannot take more data
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use satclock_core::{ClockError, PulseRegistry};
//!
//! static PPS: PulseRegistry = PulseRegistry::new();
//!
//! let first = PPS.claim();
//! assert!(first.is_ok());
//! match PPS.claim() {
//!     Err(ClockError::PulseAlreadyBound) => {
//!         // Another clock already owns the pulse line; run without PPS
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for clock operations
pub type ClockResult<T> = Result<T, ClockError>;

/// Clock errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The pulse-per-second line is already bound to a clock
    #[error("Pulse-per-second line already bound")]
    PulseAlreadyBound,

    /// Edge interrupt could not be configured
    #[error("Pulse line unavailable: {reason}")]
    LineUnavailable {
        /// Why the line could not be armed
        reason: &'static str,
    },

    /// A calendar field is outside the range the epoch converter accepts
    #[error("Invalid date-time field: {field}")]
    InvalidDateTime {
        /// Name of the offending field
        field: &'static str,
    },

    /// Sub-second hundredths outside 0..=99
    #[error("Invalid hundredths: {value}")]
    InvalidHundredths {
        /// Value reported by the decoder
        value: u8,
    },

    /// Byte source buffer is full
    #[error("Byte source full (capacity {capacity})")]
    SourceFull {
        /// Buffer capacity in bytes
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PulseAlreadyBound =>
                defmt::write!(fmt, "PPS already bound"),
            Self::LineUnavailable { reason } =>
                defmt::write!(fmt, "PPS line unavailable: {}", reason),
            Self::InvalidDateTime { field } =>
                defmt::write!(fmt, "Invalid date-time field: {}", field),
            Self::InvalidHundredths { value } =>
                defmt::write!(fmt, "Invalid hundredths: {}", value),
            Self::SourceFull { capacity } =>
                defmt::write!(fmt, "Source full ({} bytes)", capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<ClockError>() <= 24);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_names_the_field() {
        let err = ClockError::InvalidDateTime { field: "month" };
        assert_eq!(std::format!("{}", err), "Invalid date-time field: month");
    }
}
