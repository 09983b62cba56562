//! Constants for the Clock Source
//!
//! Every numeric value the clock state machine depends on is defined here,
//! with its unit in the name. Two groups:
//!
//! - **Time**: plain unit conversions between seconds, milliseconds and
//!   microseconds, plus calendar lengths
//! - **NTP**: the fixed-point fraction scale, the epoch and the fix
//!   acceptance thresholds
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Use descriptive names that include units

/// Unit conversions and calendar lengths.
pub mod time;

/// NTP timestamp scale, epoch and fix thresholds.
pub mod ntp;

// Re-export commonly used constants for convenience
pub use time::{
    US_PER_SECOND, MS_PER_SECOND, SECONDS_PER_DAY,
};

pub use ntp::{
    FULL_SCALE, FRACTION_PER_HUNDREDTH, FRACTION_PER_MICROSECOND,
    DEFAULT_STALE_AFTER_MS, INVALID_FIX_AGE,
};
