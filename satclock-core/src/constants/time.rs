//! Time-Related Constants
//!
//! Unit conversions and calendar lengths used by the epoch converter and the
//! extrapolation engine. All values are integers; nothing in this crate uses
//! floating point.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u32 = 1000;

/// Microseconds per millisecond.
pub const US_PER_MS: u32 = 1000;

/// Microseconds per second.
///
/// The hardware counter ticks once per microsecond, so this is also the
/// number of counter ticks in one second.
pub const US_PER_SECOND: u32 = 1_000_000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Hours per day.
pub const HOURS_PER_DAY: u32 = 24;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u32 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;

/// Seconds per day.
pub const SECONDS_PER_DAY: u32 = SECONDS_PER_HOUR * HOURS_PER_DAY;

// ===== CALENDAR =====

/// Days in a common (non-leap) year.
pub const DAYS_PER_COMMON_YEAR: u32 = 365;

/// Days elapsed before the first of each month in a common year.
///
/// Indexed by `month - 1`. February 29th is added separately for leap
/// years once the date is past February.
pub const DAYS_BEFORE_MONTH: [u16; 12] = [
    0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334,
];

/// Length of each month in a common year, indexed by `month - 1`.
pub const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// ===== COUNTER =====

/// Time for the 32-bit microsecond counter to wrap (microseconds).
///
/// About 71.6 minutes. The clock must be polled (or pulsed) more often than
/// this or elapsed time silently loses whole counter periods.
pub const COUNTER_WRAP_US: u64 = 1 << 32;
