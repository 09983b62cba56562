//! Calendar to NTP Epoch Conversion
//!
//! Turns a decoded UTC calendar date-time into whole seconds since
//! 1900-01-01 00:00:00, the NTP epoch. The conversion is table driven:
//!
//! ```text
//! days = (year - 1900) * 365
//!      + leap days in 1900..year
//!      + DAYS_BEFORE_MONTH[month - 1]
//!      + 1 if month > 2 and year is leap
//!      + (day - 1)
//! secs = days * 86400 + hour * 3600 + minute * 60 + second
//! ```
//!
//! The result is reduced modulo `2^32`, so dates after 2036-02-07 06:28:16
//! land in NTP era 1 exactly as they would on the wire.
//!
//! `seconds_since_epoch` assumes a valid date. Decoded input goes through
//! [`CalendarDateTime::validate`] first.

use crate::constants::ntp::{EPOCH_YEAR, MAX_YEAR};
use crate::constants::time::{
    DAYS_BEFORE_MONTH, DAYS_IN_MONTH, DAYS_PER_COMMON_YEAR, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::errors::{ClockError, ClockResult};

/// Leap days in years `1..=1899`, subtracted so counting starts at 1900.
const LEAP_DAYS_BEFORE_EPOCH: u32 = leap_days_through(EPOCH_YEAR as u32 - 1);

/// UTC calendar date-time as reported by a satellite receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarDateTime {
    /// Build a date-time from its fields without validating them.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self { year, month, day, hour, minute, second }
    }

    /// Check that every field is in the range the converter handles.
    ///
    /// A `second` of 60 is accepted so a receiver announcing a leap second
    /// does not knock the clock out of lock; it converts to the same value
    /// as second 0 of the next minute.
    pub fn validate(&self) -> ClockResult<()> {
        if self.year < EPOCH_YEAR || self.year > MAX_YEAR {
            return Err(ClockError::InvalidDateTime { field: "year" });
        }
        if self.month == 0 || self.month > 12 {
            return Err(ClockError::InvalidDateTime { field: "month" });
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(ClockError::InvalidDateTime { field: "day" });
        }
        if self.hour > 23 {
            return Err(ClockError::InvalidDateTime { field: "hour" });
        }
        if self.minute > 59 {
            return Err(ClockError::InvalidDateTime { field: "minute" });
        }
        if self.second > 60 {
            return Err(ClockError::InvalidDateTime { field: "second" });
        }
        Ok(())
    }

    /// Whole seconds since the NTP epoch. See [`seconds_since_epoch`].
    pub const fn to_ntp_seconds(&self) -> u32 {
        seconds_since_epoch(self)
    }
}

/// Gregorian leap-year rule.
pub const fn is_leap_year(year: u16) -> bool {
    let y = year as u32;
    (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
}

/// Days in `month` (1-based) of `year`.
///
/// Returns 0 for a month outside `1..=12`.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    if month == 0 || month > 12 {
        return 0;
    }
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize - 1]
    }
}

/// Number of leap years in `1..=year`.
const fn leap_days_through(year: u32) -> u32 {
    year / 4 - year / 100 + year / 400
}

/// Whole seconds from 1900-01-01 00:00:00 UTC to `dt`, modulo `2^32`.
///
/// Pure and deterministic. `dt` must satisfy [`CalendarDateTime::validate`].
pub const fn seconds_since_epoch(dt: &CalendarDateTime) -> u32 {
    let year = dt.year as u32;
    let years = year - EPOCH_YEAR as u32;
    let leap_days = leap_days_through(year - 1) - LEAP_DAYS_BEFORE_EPOCH;

    let mut days = years * DAYS_PER_COMMON_YEAR
        + leap_days
        + DAYS_BEFORE_MONTH[dt.month as usize - 1] as u32
        + (dt.day as u32 - 1);
    if dt.month > 2 && is_leap_year(dt.year) {
        days += 1;
    }

    // 2099-12-31 is ~73k days; the product needs 64 bits before wrapping
    let secs = days as u64 * SECONDS_PER_DAY as u64
        + dt.hour as u64 * SECONDS_PER_HOUR as u64
        + dt.minute as u64 * SECONDS_PER_MINUTE as u64
        + dt.second as u64;

    secs as u32
}
