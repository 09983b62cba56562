//! NTP Timestamp Constants
//!
//! An NTP timestamp is 32 bits of whole seconds since 1900-01-01 00:00:00 UTC
//! followed by 32 bits of binary fraction. The fraction scale is therefore
//! `2^32` per second and the largest fraction, `u32::MAX`, is just under one
//! second.

use super::time::US_PER_SECOND;

/// One full second in fraction units (`2^32`).
///
/// Kept as `u64` because it does not fit in the 32-bit fraction itself; every
/// stored fraction is strictly below it by construction.
pub const FULL_SCALE: u64 = 1 << 32;

/// Fraction units per hundredth of a second.
///
/// `FULL_SCALE / 100`, truncated. 99 hundredths stay below `FULL_SCALE`.
pub const FRACTION_PER_HUNDREDTH: u32 = (FULL_SCALE / 100) as u32;

/// Fraction units per microsecond.
///
/// `FULL_SCALE / 1_000_000`, truncated to 4294. 999_999 microseconds stay
/// below `FULL_SCALE`.
pub const FRACTION_PER_MICROSECOND: u32 = (FULL_SCALE / US_PER_SECOND as u64) as u32;

/// First year of NTP era 0.
pub const EPOCH_YEAR: u16 = 1900;

/// Last year the calendar validator accepts.
///
/// NMEA RMC sentences carry a two-digit year, so decoders report 2000..=2099.
/// Dates past 2036-02-07 06:28:16 wrap into NTP era 1.
pub const MAX_YEAR: u16 = 2099;

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
pub const UNIX_EPOCH_OFFSET: u32 = 2_208_988_800;

/// Fix age at or beyond which a decoded time is considered stale (ms).
///
/// A receiver that has not refreshed its fix for five seconds is no longer
/// tracking satellites well enough to trust its clock.
pub const DEFAULT_STALE_AFTER_MS: u32 = 5000;

/// Raw fix-age sentinel decoders use for "never had a fix".
pub const INVALID_FIX_AGE: u32 = u32::MAX;
