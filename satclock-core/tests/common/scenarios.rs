//! Named fixes and instants used across the integration tests

use satclock_core::{CalendarDateTime, DecodedFix, FixAge};

/// 2024-01-01 00:00:00 UTC in NTP seconds
pub const NEW_YEAR_2024: u32 = 3_913_056_000;

/// One line of receiver output; the scripted decoder only cares about `\n`
pub const SENTENCE: &[u8] = b"$GPRMC,000000.50,A,,,,,,,010124,,,*00\n";

/// Fix on 2024-01-01 at `00:00:second.hundredths`
pub fn new_year_fix(second: u8, hundredths: u8, age_ms: u32) -> DecodedFix {
    DecodedFix::new(
        CalendarDateTime::new(2024, 1, 1, 0, 0, second),
        hundredths,
        FixAge::from_millis(age_ms),
    )
}

/// Fix the receiver flags as having no valid age
pub fn invalid_age_fix() -> DecodedFix {
    DecodedFix::new(CalendarDateTime::new(2024, 1, 1, 0, 0, 0), 0, FixAge::Invalid)
}

/// Fix with a date the calendar cannot hold
pub fn february_thirtieth_fix() -> DecodedFix {
    DecodedFix::new(
        CalendarDateTime::new(2024, 2, 30, 12, 0, 0),
        0,
        FixAge::from_millis(100),
    )
}
