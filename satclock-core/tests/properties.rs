//! Property tests for time arithmetic
//!
//! - Calendar conversion agrees with chrono over the whole supported range
//! - Extrapolation never goes backwards and survives counter wrap
//! - Pulses always land on a whole second

use chrono::NaiveDate;
use proptest::prelude::*;
use satclock_core::{
    constants::ntp::UNIX_EPOCH_OFFSET,
    epoch::{days_in_month, is_leap_year},
    CalendarDateTime, ClockState,
};

const NTP_ERA: i64 = 1 << 32;

fn calendar() -> impl Strategy<Value = CalendarDateTime> {
    (1900u16..=2099, 1u8..=12)
        .prop_flat_map(|(year, month)| {
            (
                Just(year),
                Just(month),
                1..=days_in_month(year, month),
                0u8..24,
                0u8..60,
                0u8..60,
            )
        })
        .prop_map(|(year, month, day, hour, minute, second)| {
            CalendarDateTime::new(year, month, day, hour, minute, second)
        })
}

fn tracking() -> impl Strategy<Value = ClockState> {
    (1u32.., any::<u32>(), any::<u32>())
        .prop_map(|(seconds, fraction, last_update)| ClockState::from_fix(seconds, fraction, last_update))
}

proptest! {
    #[test]
    fn epoch_matches_chrono(dt in calendar()) {
        let unix = NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))
            .and_then(|date| date.and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second)))
            .map(|naive| naive.and_utc().timestamp())
            .unwrap();
        let expected = (unix + i64::from(UNIX_EPOCH_OFFSET)).rem_euclid(NTP_ERA) as u32;

        prop_assert!(dt.validate().is_ok());
        prop_assert_eq!(dt.to_ntp_seconds(), expected);
    }

    #[test]
    fn leap_years_match_chrono(year in 1900u16..=2099) {
        let chrono_leap = NaiveDate::from_ymd_opt(i32::from(year), 2, 29).is_some();
        prop_assert_eq!(is_leap_year(year), chrono_leap);
    }

    #[test]
    fn extrapolation_never_goes_backwards(
        start in tracking(),
        steps in prop::collection::vec(0u32..5_000_000, 1..32),
    ) {
        let mut state = start;
        let mut now = start.last_update;
        for step in steps {
            now = now.wrapping_add(step);
            let next = state.extrapolated(now);
            // Only the NTP era rollover may move the seconds below where they were
            if next.seconds >= state.seconds {
                prop_assert!(next.timestamp() >= state.timestamp());
            }
            prop_assert_eq!(next.last_update, now);
            state = next;
        }
    }

    #[test]
    fn stepwise_extrapolation_never_runs_ahead(
        steps in prop::collection::vec(0u32..2_000_000, 1..16),
    ) {
        let start = ClockState::from_fix(1_000, 0, 0);
        let total: u32 = steps.iter().sum();

        let mut stepwise = start;
        let mut now = 0u32;
        for step in &steps {
            now += step;
            stepwise = stepwise.extrapolated(now);
        }
        let single = start.extrapolated(total);

        // 1 µs is 4294 units, a shade under 2^32 / 10^6
        let slack = steps.len() as u64 * ((1u64 << 32) - 1_000_000 * 4294);
        let (a, b) = (stepwise.timestamp().as_u64(), single.timestamp().as_u64());
        prop_assert!(a <= b);
        prop_assert!(b - a <= slack);
    }

    #[test]
    fn extrapolation_ignores_counter_origin(
        seconds in 1u32..u32::MAX / 2,
        fraction in any::<u32>(),
        origin in any::<u32>(),
        elapsed in any::<u32>(),
    ) {
        let from_zero = ClockState::from_fix(seconds, fraction, 0).extrapolated(elapsed);
        let shifted = ClockState::from_fix(seconds, fraction, origin)
            .extrapolated(origin.wrapping_add(elapsed));

        prop_assert_eq!(shifted.timestamp(), from_zero.timestamp());
    }

    #[test]
    fn pulse_lands_on_whole_second(start in tracking(), now in any::<u32>()) {
        let pulsed = start.pulsed(now);

        prop_assert_eq!(pulsed.seconds, start.seconds.wrapping_add(1));
        prop_assert_eq!(pulsed.fraction, 0);
        prop_assert_eq!(pulsed.last_update, now);
    }

    #[test]
    fn unlocked_clock_stays_at_zero(last_update in any::<u32>(), now in any::<u32>()) {
        let unlocked = ClockState::unlocked(last_update);

        prop_assert_eq!(unlocked.extrapolated(now), ClockState::unlocked(now));
        prop_assert_eq!(unlocked.pulsed(now), ClockState::unlocked(now));
    }
}
