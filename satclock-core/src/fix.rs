//! Satellite Fix Ingestion
//!
//! ## Overview
//!
//! Once per poll the ingestor drains every byte the serial port has buffered
//! into the external NMEA decoder. Each time the decoder completes a sentence
//! with date and time, the decoded fix is judged and either committed to the
//! clock, ignored as a repeat, or used to drop the clock to unlocked.
//!
//! ```text
//! ByteSource ──byte──▶ SentenceDecoder ──complete──▶ judge ──▶ SharedClock
//!      ▲                                               │
//!      └──────── until bytes_available() == 0 ─────────┘
//! ```
//!
//! ## Judging a Fix
//!
//! | Condition                                   | Clock becomes       | Reported |
//! |---------------------------------------------|---------------------|----------|
//! | age is the invalid sentinel                 | (0, 0, now)         | no update|
//! | age >= stale threshold (5 s)                | (0, 0, now)         | no update|
//! | calendar field or hundredths out of range   | (0, 0, now)         | no update|
//! | whole second differs from the held one      | (secs, frac, now)   | update   |
//! | same whole second                           | unchanged (default) | no update|
//!
//! Conversion and validation happen before the critical section; only the
//! compare-and-commit runs with interrupts masked.

use fugit::MillisDurationU32;

use crate::config::{ClockConfig, DuplicateFixPolicy};
use crate::constants::ntp::INVALID_FIX_AGE;
use crate::epoch::CalendarDateTime;
use crate::errors::{ClockError, ClockResult};
use crate::fraction::hundredths_to_fraction;
use crate::state::{ClockState, SharedClock};
use crate::traits::{ByteSource, MicrosCounter, SentenceDecoder};

/// Receiver-reported age of its internal fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAge {
    /// The receiver has never had a fix
    Invalid,
    /// Time since the receiver last updated its fix
    Age(MillisDurationU32),
}

impl FixAge {
    /// Interpret a raw decoder value, where `u32::MAX` means "never fixed".
    pub const fn from_millis(raw: u32) -> Self {
        if raw == INVALID_FIX_AGE {
            Self::Invalid
        } else {
            Self::Age(MillisDurationU32::from_ticks(raw))
        }
    }

    /// `true` if the age is known and strictly below `stale_after`.
    pub fn is_fresh(&self, stale_after: MillisDurationU32) -> bool {
        match self {
            Self::Invalid => false,
            Self::Age(age) => *age < stale_after,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FixAge {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Invalid => defmt::write!(fmt, "invalid"),
            Self::Age(age) => defmt::write!(fmt, "{}ms", age.ticks()),
        }
    }
}

/// Date, time and fix age extracted from one completed sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedFix {
    /// UTC calendar date and whole-second time
    pub date_time: CalendarDateTime,
    /// Sub-second part in hundredths, 0..=99
    pub hundredths: u8,
    /// Receiver-reported age of the fix
    pub age: FixAge,
}

impl DecodedFix {
    /// Fix from its decoded parts.
    pub const fn new(date_time: CalendarDateTime, hundredths: u8, age: FixAge) -> Self {
        Self { date_time, hundredths, age }
    }

    /// Check calendar fields and hundredths.
    pub fn validate(&self) -> ClockResult<()> {
        self.date_time.validate()?;
        if self.hundredths > 99 {
            return Err(ClockError::InvalidHundredths { value: self.hundredths });
        }
        Ok(())
    }
}

/// What a single decoded fix did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixOutcome {
    /// New whole second committed
    Committed,
    /// Same second, fraction moved forward (`RefineForward` only)
    Refined,
    /// Same second, clock untouched
    Duplicate,
    /// Invalid or stale age; clock unlocked
    Stale,
    /// Fields out of range; clock unlocked
    Malformed(ClockError),
}

impl FixOutcome {
    /// Whether the clock took an authoritative time from this fix.
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Committed | Self::Refined)
    }
}

#[derive(Clone, Copy)]
enum Verdict {
    Usable { seconds: u32, fraction: u32 },
    Stale,
    Malformed(ClockError),
}

fn judge(fix: &DecodedFix, config: &ClockConfig) -> Verdict {
    if !fix.age.is_fresh(config.stale_after()) {
        return Verdict::Stale;
    }
    if let Err(err) = fix.validate() {
        return Verdict::Malformed(err);
    }
    Verdict::Usable {
        seconds: fix.date_time.to_ntp_seconds(),
        fraction: hundredths_to_fraction(fix.hundredths),
    }
}

/// Judge one decoded fix and apply it to `clock` in a single transaction.
pub fn apply_fix<C: MicrosCounter>(
    clock: &SharedClock,
    counter: &C,
    config: &ClockConfig,
    fix: &DecodedFix,
) -> FixOutcome {
    let verdict = judge(fix, config);

    let (outcome, lost_lock) = clock.transact(|state, stats| {
        let now = counter.now();
        let was_locked = state.is_locked();

        let outcome = match verdict {
            Verdict::Stale => {
                *state = ClockState::unlocked(now);
                stats.stale_fixes = stats.stale_fixes.wrapping_add(1);
                FixOutcome::Stale
            }
            Verdict::Malformed(err) => {
                *state = ClockState::unlocked(now);
                stats.malformed_fixes = stats.malformed_fixes.wrapping_add(1);
                FixOutcome::Malformed(err)
            }
            Verdict::Usable { seconds, fraction } if seconds != state.seconds => {
                *state = ClockState::from_fix(seconds, fraction, now);
                stats.fixes_committed = stats.fixes_committed.wrapping_add(1);
                FixOutcome::Committed
            }
            Verdict::Usable { seconds, fraction } => {
                let current = state.extrapolated(now);
                let refine = config.duplicate_policy == DuplicateFixPolicy::RefineForward
                    && current.seconds == seconds
                    && fraction > current.fraction;
                if refine {
                    *state = ClockState::from_fix(seconds, fraction, now);
                    stats.fixes_committed = stats.fixes_committed.wrapping_add(1);
                    FixOutcome::Refined
                } else {
                    stats.duplicate_fixes = stats.duplicate_fixes.wrapping_add(1);
                    FixOutcome::Duplicate
                }
            }
        };

        let lost_lock = was_locked && !state.is_locked();
        if lost_lock {
            stats.lock_losses = stats.lock_losses.wrapping_add(1);
        }
        (outcome, lost_lock)
    });

    match outcome {
        FixOutcome::Committed => log_debug!("fix committed: {}", fix.date_time.to_ntp_seconds()),
        FixOutcome::Refined => log_debug!("fix refined fraction to {}", hundredths_to_fraction(fix.hundredths)),
        FixOutcome::Duplicate => log_debug!("duplicate fix ignored"),
        FixOutcome::Stale => log_debug!("stale fix rejected"),
        FixOutcome::Malformed(_) => log_warn!("malformed fix rejected"),
    }
    if lost_lock {
        log_warn!("clock unlocked: no usable satellite time");
    }

    outcome
}

/// Drains a byte source through a sentence decoder into the clock
pub struct FixIngestor<S, D> {
    source: S,
    decoder: D,
}

impl<S: ByteSource, D: SentenceDecoder> FixIngestor<S, D> {
    /// Ingestor reading from `source` through `decoder`.
    pub fn new(source: S, decoder: D) -> Self {
        Self { source, decoder }
    }

    /// Feed every available byte to the decoder and apply completed fixes.
    ///
    /// Returns `true` if any fix in this drain was an authoritative update.
    /// Never blocks: stops as soon as the source has nothing ready or reports
    /// an error.
    pub fn drain<C: MicrosCounter>(
        &mut self,
        clock: &SharedClock,
        counter: &C,
        config: &ClockConfig,
    ) -> bool {
        let mut updated = false;

        while self.source.bytes_available() > 0 {
            let byte = match self.source.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    clock.transact(|_, stats| {
                        stats.source_errors = stats.source_errors.wrapping_add(1);
                    });
                    log_warn!("byte source read failed, draining stopped");
                    break;
                }
            };

            if self.decoder.feed(byte) {
                let fix = self.decoder.decoded_fix();
                updated |= apply_fix(clock, counter, config, &fix).is_update();
            }
        }

        updated
    }

    /// The byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The sentence decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Give back the source and decoder.
    pub fn into_parts(self) -> (S, D) {
        (self.source, self.decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ntp::FRACTION_PER_HUNDREDTH;
    use crate::time::ManualCounter;

    const NEW_YEAR_2024: u32 = 3_913_056_000;

    fn fix(second: u8, hundredths: u8, age_ms: u32) -> DecodedFix {
        DecodedFix::new(
            CalendarDateTime::new(2024, 1, 1, 0, 0, second),
            hundredths,
            FixAge::from_millis(age_ms),
        )
    }

    #[test]
    fn fresh_fix_is_committed() {
        let clock = SharedClock::new();
        let counter = ManualCounter::new(777);
        let outcome = apply_fix(&clock, &counter, &ClockConfig::default(), &fix(0, 50, 100));

        assert_eq!(outcome, FixOutcome::Committed);
        let state = clock.snapshot();
        assert_eq!(state.seconds, NEW_YEAR_2024);
        assert_eq!(state.fraction, 50 * FRACTION_PER_HUNDREDTH);
        assert_eq!(state.last_update, 777);
    }

    #[test]
    fn same_second_is_ignored() {
        let clock = SharedClock::new();
        let counter = ManualCounter::new(0);
        let config = ClockConfig::default();

        assert_eq!(apply_fix(&clock, &counter, &config, &fix(5, 0, 100)), FixOutcome::Committed);
        let before = clock.snapshot();
        counter.advance(300_000);
        assert_eq!(apply_fix(&clock, &counter, &config, &fix(5, 40, 100)), FixOutcome::Duplicate);
        assert_eq!(clock.snapshot(), before);
        assert_eq!(clock.stats().duplicate_fixes, 1);
    }

    #[test]
    fn refine_forward_only_moves_ahead() {
        let clock = SharedClock::new();
        let counter = ManualCounter::new(0);
        let config = ClockConfig::default().with_duplicate_policy(DuplicateFixPolicy::RefineForward);

        apply_fix(&clock, &counter, &config, &fix(5, 0, 100));
        counter.advance(100_000);
        assert_eq!(apply_fix(&clock, &counter, &config, &fix(5, 50, 100)), FixOutcome::Refined);
        assert_eq!(clock.snapshot().fraction, 50 * FRACTION_PER_HUNDREDTH);

        // 0.2 s reported while the clock is already ~0.6 s in
        counter.advance(100_000);
        assert_eq!(apply_fix(&clock, &counter, &config, &fix(5, 20, 100)), FixOutcome::Duplicate);
        assert_eq!(clock.snapshot().fraction, 50 * FRACTION_PER_HUNDREDTH);
    }

    #[test]
    fn stale_and_invalid_ages_unlock() {
        let config = ClockConfig::default();
        for age in [5000, 60_000, INVALID_FIX_AGE] {
            let clock = SharedClock::new();
            let counter = ManualCounter::new(10);
            apply_fix(&clock, &counter, &config, &fix(0, 0, 100));
            assert!(clock.snapshot().is_locked());

            counter.set(20);
            assert_eq!(apply_fix(&clock, &counter, &config, &fix(1, 0, age)), FixOutcome::Stale);
            assert_eq!(clock.snapshot(), ClockState::unlocked(20));
            assert_eq!(clock.stats().lock_losses, 1);
        }
    }

    #[test]
    fn age_just_under_threshold_is_accepted() {
        let clock = SharedClock::new();
        let counter = ManualCounter::new(0);
        let outcome = apply_fix(&clock, &counter, &ClockConfig::default(), &fix(0, 0, 4999));
        assert_eq!(outcome, FixOutcome::Committed);
    }

    #[test]
    fn malformed_fix_unlocks() {
        let clock = SharedClock::new();
        let counter = ManualCounter::new(0);
        let config = ClockConfig::default();
        apply_fix(&clock, &counter, &config, &fix(0, 0, 100));

        let bad = DecodedFix::new(CalendarDateTime::new(2024, 2, 30, 0, 0, 0), 0, FixAge::from_millis(10));
        assert_eq!(
            apply_fix(&clock, &counter, &config, &bad),
            FixOutcome::Malformed(ClockError::InvalidDateTime { field: "day" })
        );
        assert!(!clock.snapshot().is_locked());

        let bad = fix(1, 100, 10);
        assert_eq!(
            apply_fix(&clock, &counter, &config, &bad),
            FixOutcome::Malformed(ClockError::InvalidHundredths { value: 100 })
        );
        assert_eq!(clock.stats().malformed_fixes, 2);
    }

    #[test]
    fn fix_age_sentinel() {
        assert_eq!(FixAge::from_millis(u32::MAX), FixAge::Invalid);
        assert!(FixAge::from_millis(0).is_fresh(MillisDurationU32::from_ticks(5000)));
        assert!(!FixAge::Invalid.is_fresh(MillisDurationU32::from_ticks(u32::MAX)));
    }
}
