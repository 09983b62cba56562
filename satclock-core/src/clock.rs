//! GPS Clock Source
//!
//! ## Overview
//!
//! `ClockSource` is what the firmware's main loop and the NTP server see. It
//! ties the three time inputs together:
//!
//! ```text
//!              ┌──────────── poll() ────────────┐
//!  serial ───▶ │ FixIngestor::drain             │
//!              │   updated? ── yes ──▶ done     │
//!              │      │ no                      │
//!              │      ▼                         │
//!  µs timer ─▶ │ extrapolate from last_update   │
//!              └────────────────┬───────────────┘
//!                               ▼
//!                          SharedClock ◀── PulseDiscipline::on_edge ◀── PPS
//!                               │
//!                               ▼
//!                  NtpTimeSource::now() (NTP server)
//! ```
//!
//! ## Poll Cadence
//!
//! The counter wraps every ~71.6 minutes and extrapolation can only see one
//! wrap, so `poll` must run at least that often. In practice it runs every
//! main-loop pass; NMEA at 9600 baud delivers a sentence about once a second
//! and the fraction only stays fine-grained if extrapolation runs between
//! them.
//!
//! ## Example
//!
//! ```rust
//! use satclock_core::{ClockSource, DecodedFix, SharedClock};
//! use satclock_core::source::MemoryByteSource;
//! use satclock_core::time::ManualCounter;
//! use satclock_core::traits::SentenceDecoder;
//!
//! # struct NoSentences;
//! # impl SentenceDecoder for NoSentences {
//! #     fn feed(&mut self, _: u8) -> bool { false }
//! #     fn decoded_fix(&self) -> DecodedFix { unreachable!() }
//! # }
//! static CLOCK: SharedClock = SharedClock::new();
//! let timer = ManualCounter::new(0);
//!
//! let mut gps = ClockSource::new(&CLOCK, MemoryByteSource::<256>::new(), NoSentences, &timer);
//! assert!(!gps.poll());
//! assert_eq!(gps.current_whole_seconds(), 0);
//! ```

use crate::config::ClockConfig;
use crate::errors::ClockResult;
use crate::fix::FixIngestor;
use crate::pulse::{PulseDiscipline, PulseRegistry};
use crate::state::{ClockState, ClockStats, LockState, NtpTimestamp, SharedClock};
use crate::traits::{
    ByteSource, EdgeInterrupt, MicrosCounter, NtpTimeSource, SentenceDecoder, StatusIndicator,
};

/// Disciplined clock fed by an NMEA receiver, a PPS line and a µs counter
pub struct ClockSource<'a, S, D, C> {
    clock: &'a SharedClock,
    ingestor: FixIngestor<S, D>,
    counter: C,
    config: ClockConfig,
    last_lock: LockState,
}

impl<'a, S, D, C> ClockSource<'a, S, D, C>
where
    S: ByteSource,
    D: SentenceDecoder,
    C: MicrosCounter,
{
    /// Clock source with default configuration.
    pub fn new(clock: &'a SharedClock, source: S, decoder: D, counter: C) -> Self {
        Self::with_config(clock, source, decoder, counter, ClockConfig::default())
    }

    /// Clock source with explicit configuration.
    pub fn with_config(
        clock: &'a SharedClock,
        source: S,
        decoder: D,
        counter: C,
        config: ClockConfig,
    ) -> Self {
        let last_lock = clock.snapshot().lock_state();
        Self {
            clock,
            ingestor: FixIngestor::new(source, decoder),
            counter,
            config,
            last_lock,
        }
    }

    /// Take in new satellite time, or extrapolate if there was none.
    ///
    /// Returns `true` if a fix was committed during this call. Never blocks.
    pub fn poll(&mut self) -> bool {
        let updated = self.ingestor.drain(self.clock, &self.counter, &self.config);
        if !updated {
            self.clock.extrapolate(&self.counter);
        }
        self.note_lock_change();
        updated
    }

    fn note_lock_change(&mut self) {
        let lock = self.lock_state();
        if lock != self.last_lock {
            if lock == LockState::Tracking {
                log_info!("clock locked at {}", self.current_whole_seconds());
            }
            self.last_lock = lock;
        }
    }

    /// Seconds since 1900-01-01 UTC, 0 while unlocked.
    pub fn current_whole_seconds(&self) -> u32 {
        self.clock.snapshot().seconds
    }

    /// Sub-second fraction, `2^32` units per second.
    pub fn current_fraction(&self) -> u32 {
        self.clock.snapshot().fraction
    }

    /// Seconds and fraction from one consistent read.
    pub fn now(&self) -> NtpTimestamp {
        self.clock.snapshot().timestamp()
    }

    /// `Tracking` once a valid fix has been taken.
    pub fn lock_state(&self) -> LockState {
        self.clock.snapshot().lock_state()
    }

    /// Full state including the counter reference.
    pub fn snapshot(&self) -> ClockState {
        self.clock.snapshot()
    }

    /// Counters of what the clock has done so far.
    pub fn stats(&self) -> ClockStats {
        self.clock.stats()
    }

    /// Active configuration.
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// The fix ingestor with its source and decoder.
    pub fn ingestor(&self) -> &FixIngestor<S, D> {
        &self.ingestor
    }

    /// Mutable access to the byte source, e.g. to push replayed data.
    pub fn source_mut(&mut self) -> &mut S {
        self.ingestor.source_mut()
    }

    /// Claim the PPS binding, arm the edge interrupt and return the handler.
    ///
    /// The runtime keeps the returned [`PulseDiscipline`] where its interrupt
    /// handler can reach it. Calling this again while that handler is alive,
    /// from this or any other clock source, fails with
    /// [`ClockError::PulseAlreadyBound`](crate::ClockError::PulseAlreadyBound)
    /// and leaves the line alone.
    pub fn enable_pulse_discipline<L, I>(
        &self,
        registry: &'a PulseRegistry,
        line: &mut L,
        indicator: I,
    ) -> ClockResult<PulseDiscipline<'a, C, I>>
    where
        C: Clone,
        L: EdgeInterrupt,
        I: StatusIndicator,
    {
        let handler = PulseDiscipline::bind(self.clock, registry, self.counter.clone(), indicator)?;
        // On failure the handler drops here and releases the binding
        line.enable_rising_edge()?;
        log_info!("pulse-per-second discipline enabled");
        Ok(handler)
    }

    /// Give back source, decoder and counter.
    pub fn into_parts(self) -> (S, D, C) {
        let (source, decoder) = self.ingestor.into_parts();
        (source, decoder, self.counter)
    }
}

impl<S, D, C> NtpTimeSource for ClockSource<'_, S, D, C>
where
    S: ByteSource,
    D: SentenceDecoder,
    C: MicrosCounter,
{
    fn seconds_since_epoch(&self) -> u32 {
        self.current_whole_seconds()
    }

    fn fractional_seconds(&self) -> u32 {
        self.current_fraction()
    }

    fn now(&self) -> NtpTimestamp {
        ClockSource::now(self)
    }

    fn lock_state(&self) -> LockState {
        ClockSource::lock_state(self)
    }
}
