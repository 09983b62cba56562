//! Clock State Shared Between Poll Loop and Interrupt
//!
//! ## Overview
//!
//! The clock is three numbers that only make sense together:
//!
//! ```text
//! ┌──────────────┬──────────────┬────────────────┐
//! │ seconds: u32 │ fraction: u32│ last_update: u32│
//! │ since 1900   │ 2^32 = 1 s   │ µs counter     │
//! └──────────────┴──────────────┴────────────────┘
//! ```
//!
//! Three writers touch them: the fix ingestor and the extrapolation engine
//! from the poll loop, and the pulse discipline from interrupt context. The
//! interrupt can fire between any two instructions of the poll loop, so a
//! field-by-field update could leave a reader (or the next writer) with
//! seconds from one instant and a fraction from another.
//!
//! ## Transactions
//!
//! [`SharedClock`] keeps the triple in a `Cell` behind an
//! `embassy_sync` blocking mutex over `CriticalSectionRawMutex`. Every read
//! and every read-modify-write runs inside one critical section:
//!
//! ```text
//! poll loop                              PPS interrupt
//!    │ transact {                           │
//!    │   read triple                        │  (edge arrives, stays pending)
//!    │   compute                            │
//!    │   write triple                       │
//!    │ }  ───────── interrupts unmasked ───▶│ transact { seconds += 1 ... }
//! ```
//!
//! A pulse that arrives during a commit is therefore applied exactly once, on
//! top of the committed value. Because extrapolation reads and writes inside
//! the same section, it can never write back a pre-pulse value.
//!
//! The transitions themselves are pure functions on [`ClockState`] so they
//! can be tested without any locking.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use fugit::MicrosDurationU32;

use crate::fraction::{add_fraction, split_micros};
use crate::traits::MicrosCounter;

/// Whole seconds, fraction and the counter instant they were valid at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Seconds since 1900-01-01 UTC, 0 while unlocked
    pub seconds: u32,
    /// Sub-second offset, `2^32` units per second
    pub fraction: u32,
    /// Microsecond counter value at the last update
    pub last_update: u32,
}

/// Whether the clock currently has a usable time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    /// No valid fix yet, or the last fix was stale
    Unlocked,
    /// Following a valid fix, pulses and extrapolation
    Tracking,
}

impl ClockState {
    /// The startup state: unlocked, counter reference zero.
    pub const ZERO: Self = Self { seconds: 0, fraction: 0, last_update: 0 };

    /// Unlocked state referenced to counter value `now`.
    pub const fn unlocked(now: u32) -> Self {
        Self { seconds: 0, fraction: 0, last_update: now }
    }

    /// State taken from an authoritative fix.
    pub const fn from_fix(seconds: u32, fraction: u32, now: u32) -> Self {
        Self { seconds, fraction, last_update: now }
    }

    /// `Unlocked` while `seconds` is zero.
    pub const fn lock_state(&self) -> LockState {
        if self.seconds == 0 {
            LockState::Unlocked
        } else {
            LockState::Tracking
        }
    }

    /// `true` once a valid fix has been taken.
    pub const fn is_locked(&self) -> bool {
        self.seconds != 0
    }

    /// Counter ticks since the last update, tolerant of one counter wrap.
    pub const fn elapsed_since_update(&self, now: u32) -> MicrosDurationU32 {
        MicrosDurationU32::from_ticks(now.wrapping_sub(self.last_update))
    }

    /// State after a PPS edge seen at counter value `now`.
    ///
    /// The edge marks the start of the next second. An unlocked clock has no
    /// second to advance, so it only moves its reference instant.
    pub const fn pulsed(self, now: u32) -> Self {
        if !self.is_locked() {
            return Self::unlocked(now);
        }
        Self {
            seconds: self.seconds.wrapping_add(1),
            fraction: 0,
            last_update: now,
        }
    }

    /// State advanced by the counter time elapsed up to `now`.
    pub const fn extrapolated(self, now: u32) -> Self {
        if !self.is_locked() {
            return Self::unlocked(now);
        }
        let split = split_micros(self.elapsed_since_update(now));
        let (fraction, carried) = add_fraction(self.fraction, split.fraction_delta);
        Self {
            seconds: self
                .seconds
                .wrapping_add(split.carry_seconds)
                .wrapping_add(carried as u32),
            fraction,
            last_update: now,
        }
    }

    /// Seconds and fraction as an NTP timestamp.
    pub const fn timestamp(&self) -> NtpTimestamp {
        NtpTimestamp { seconds: self.seconds, fraction: self.fraction }
    }
}

/// 64-bit NTP timestamp: 32 bits of seconds, 32 bits of fraction.
///
/// Ordering compares seconds first, then fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpTimestamp {
    /// Seconds since 1900-01-01 UTC
    pub seconds: u32,
    /// Sub-second fraction, `2^32` units per second
    pub fraction: u32,
}

impl NtpTimestamp {
    /// Network byte order, ready to copy into a packet field.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        let s = self.seconds.to_be_bytes();
        let f = self.fraction.to_be_bytes();
        [s[0], s[1], s[2], s[3], f[0], f[1], f[2], f[3]]
    }

    /// Parse a timestamp from network byte order.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self {
            seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Seconds in the high word, fraction in the low word.
    pub const fn as_u64(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }
}

/// Counters describing what the clock has been doing.
///
/// Updated inside the same critical section as the state change they count,
/// so a snapshot is always consistent with the state it was read alongside.
/// All counters wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockStats {
    /// Fixes that moved the clock to a new second
    pub fixes_committed: u32,
    /// Fixes for the second already held
    pub duplicate_fixes: u32,
    /// Fixes rejected for age or the invalid sentinel
    pub stale_fixes: u32,
    /// Fixes rejected for out-of-range calendar fields
    pub malformed_fixes: u32,
    /// PPS edges handled
    pub pulses: u32,
    /// Extrapolation steps taken
    pub extrapolations: u32,
    /// Transitions from tracking to unlocked
    pub lock_losses: u32,
    /// Read errors reported by the byte source
    pub source_errors: u32,
}

impl ClockStats {
    const ZERO: Self = Self {
        fixes_committed: 0,
        duplicate_fixes: 0,
        stale_fixes: 0,
        malformed_fixes: 0,
        pulses: 0,
        extrapolations: 0,
        lock_losses: 0,
        source_errors: 0,
    };
}

#[derive(Clone, Copy)]
struct Shared {
    state: ClockState,
    stats: ClockStats,
}

/// Clock state shared between the poll loop and the PPS interrupt.
///
/// `const`-constructible so it can live in a `static`:
///
/// ```rust
/// use satclock_core::{SharedClock, LockState};
///
/// static CLOCK: SharedClock = SharedClock::new();
///
/// assert_eq!(CLOCK.snapshot().lock_state(), LockState::Unlocked);
/// ```
pub struct SharedClock {
    inner: Mutex<CriticalSectionRawMutex, Cell<Shared>>,
}

impl SharedClock {
    /// Unlocked clock with zeroed statistics.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Shared {
                state: ClockState::ZERO,
                stats: ClockStats::ZERO,
            })),
        }
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> ClockState {
        self.inner.lock(|cell| cell.get().state)
    }

    /// Consistent copy of the statistics.
    pub fn stats(&self) -> ClockStats {
        self.inner.lock(|cell| cell.get().stats)
    }

    /// Run `f` on the state and statistics inside one critical section.
    ///
    /// Keep `f` short: interrupts are masked while it runs.
    pub fn transact<R>(&self, f: impl FnOnce(&mut ClockState, &mut ClockStats) -> R) -> R {
        self.inner.lock(|cell| {
            let mut shared = cell.get();
            let result = f(&mut shared.state, &mut shared.stats);
            cell.set(shared);
            result
        })
    }

    /// Apply a PPS edge seen at counter value `now`.
    pub fn apply_pulse(&self, now: u32) -> ClockState {
        self.transact(|state, stats| {
            *state = state.pulsed(now);
            stats.pulses = stats.pulses.wrapping_add(1);
            *state
        })
    }

    /// Advance by the counter time elapsed since the last update.
    ///
    /// The counter is read inside the critical section. A reading taken
    /// before it could predate a pulse that lands in between, and the
    /// elapsed time would then wrap to about 71 minutes.
    pub fn extrapolate<C: MicrosCounter + ?Sized>(&self, counter: &C) -> ClockState {
        self.transact(|state, stats| {
            *state = state.extrapolated(counter.now());
            stats.extrapolations = stats.extrapolations.wrapping_add(1);
            *state
        })
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SharedClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedClock")
            .field("state", &self.snapshot())
            .finish()
    }
}
