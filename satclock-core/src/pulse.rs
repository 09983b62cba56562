//! Pulse-Per-Second Discipline
//!
//! ## Overview
//!
//! A GPS receiver's PPS output rises at the start of every UTC second with
//! sub-microsecond accuracy, much tighter than anything the serial sentences
//! can deliver. Each rising edge sets the clock to the start of the next
//! second:
//!
//! ```text
//! PPS   ──┐ ┌───────────────┐ ┌─────
//!         └─┘               └─┘
//!           │ seconds += 1    │ seconds += 1
//!           │ fraction = 0    │ fraction = 0
//!           │ last_update = µs│
//! ```
//!
//! ## Binding
//!
//! There is one PPS line per board, so there can only be one handler. The
//! runtime owns a [`PulseRegistry`] (typically a `static`) and passes it to
//! [`ClockSource::enable_pulse_discipline`](crate::ClockSource::enable_pulse_discipline).
//! A second claim fails with [`ClockError::PulseAlreadyBound`] until the first
//! [`PulseDiscipline`] is dropped.
//!
//! The returned handler is not called by this crate. The firmware stores it
//! where its interrupt handler can reach it and calls
//! [`on_edge`](PulseDiscipline::on_edge) on every edge:
//!
//! ```rust
//! use satclock_core::{PulseDiscipline, PulseRegistry, SharedClock};
//! use satclock_core::time::ManualCounter;
//!
//! static CLOCK: SharedClock = SharedClock::new();
//! static PPS: PulseRegistry = PulseRegistry::new();
//! static TIMER: ManualCounter = ManualCounter::new(0);
//!
//! let mut handler = PulseDiscipline::bind(&CLOCK, &PPS, &TIMER, ()).unwrap();
//!
//! // In the EXTI interrupt handler:
//! handler.on_edge();
//! assert_eq!(CLOCK.stats().pulses, 1);
//! ```
//!
//! ## Interrupt Context Rules
//!
//! `on_edge` reads the counter, runs one short critical section and toggles
//! the indicator. It does not log, allocate, or touch the serial side.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::errors::{ClockError, ClockResult};
use crate::state::{ClockState, SharedClock};
use crate::traits::{MicrosCounter, StatusIndicator};

/// Process-wide guard for the single PPS binding
pub struct PulseRegistry {
    bound: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl PulseRegistry {
    /// Unbound registry, usable as a `static`.
    pub const fn new() -> Self {
        Self { bound: Mutex::new(Cell::new(false)) }
    }

    /// Take the binding. Fails if it is already held.
    pub fn claim(&self) -> ClockResult<PulseClaim<'_>> {
        let already = self.bound.lock(|bound| bound.replace(true));
        if already {
            return Err(ClockError::PulseAlreadyBound);
        }
        Ok(PulseClaim { registry: self })
    }

    /// Whether a handler currently holds the binding.
    pub fn is_bound(&self) -> bool {
        self.bound.lock(|bound| bound.get())
    }
}

impl core::fmt::Debug for PulseRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PulseRegistry").field("bound", &self.is_bound()).finish()
    }
}

impl Default for PulseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Held binding; released on drop
#[derive(Debug)]
pub struct PulseClaim<'r> {
    registry: &'r PulseRegistry,
}

impl Drop for PulseClaim<'_> {
    fn drop(&mut self) {
        self.registry.bound.lock(|bound| bound.set(false));
    }
}

/// Interrupt-context PPS handler
pub struct PulseDiscipline<'a, C, I> {
    clock: &'a SharedClock,
    counter: C,
    indicator: I,
    _claim: PulseClaim<'a>,
}

impl<'a, C: MicrosCounter, I: StatusIndicator> PulseDiscipline<'a, C, I> {
    /// Claim the PPS binding and build a handler for `clock`.
    ///
    /// Does not touch the interrupt line; see
    /// [`ClockSource::enable_pulse_discipline`](crate::ClockSource::enable_pulse_discipline)
    /// for the variant that also arms it.
    pub fn bind(
        clock: &'a SharedClock,
        registry: &'a PulseRegistry,
        counter: C,
        indicator: I,
    ) -> ClockResult<Self> {
        let claim = registry.claim()?;
        Ok(Self { clock, counter, indicator, _claim: claim })
    }

    /// Handle one rising edge. Call from the interrupt handler.
    pub fn on_edge(&mut self) -> ClockState {
        // Capture first: the closer to the edge, the better
        let now = self.counter.now();
        let state = self.clock.apply_pulse(now);
        self.indicator.toggle();
        state
    }

    /// The status indicator toggled on each edge.
    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

impl<C, I> core::fmt::Debug for PulseDiscipline<'_, C, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PulseDiscipline").field("clock", self.clock).finish()
    }
}
