//! Microsecond Counters
//!
//! Ready-made [`MicrosCounter`] implementations:
//! - `FnCounter` - wraps a plain function that reads a hardware timer
//! - `StdMicrosCounter` - host monotonic clock truncated to 32 bits (std)
//! - `ManualCounter` - set and advanced by hand, for tests and replays

use core::sync::atomic::{AtomicU32, Ordering};

use crate::traits::MicrosCounter;

/// Counter backed by a function pointer
///
/// For HALs that expose "read the timer" as a free function.
///
/// ```rust
/// use satclock_core::time::FnCounter;
/// use satclock_core::traits::MicrosCounter;
///
/// fn read_timer() -> u32 { 1234 }
///
/// let counter = FnCounter::new(read_timer);
/// assert_eq!(counter.now(), 1234);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct FnCounter(fn() -> u32);

impl FnCounter {
    /// Wrap a timer read function.
    pub const fn new(now: fn() -> u32) -> Self {
        Self(now)
    }
}

impl MicrosCounter for FnCounter {
    fn now(&self) -> u32 {
        (self.0)()
    }
}

/// Host monotonic clock as a wrapping microsecond counter (requires std)
///
/// Truncated to 32 bits, so it wraps like a hardware timer.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdMicrosCounter {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdMicrosCounter {
    /// Counter starting at zero now.
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for StdMicrosCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MicrosCounter for StdMicrosCounter {
    fn now(&self) -> u32 {
        self.start.elapsed().as_micros() as u32
    }
}

/// Hand-driven counter for tests and replays
///
/// Shared by reference between the clock source and the pulse handler, the
/// same way a hardware timer is. Writes are plain stores; drive it from one
/// place at a time.
#[derive(Debug, Default)]
pub struct ManualCounter {
    ticks: AtomicU32,
}

impl ManualCounter {
    /// Counter reading `ticks` until moved.
    pub const fn new(ticks: u32) -> Self {
        Self { ticks: AtomicU32::new(ticks) }
    }

    /// Jump to `ticks`.
    pub fn set(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Move forward by `micros`, wrapping like the hardware does.
    pub fn advance(&self, micros: u32) {
        let current = self.ticks.load(Ordering::Acquire);
        self.ticks.store(current.wrapping_add(micros), Ordering::Release);
    }
}

impl MicrosCounter for ManualCounter {
    fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}
