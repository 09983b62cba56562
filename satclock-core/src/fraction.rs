//! Fixed-Point Second Fractions
//!
//! Sub-second time is a 32-bit binary fraction: `FULL_SCALE = 2^32` units make
//! one second, so any `u32` is a valid fraction and the invariant
//! `fraction < FULL_SCALE` holds by type. What has to be handled explicitly is
//! overflow: adding two fractions can cross a second boundary, and that carry
//! must land in the whole-seconds counter instead of being lost.
//!
//! ```text
//!   hundredths ──× FRACTION_PER_HUNDREDTH──▶ fraction
//!   elapsed µs ──÷ 1_000_000──▶ carry seconds
//!              └─% 1_000_000 × FRACTION_PER_MICROSECOND──▶ fraction delta
//! ```
//!
//! Both scale factors are truncated integers (`42_949_672` and `4_294`), so a
//! converted value is always slightly below the exact one and can never reach
//! `FULL_SCALE` on its own.

use fugit::MicrosDurationU32;

use crate::constants::ntp::{FRACTION_PER_HUNDREDTH, FRACTION_PER_MICROSECOND};
use crate::constants::time::US_PER_SECOND;

/// Elapsed time split into whole seconds and a fraction delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMicros {
    /// Whole seconds contained in the elapsed time
    pub carry_seconds: u32,
    /// Remaining sub-second part, in fraction units
    pub fraction_delta: u32,
}

/// Convert decoded hundredths of a second into fraction units.
///
/// `hundredths` must be below 100; the fix ingestor rejects anything else
/// before converting.
#[inline]
pub const fn hundredths_to_fraction(hundredths: u8) -> u32 {
    hundredths as u32 * FRACTION_PER_HUNDREDTH
}

/// Split an elapsed microsecond count into carry seconds and a fraction delta.
#[inline]
pub const fn split_micros(elapsed: MicrosDurationU32) -> SplitMicros {
    let micros = elapsed.ticks();
    SplitMicros {
        carry_seconds: micros / US_PER_SECOND,
        fraction_delta: (micros % US_PER_SECOND) * FRACTION_PER_MICROSECOND,
    }
}

/// Add `delta` to `fraction`, returning the wrapped sum and whether it
/// carried into the next second.
#[inline]
pub const fn add_fraction(fraction: u32, delta: u32) -> (u32, bool) {
    fraction.overflowing_add(delta)
}

/// Convert a fraction into whole microseconds (truncating).
#[inline]
pub const fn fraction_to_micros(fraction: u32) -> u32 {
    ((fraction as u64 * US_PER_SECOND as u64) >> 32) as u32
}

/// View a fraction as an unsigned `0.32` fixed-point number.
#[cfg(feature = "fixed")]
#[inline]
pub fn fraction_to_fixed(fraction: u32) -> fixed::types::U0F32 {
    fixed::types::U0F32::from_bits(fraction)
}
