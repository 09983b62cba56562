//! Pulse-Per-Second Hardware Traits
//!
//! Pin muxing, EXTI/GPIO configuration and NVIC priorities belong to the
//! firmware. The clock only needs to ask for rising-edge interrupts to be
//! armed and to blink something when an edge is handled.

use crate::errors::ClockResult;

/// Rising-edge interrupt line carrying the PPS signal
///
/// `enable_rising_edge` is called once, from
/// [`ClockSource::enable_pulse_discipline`](crate::ClockSource::enable_pulse_discipline),
/// after the single process-wide binding has been claimed. The firmware's
/// interrupt handler then calls
/// [`PulseDiscipline::on_edge`](crate::PulseDiscipline::on_edge).
pub trait EdgeInterrupt {
    /// Configure the line for rising edges and unmask its interrupt
    fn enable_rising_edge(&mut self) -> ClockResult<()>;
}

/// Observable indicator toggled on every handled pulse (usually an LED)
///
/// Called from interrupt context: must be a register write, nothing more.
pub trait StatusIndicator {
    /// Invert the indicator
    fn toggle(&mut self);
}

/// No indicator fitted
impl StatusIndicator for () {
    fn toggle(&mut self) {}
}
