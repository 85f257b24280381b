//! Time source and tick-loop utilities for the player.
//!
//! The player only needs a free-running microsecond counter. This module
//! defines that boundary ([`MicrosClock`]) and two ways of driving
//! [`InfoLed::tick`](crate::player::InfoLed::tick) from it: a blocking poll
//! loop (`delay-loop` feature) or a timer interrupt sharing the player through
//! `critical_section::with` (`timer-isr` feature).
//!
//! Contains helpers for polling- and ISR-based scheduling, including:
//! - `compute_ocr_value`: runtime OCR calculator for a periodic timer interrupt
//! - `const_ocr_value`: compile-time OCR calculator
//! - `run_tick_loop` / `run_ticks`: blocking driver loops for `DelayNs` (feature `delay-loop`)
//! - `global_info_led_tick` and `tick_info_led!()`: interrupt-based tick callback wrapper
//!   (feature `timer-isr`)
//!
//! Common prescalers: (For use with `compute_ocr_value` and `const_ocr_value`)
//!
//! | PRESCALER | TIMER_COUNTS | Overflow Interval |
//! |-----------|--------------|-------------------|
//! |        64 |          250 |              1 ms |
//! |       256 |          125 |              2 ms |
//! |       256 |          250 |              4 ms |
//! |      1024 |          125 |              8 ms |
//! |      1024 |          250 |             16 ms |

use crate::consts::SLOT_MICROS;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Minimum number of player ticks per symbol slot.
pub const MIN_TICKS_PER_SLOT: u32 = 2;

/// Longest tick interval that still resolves every slot.
pub const MAX_TICK_MICROS: u32 = SLOT_MICROS / MIN_TICKS_PER_SLOT;

/// A monotonic, wrapping microsecond counter.
///
/// Must never be reset during a run. Wrapping past `u32::MAX` is fine: the
/// player measures elapsed time with wrapping arithmetic.
pub trait MicrosClock {
    /// The current counter value.
    fn now_micros(&mut self) -> u32;
}

impl<F> MicrosClock for F
where
    F: FnMut() -> u32,
{
    fn now_micros(&mut self) -> u32 {
        self()
    }
}

/// Computes the OCR value for a timer in CTC mode.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `tick_us`: desired tick interval in microseconds (e.g., 1000.0)
///
/// # Returns
/// - OCR value for OCRnA (rounded to the nearest integer)
/// - Number of ticks per symbol slot at that interval
pub fn compute_ocr_value(f_cpu: u32, prescaler: u32, tick_us: f32) -> (u16, u32) {
    let ticks_per_second = f_cpu as f32 / prescaler as f32;
    let counts = ticks_per_second * (tick_us / 1_000_000.0);
    let ticks_per_slot = (SLOT_MICROS as f32 / tick_us) as u32;
    (libm::roundf(counts) as u16, ticks_per_slot)
}

/// Compile-time OCR value calculator.
///
/// Integer-only variant of [`compute_ocr_value`]; truncates instead of rounding.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `tick_us`: desired tick interval in whole microseconds
pub const fn const_ocr_value(f_cpu: u32, prescaler: u32, tick_us: u32) -> (u16, u32) {
    let counts = (f_cpu / prescaler) as u64 * tick_us as u64 / 1_000_000;
    (counts as u16, SLOT_MICROS / tick_us)
}
