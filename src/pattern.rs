//! Periodic timing patterns.
//!
//! A [`Pattern`] maps the time elapsed since the player was enabled onto a
//! [`RenderInstruction`]: how bright the LED is and which symbol, if any, is on
//! air. Every variant is a pure function of `elapsed % period`, so the output is
//! defined for unbounded elapsed time and a receiver can lock on at any point.
//!
//! ## Variants
//!
//! | Pattern     | Period | Timeline |
//! |-------------|--------|----------|
//! | `Constant`  | 46 slots | frame, back to back, full brightness |
//! | `FastBlink` | 1 s    | calibration, frame, steady glow to 0.5 s, dark |
//! | `SlowBlink` | 2 s    | lit for 1 s (calibration + frame, twice), dark for 1 s |
//! | `Breathing` | 2 s    | triangular ramp 0 -> 127 -> 0, calibration + frame bursts offset by ¼ period |
//!
//! ## Windows
//!
//! Each variant is described by a [`Layout`]: a lit range within the period,
//! and a repeating cycle inside it holding the calibration, frame and steady
//! windows as `[start, end)` offsets. Windows are checked in that order, so
//! calibration wins over frame and frame over steady. Whatever the cycle does
//! not cover is dark.

use core::ops::Range;

use crate::consts::{
    CALIB_WINDOW_MICROS, FRAME_LEN, FRAME_WINDOW_MICROS, FULL_BRIGHTNESS, MICROS_PER_SEC,
    SLOT_MICROS,
};
use crate::error::{Error, Result};

/// What the LED is signaling during one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Activity {
    /// Alternating 0/1 test signal; `index` counts slots since the burst began.
    Calibration {
        /// Slot index within the calibration burst.
        index: usize,
    },
    /// Frame symbol `index` is on air.
    Frame {
        /// Index into the frame's symbol table.
        index: usize,
    },
    /// No symbol on air; brightness only.
    #[default]
    Steady,
}

/// One sample of a pattern's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RenderInstruction {
    /// Brightness on a 0–255 scale.
    pub brightness: u8,
    /// Calibration, frame, or neither.
    pub activity: Activity,
}

impl RenderInstruction {
    /// No light, nothing on air.
    pub const DARK: Self = Self::steady(0);

    /// A calibration slot at `brightness`.
    pub const fn calibration(brightness: u8, index: usize) -> Self {
        Self {
            brightness,
            activity: Activity::Calibration { index },
        }
    }

    /// A frame slot at `brightness`.
    pub const fn frame(brightness: u8, index: usize) -> Self {
        Self {
            brightness,
            activity: Activity::Frame { index },
        }
    }

    /// A steady, unmodulated glow at `brightness`.
    pub const fn steady(brightness: u8) -> Self {
        Self {
            brightness,
            activity: Activity::Steady,
        }
    }

    /// The calibration slot index, if a calibration burst is active.
    pub fn calibration_index(&self) -> Option<usize> {
        match self.activity {
            Activity::Calibration { index } => Some(index),
            _ => None,
        }
    }

    /// The frame symbol index, if a frame burst is active.
    pub fn frame_index(&self) -> Option<usize> {
        match self.activity {
            Activity::Frame { index } => Some(index),
            _ => None,
        }
    }

    /// Whether the renderer should ignore the symbol value.
    pub fn is_flat(&self) -> bool {
        self.activity == Activity::Steady
    }
}

/// Window layout of a pattern, in microseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Full period of the pattern.
    pub period: u32,
    /// Part of the period where the cycle below applies; dark elsewhere.
    pub lit: Range<u32>,
    /// Offset into the period at which the first cycle starts.
    pub phase: u32,
    /// Length of the repeating cycle holding the windows.
    pub cycle: u32,
    /// Calibration burst, relative to the cycle start.
    pub calibration: Range<u32>,
    /// Frame burst, relative to the cycle start.
    pub frame: Range<u32>,
    /// Steady glow, relative to the cycle start.
    pub steady: Range<u32>,
}

impl Layout {
    /// Checks that the windows are ordered, disjoint and fit their bounds, and
    /// that the frame window never indexes past the end of a frame.
    ///
    /// # Errors
    /// - [`Error::WindowOverlap`] if a window starts before the previous ends
    /// - [`Error::WindowOverflow`] if a window leaves its cycle, or the lit
    ///   range leaves the period
    /// - [`Error::FrameWindowTooLong`] if the frame window spans more than
    ///   [`FRAME_LEN`] slots
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            self.calibration.start,
            self.calibration.end,
            self.frame.start,
            self.frame.end,
            self.steady.start,
            self.steady.end,
        ];
        if bounds.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::WindowOverlap);
        }
        check_within(self.steady.end, self.cycle)?;
        check_within(self.cycle, self.lit.end.saturating_sub(self.lit.start))?;
        check_within(self.lit.start, self.lit.end)?;
        check_within(self.lit.end, self.period)?;

        let slots = (self.frame.end - self.frame.start).div_ceil(SLOT_MICROS);
        if slots as usize > FRAME_LEN {
            return Err(Error::FrameWindowTooLong {
                slots,
                max: FRAME_LEN,
            });
        }
        Ok(())
    }
}

fn check_within(end: u32, limit: u32) -> Result<()> {
    if end > limit {
        Err(Error::WindowOverflow { end, limit })
    } else {
        Ok(())
    }
}

/// The visual style of signaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Pattern {
    /// Frames back to back at full brightness.
    #[default]
    Constant,
    /// 1 s period: calibration and frame bursts, a steady glow until half a
    /// second, then dark.
    FastBlink,
    /// 2 s period with a 50% duty envelope; the bursts repeat inside the lit half.
    SlowBlink,
    /// 2 s triangular brightness ramp with offset bursts.
    Breathing,
}

const SECOND: u32 = MICROS_PER_SEC;
const BURST_END: u32 = CALIB_WINDOW_MICROS + FRAME_WINDOW_MICROS;

const fn burst_layout(
    period: u32,
    lit: Range<u32>,
    phase: u32,
    cycle: u32,
    steady_end: u32,
) -> Layout {
    Layout {
        period,
        lit,
        phase,
        cycle,
        calibration: 0..CALIB_WINDOW_MICROS,
        frame: CALIB_WINDOW_MICROS..BURST_END,
        steady: BURST_END..steady_end,
    }
}

impl Pattern {
    /// Every pattern, in rotation order.
    pub const ALL: [Pattern; 4] = [
        Pattern::Constant,
        Pattern::FastBlink,
        Pattern::SlowBlink,
        Pattern::Breathing,
    ];

    /// Looks a pattern up by its position in [`Pattern::ALL`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this pattern in [`Pattern::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Pattern::Constant => 0,
            Pattern::FastBlink => 1,
            Pattern::SlowBlink => 2,
            Pattern::Breathing => 3,
        }
    }

    /// Short human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Constant => "constant",
            Pattern::FastBlink => "fast-blink",
            Pattern::SlowBlink => "slow-blink",
            Pattern::Breathing => "breathing",
        }
    }

    /// Length of one period, in microseconds.
    pub const fn period(self) -> u32 {
        match self {
            Pattern::Constant => FRAME_WINDOW_MICROS,
            Pattern::FastBlink => SECOND,
            Pattern::SlowBlink | Pattern::Breathing => 2 * SECOND,
        }
    }

    /// The window layout of this pattern.
    pub const fn layout(self) -> Layout {
        match self {
            Pattern::Constant => Layout {
                period: FRAME_WINDOW_MICROS,
                lit: 0..FRAME_WINDOW_MICROS,
                phase: 0,
                cycle: FRAME_WINDOW_MICROS,
                calibration: 0..0,
                frame: 0..FRAME_WINDOW_MICROS,
                steady: FRAME_WINDOW_MICROS..FRAME_WINDOW_MICROS,
            },
            Pattern::FastBlink => burst_layout(SECOND, 0..SECOND, 0, SECOND, SECOND / 2),
            Pattern::SlowBlink => burst_layout(2 * SECOND, 0..SECOND, 0, SECOND / 2, SECOND / 2),
            Pattern::Breathing => {
                burst_layout(2 * SECOND, 0..2 * SECOND, SECOND / 2, SECOND, SECOND)
            }
        }
    }

    /// Validates this pattern's layout. See [`Layout::validate`].
    pub fn validate(self) -> Result<()> {
        self.layout().validate()
    }

    /// Samples the pattern `elapsed_micros` after the player was enabled.
    pub fn tick(self, elapsed_micros: u32) -> RenderInstruction {
        let layout = self.layout();
        let t = elapsed_micros % layout.period;
        if !layout.lit.contains(&t) {
            return RenderInstruction::DARK;
        }

        let brightness = self.brightness_at(t);
        let offset = (t + layout.period - layout.phase) % layout.cycle;
        if layout.calibration.contains(&offset) {
            let index = (offset - layout.calibration.start) / SLOT_MICROS;
            RenderInstruction::calibration(brightness, index as usize)
        } else if layout.frame.contains(&offset) {
            let index = (offset - layout.frame.start) / SLOT_MICROS;
            RenderInstruction::frame(brightness, index as usize)
        } else if layout.steady.contains(&offset) {
            RenderInstruction::steady(brightness)
        } else {
            RenderInstruction::DARK
        }
    }

    fn brightness_at(self, t: u32) -> u8 {
        match self {
            Pattern::Breathing => {
                let period = self.period();
                let half = period / 2;
                let full = u32::from(FULL_BRIGHTNESS);
                let level = if t < half {
                    full * t / half / 2
                } else {
                    full * (period - t) / half / 2
                };
                level as u8
            }
            _ => FULL_BRIGHTNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOT: u32 = SLOT_MICROS;

    fn sweep(pattern: Pattern) -> impl Iterator<Item = u32> {
        (0..pattern.period()).step_by(997)
    }

    #[test]
    fn test_timing_constants() {
        assert_eq!(SLOT, 8333);
        assert_eq!(CALIB_WINDOW_MICROS, 83_330);
        assert_eq!(FRAME_WINDOW_MICROS, 383_318);
    }

    #[test]
    fn test_every_layout_is_valid() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.validate(), Ok(()), "{}", pattern.name());
            assert_eq!(pattern.layout().period, pattern.period());
        }
    }

    #[test]
    fn test_overlapping_windows_are_rejected() {
        let mut layout = Pattern::FastBlink.layout();
        layout.frame.start = CALIB_WINDOW_MICROS - 1;
        assert_eq!(layout.validate(), Err(Error::WindowOverlap));
    }

    #[test]
    fn test_window_past_cycle_is_rejected() {
        let mut layout = Pattern::SlowBlink.layout();
        layout.steady.end = layout.cycle + 1;
        assert_eq!(
            layout.validate(),
            Err(Error::WindowOverflow {
                end: 500_001,
                limit: 500_000
            })
        );
    }

    #[test]
    fn test_long_frame_window_is_rejected() {
        let mut layout = Pattern::Constant.layout();
        layout.frame.end += 1;
        layout.steady = layout.frame.end..layout.frame.end;
        layout.cycle = layout.frame.end;
        layout.lit.end = layout.frame.end;
        layout.period = layout.frame.end;
        assert_eq!(
            layout.validate(),
            Err(Error::FrameWindowTooLong { slots: 47, max: 46 })
        );
    }

    #[test]
    fn test_pattern_index_round_trip() {
        for (i, pattern) in Pattern::ALL.iter().enumerate() {
            assert_eq!(pattern.index(), i);
            assert_eq!(Pattern::from_index(i), Some(*pattern));
        }
        assert_eq!(Pattern::from_index(4), None);
    }

    #[test]
    fn test_constant_pattern() {
        let p = Pattern::Constant;
        assert_eq!(p.tick(0), RenderInstruction::frame(255, 0));
        assert_eq!(p.tick(SLOT), RenderInstruction::frame(255, 1));
        assert_eq!(p.tick(FRAME_WINDOW_MICROS - 1), RenderInstruction::frame(255, 45));
        assert_eq!(p.tick(FRAME_WINDOW_MICROS), RenderInstruction::frame(255, 0));
    }

    #[test]
    fn test_fast_blink_scenario() {
        let p = Pattern::FastBlink;
        assert_eq!(p.tick(0), RenderInstruction::calibration(255, 0));
        assert_eq!(p.tick(SLOT * 3 + 10), RenderInstruction::calibration(255, 3));
        assert_eq!(p.tick(90_000), RenderInstruction::frame(255, 0));
        assert_eq!(p.tick(BURST_END - 1), RenderInstruction::frame(255, 45));
        assert_eq!(p.tick(BURST_END), RenderInstruction::steady(255));
        assert_eq!(p.tick(499_999), RenderInstruction::steady(255));
        assert_eq!(p.tick(500_000), RenderInstruction::DARK);
        assert_eq!(p.tick(950_000), RenderInstruction::DARK);
    }

    #[test]
    fn test_slow_blink_envelope() {
        let p = Pattern::SlowBlink;
        assert_eq!(p.tick(0), RenderInstruction::calibration(255, 0));
        assert_eq!(p.tick(90_000), RenderInstruction::frame(255, 0));
        assert_eq!(p.tick(BURST_END), RenderInstruction::steady(255));
        // the burst repeats in the second quarter of the lit half
        assert_eq!(p.tick(500_000), RenderInstruction::calibration(255, 0));
        assert_eq!(p.tick(590_000), RenderInstruction::frame(255, 0));
        assert_eq!(p.tick(999_999), RenderInstruction::steady(255));
        assert_eq!(p.tick(1_000_000), RenderInstruction::DARK);
        assert_eq!(p.tick(1_999_999), RenderInstruction::DARK);
    }

    #[test]
    fn test_breathing_ramp_and_bursts() {
        let p = Pattern::Breathing;
        assert_eq!(p.tick(0), RenderInstruction::steady(0));
        assert_eq!(p.tick(500_000), RenderInstruction::calibration(63, 0));
        assert_eq!(p.tick(1_000_000).brightness, 127);
        assert_eq!(p.tick(500_000 + 90_000), RenderInstruction::frame(75, 0));
        assert_eq!(p.tick(1_500_000), RenderInstruction::calibration(63, 0));
        assert!(p.tick(1_000_000).is_flat());
    }

    #[test]
    fn test_breathing_brightness_symmetry() {
        let p = Pattern::Breathing;
        let period = p.period();
        for t in (1..period / 2).step_by(1013) {
            assert_eq!(p.tick(t).brightness, p.tick(period - t).brightness, "t = {t}");
        }
    }

    #[test]
    fn test_periodicity() {
        for pattern in Pattern::ALL {
            let period = pattern.period();
            for t in sweep(pattern) {
                let expected = pattern.tick(t);
                assert_eq!(pattern.tick(t + period), expected, "{} t = {t}", pattern.name());
                assert_eq!(pattern.tick(t + 7 * period), expected, "{} t = {t}", pattern.name());
            }
        }
    }

    #[test]
    fn test_frame_index_stays_in_range() {
        for pattern in Pattern::ALL {
            for t in (0..pattern.period()).step_by(101) {
                if let Some(index) = pattern.tick(t).frame_index() {
                    assert!(index < FRAME_LEN, "{} t = {t}", pattern.name());
                }
                if let Some(index) = pattern.tick(t).calibration_index() {
                    assert!(index < 10, "{} t = {t}", pattern.name());
                }
            }
        }
    }

    #[test]
    fn test_windows_are_disjoint_and_fit_the_period() {
        for pattern in Pattern::ALL {
            let l = pattern.layout();
            let windows = [&l.calibration, &l.frame, &l.steady];
            for (i, a) in windows.iter().enumerate() {
                for b in &windows[i + 1..] {
                    assert!(a.end <= b.start || a.is_empty() || b.is_empty());
                }
            }
            let covered: u32 = windows.iter().map(|w| w.end - w.start).sum();
            assert!(covered <= l.cycle);
            assert!(l.cycle <= l.period);
        }
    }
}
