//! Output stage: contrast blending and PWM channel writes.
//!
//! The player resolves every [`RenderInstruction`](crate::pattern::RenderInstruction)
//! into an [`Output`]: a symbol value, a brightness, and whether the value should
//! be ignored. This module turns that triple into a duty cycle and writes it to
//! every active channel of a [`PwmBank`].
//!
//! ## Contrast
//!
//! A symbol is never rendered as a hard on/off. With divider `d` and brightness
//! `b`, a `1` is shown at full `b`, a `0` at `(d - 1) * b / d`, and a flat
//! (unmodulated) slot halfway between:
//!
//! ```text
//! level = (d - 1) * b / d + b * v / d        value-driven, v ∈ {0, 1}
//! level = (d - 1) * b / d + b / 2 / d        flat
//! ```
//!
//! The same divider applies in both modes.

use embedded_hal::pwm::SetDutyCycle;

use crate::consts::{DEFAULT_CONTRAST_DIVIDER, MAX_CHANNELS};
use crate::error::{Error, Result};

/// What the renderer should show for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Output {
    /// The symbol on air, 0 or 1. Meaningless when `flatten` is set.
    pub value: u8,
    /// Brightness on a 0–255 scale.
    pub brightness: u8,
    /// Show brightness only, without modulating by `value`.
    pub flatten: bool,
}

impl Output {
    /// The same output with value modulation disabled.
    pub fn flattened(self) -> Self {
        Self {
            value: 0,
            flatten: true,
            ..self
        }
    }
}

/// Dual-level blend between the "off" and "on" brightness of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Contrast {
    divider: u8,
}

impl Contrast {
    /// A blend with `divider` levels; `0` is treated as `1` (hard on/off).
    pub const fn new(divider: u8) -> Self {
        Self {
            divider: if divider == 0 { 1 } else { divider },
        }
    }

    /// The divider in use.
    pub const fn divider(&self) -> u8 {
        self.divider
    }

    /// Blends `output` into a single 0–255 level.
    pub fn level(&self, output: &Output) -> u8 {
        let b = u32::from(output.brightness);
        let d = u32::from(self.divider);
        let base = (d - 1) * b / d;
        let modulated = if output.flatten {
            b / 2 / d
        } else {
            b * u32::from(output.value & 1) / d
        };
        (base + modulated) as u8
    }
}

impl Default for Contrast {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAST_DIVIDER)
    }
}

/// A set of output channels, one bit per channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ChannelSet(u32);

impl ChannelSet {
    /// No channels.
    pub const EMPTY: Self = Self(0);

    /// Builds a set from a raw bitmask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Channels `0..count`.
    pub const fn all(count: usize) -> Self {
        if count >= MAX_CHANNELS {
            Self(u32::MAX)
        } else {
            Self((1u32 << count) - 1)
        }
    }

    /// Only channel `index`.
    pub const fn single(index: usize) -> Self {
        Self::EMPTY.with(index)
    }

    /// This set plus channel `index`. Indices past [`MAX_CHANNELS`] are ignored.
    pub const fn with(self, index: usize) -> Self {
        if index < MAX_CHANNELS {
            Self(self.0 | (1 << index))
        } else {
            self
        }
    }

    /// Whether channel `index` is in the set.
    pub const fn contains(&self, index: usize) -> bool {
        index < MAX_CHANNELS && self.0 & (1 << index) != 0
    }

    /// The raw bitmask.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Whether the set holds no channels.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Checks that every channel in the set is below `count`.
    ///
    /// # Errors
    /// [`Error::ChannelOutOfRange`] naming the lowest offending index.
    pub fn check(&self, count: usize) -> Result<()> {
        let outside = self.0 & !Self::all(count).0;
        if outside == 0 {
            Ok(())
        } else {
            Err(Error::ChannelOutOfRange {
                index: outside.trailing_zeros() as usize,
                count,
            })
        }
    }
}

/// A fixed bank of PWM channels driven identically.
///
/// Only channels in the active [`ChannelSet`] are written. Writes continue past
/// a failing channel; the first error is reported.
#[derive(Debug)]
pub struct PwmBank<P, const N: usize>
where
    P: SetDutyCycle,
{
    channels: [P; N],
    active: ChannelSet,
    contrast: Contrast,
}

impl<P, const N: usize> PwmBank<P, N>
where
    P: SetDutyCycle,
{
    /// Wraps `channels`, all of them active, with the default [`Contrast`].
    ///
    /// # Errors
    /// [`Error::ChannelCount`] if `N` exceeds [`MAX_CHANNELS`].
    pub fn new(channels: [P; N]) -> Result<Self> {
        if N > MAX_CHANNELS {
            return Err(Error::ChannelCount {
                max: MAX_CHANNELS,
                actual: N,
            });
        }
        Ok(Self {
            channels,
            active: ChannelSet::all(N),
            contrast: Contrast::default(),
        })
    }

    /// The active channel set.
    pub fn active(&self) -> ChannelSet {
        self.active
    }

    /// Replaces the active channel set without touching any output.
    ///
    /// # Errors
    /// [`Error::ChannelOutOfRange`] if `set` names a channel past `N`.
    pub fn select(&mut self, set: ChannelSet) -> Result<()> {
        set.check(N)?;
        self.active = set;
        Ok(())
    }

    /// The blend in use.
    pub fn contrast(&self) -> Contrast {
        self.contrast
    }

    /// Replaces the blend.
    pub fn set_contrast(&mut self, contrast: Contrast) {
        self.contrast = contrast;
    }

    /// Blends `output` and writes it to every active channel.
    pub fn render(&mut self, output: &Output) -> core::result::Result<(), P::Error> {
        let level = self.contrast.level(output);
        self.write_active(|pwm| {
            pwm.set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
        })
    }

    /// Turns every active channel fully off.
    pub fn clear(&mut self) -> core::result::Result<(), P::Error> {
        self.write_active(|pwm| pwm.set_duty_cycle_fully_off())
    }

    fn write_active<F>(&mut self, mut write: F) -> core::result::Result<(), P::Error>
    where
        F: FnMut(&mut P) -> core::result::Result<(), P::Error>,
    {
        let mut first_err = None;
        for (i, pwm) in self.channels.iter_mut().enumerate() {
            if !self.active.contains(i) {
                continue;
            }
            if let Err(e) = write(pwm) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// The wrapped channels.
    pub fn channels(&self) -> &[P; N] {
        &self.channels
    }

    /// Mutable access to the wrapped channels.
    pub fn channels_mut(&mut self) -> &mut [P; N] {
        &mut self.channels
    }

    /// Gives the channels back.
    pub fn release(self) -> [P; N] {
        self.channels
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakePwm;
    use super::*;
    use embedded_hal_mock::eh1::pwm::{Mock as PwmMock, Transaction as PwmTransaction};

    fn value(value: u8, brightness: u8) -> Output {
        Output {
            value,
            brightness,
            flatten: false,
        }
    }

    #[test]
    fn test_default_contrast_levels() {
        let c = Contrast::default();
        assert_eq!(c.divider(), 3);
        assert_eq!(c.level(&value(1, 255)), 255);
        assert_eq!(c.level(&value(0, 255)), 170);
        assert_eq!(c.level(&value(0, 255).flattened()), 212);
        assert_eq!(c.level(&value(1, 0)), 0);
    }

    #[test]
    fn test_flat_level_sits_between_symbol_levels() {
        let c = Contrast::default();
        for b in 0..=255u8 {
            let on = c.level(&value(1, b));
            let off = c.level(&value(0, b));
            let flat = c.level(&value(1, b).flattened());
            assert!(off <= flat && flat <= on, "b = {b}");
        }
    }

    #[test]
    fn test_zero_divider_is_hard_switch() {
        let c = Contrast::new(0);
        assert_eq!(c.level(&value(1, 200)), 200);
        assert_eq!(c.level(&value(0, 200)), 0);
    }

    #[test]
    fn test_channel_set() {
        let set = ChannelSet::single(0).with(2);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(set.contains(2));
        assert_eq!(set.bits(), 0b101);
        assert_eq!(ChannelSet::all(3).bits(), 0b111);
        assert_eq!(ChannelSet::all(32).bits(), u32::MAX);
        assert!(ChannelSet::EMPTY.is_empty());
        assert_eq!(set.check(3), Ok(()));
        assert_eq!(
            set.check(2),
            Err(Error::ChannelOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_bank_writes_only_active_channels() {
        let mut bank = PwmBank::new([FakePwm::default(), FakePwm::default(), FakePwm::default()])
            .unwrap();
        bank.select(ChannelSet::single(1)).unwrap();
        bank.render(&value(1, 255)).unwrap();
        let [a, b, c] = bank.release();
        assert_eq!((a.writes, b.writes, c.writes), (0, 1, 0));
        assert_eq!(b.duty, 255);
    }

    #[test]
    fn test_bank_rejects_foreign_channel() {
        let mut bank = PwmBank::new([FakePwm::default(), FakePwm::default()]).unwrap();
        assert!(bank.select(ChannelSet::single(2)).is_err());
        assert_eq!(bank.active(), ChannelSet::all(2));
    }

    #[test]
    fn test_bank_keeps_writing_after_a_failure() {
        let failing = FakePwm {
            fail: true,
            ..FakePwm::default()
        };
        let mut bank = PwmBank::new([failing, FakePwm::default()]).unwrap();
        assert!(bank.render(&value(1, 255)).is_err());
        assert_eq!(bank.channels()[1].duty, 255);
    }

    #[test]
    fn test_bank_scales_to_max_duty() {
        let pwm = PwmMock::new(&[
            PwmTransaction::max_duty_cycle(1000),
            PwmTransaction::set_duty_cycle(666),
            PwmTransaction::set_duty_cycle(0),
        ]);
        let mut bank = PwmBank::new([pwm]).unwrap();
        // 170 / 255 of 1000
        bank.render(&value(0, 255)).unwrap();
        bank.clear().unwrap();
        let [mut pwm] = bank.release();
        pwm.done();
    }
}
