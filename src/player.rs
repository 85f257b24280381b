//! Frame player for one or more LED channels.
//!
//! This module provides the [`InfoLed`] struct, which binds a [`Frame`] to a
//! [`Pattern`] and drives a bank of PWM channels from it. The player has no
//! clock of its own: every call to [`tick()`](InfoLed::tick) is handed the
//! current value of a monotonic microsecond counter, and the pattern is sampled
//! at the time elapsed since the player was last enabled.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::pwm::{Mock as Pwm, Transaction};
//! use infoled::frame::{Frame, Payload};
//! use infoled::pattern::Pattern;
//! use infoled::player::InfoLed;
//!
//! # let pwm = Pwm::new(&[
//! #     Transaction::set_duty_cycle(0),
//! #     Transaction::max_duty_cycle(255),
//! #     Transaction::set_duty_cycle(170),
//! # ]);
//! let frame = Frame::encode(Payload::from_u16(0xbeef));
//! let mut led = InfoLed::new([pwm], Pattern::Constant, frame, 0).unwrap();
//!
//! // first preamble symbol is 0: shown at the "off" contrast level
//! let out = led.tick(0).unwrap();
//! assert_eq!(out.value, 0);
//! # let [mut pwm] = led.release();
//! # pwm.done();
//! ```
//!
//! ## Swapping
//!
//! [`set_pattern`](InfoLed::set_pattern), [`set_frame`](InfoLed::set_frame),
//! [`select_channels`](InfoLed::select_channels) and [`apply`](InfoLed::apply)
//! park every active channel at zero before swapping, so the renderer never
//! shows a stale pattern paired with a new frame or channel set. Swapping does
//! not move the epoch; call [`enable()`](InfoLed::enable) to restart the
//! timeline from the top.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::Result;
use crate::frame::Frame;
use crate::pattern::{Activity, Pattern, RenderInstruction};
use crate::render::{ChannelSet, Contrast, Output, PwmBank};
use crate::schedule::Selection;

/// Binds a frame and a pattern to a bank of PWM channels.
///
/// ## Type Parameters
///
/// - `P`: A type implementing [`embedded_hal::pwm::SetDutyCycle`], one per LED
/// - `N`: The number of channels, at most [`MAX_CHANNELS`](crate::consts::MAX_CHANNELS)
#[derive(Debug)]
pub struct InfoLed<P, const N: usize>
where
    P: SetDutyCycle,
{
    frame: Frame,
    pattern: Pattern,
    bank: PwmBank<P, N>,
    epoch: u32,
    enabled: bool,
    suppress_data: bool,
    failing: bool,

    /// Counter of failed channel writes.
    ///
    /// Write failures never stop the timeline; they are only counted here.
    pub write_errors: u16,
}

impl<P, const N: usize> InfoLed<P, N>
where
    P: SetDutyCycle,
{
    /// Creates an enabled player whose timeline starts at `now`.
    ///
    /// Every channel starts active and is driven to zero.
    ///
    /// # Errors
    /// - Any layout error from [`Pattern::validate`]
    /// - [`Error::ChannelCount`](crate::error::Error::ChannelCount) if `N` is too large
    pub fn new(channels: [P; N], pattern: Pattern, frame: Frame, now: u32) -> Result<Self> {
        pattern.validate()?;
        let mut led = Self {
            frame,
            pattern,
            bank: PwmBank::new(channels)?,
            epoch: now,
            enabled: true,
            suppress_data: false,
            failing: false,
            write_errors: 0,
        };
        led.clear();
        Ok(led)
    }

    /// Creates a player sending the default payload with [`Pattern::Constant`].
    ///
    /// # Errors
    /// See [`InfoLed::new`].
    pub fn with_defaults(channels: [P; N], now: u32) -> Result<Self> {
        Self::new(channels, Pattern::default(), Frame::default(), now)
    }

    /// Enables output and restarts the timeline at `now`.
    pub fn enable(&mut self, now: u32) {
        self.enabled = true;
        self.epoch = now;
        debug!("infoled enabled at {}", now);
    }

    /// Drives every active channel to zero and stops output until the next
    /// [`enable()`](InfoLed::enable).
    pub fn disable(&mut self) {
        self.clear();
        self.enabled = false;
        debug!("infoled disabled");
    }

    /// Whether [`tick()`](InfoLed::tick) currently drives the outputs.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drives every active channel to zero.
    pub fn clear(&mut self) {
        let written = self.bank.clear();
        self.record(written.is_ok());
    }

    /// The pattern in use.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Parks the outputs, then switches to `pattern`.
    ///
    /// # Errors
    /// Any layout error from [`Pattern::validate`]; the current pattern is kept.
    pub fn set_pattern(&mut self, pattern: Pattern) -> Result<()> {
        pattern.validate()?;
        self.clear();
        self.pattern = pattern;
        debug!("infoled pattern -> {}", pattern.name());
        Ok(())
    }

    /// The frame in use.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Parks the outputs, then switches to `frame`.
    pub fn set_frame(&mut self, frame: Frame) {
        self.clear();
        self.frame = frame;
        debug!("infoled payload -> {}", frame.payload().to_u16());
    }

    /// The active channel set.
    pub fn channels(&self) -> ChannelSet {
        self.bank.active()
    }

    /// Parks the current channels, then makes `set` active.
    ///
    /// # Errors
    /// [`Error::ChannelOutOfRange`](crate::error::Error::ChannelOutOfRange) if
    /// `set` names a channel this player does not own; nothing is changed.
    pub fn select_channels(&mut self, set: ChannelSet) -> Result<()> {
        set.check(N)?;
        self.clear();
        self.bank.select(set)?;
        debug!("infoled channels -> {}", set.bits());
        Ok(())
    }

    /// Applies a scheduler [`Selection`]: parks the outputs once, then swaps
    /// pattern and channel set together.
    ///
    /// # Errors
    /// As [`set_pattern`](InfoLed::set_pattern) and
    /// [`select_channels`](InfoLed::select_channels); nothing is changed.
    pub fn apply(&mut self, selection: Selection) -> Result<()> {
        selection.pattern.validate()?;
        selection.channels.check(N)?;
        self.clear();
        self.pattern = selection.pattern;
        self.bank.select(selection.channels)?;
        debug!(
            "infoled applied pattern {} on channels {}",
            selection.pattern.name(),
            selection.channels.bits()
        );
        Ok(())
    }

    /// When set, every instruction is rendered flat: brightness only, no data.
    pub fn set_suppress_data(&mut self, suppress: bool) {
        self.suppress_data = suppress;
    }

    /// Replaces the contrast blend used by the renderer.
    pub fn set_contrast(&mut self, contrast: Contrast) {
        self.bank.set_contrast(contrast);
    }

    /// Microseconds since the timeline started, wrapping with the counter.
    pub fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.epoch)
    }

    /// Samples the pattern at `now`.
    pub fn instruction(&self, now: u32) -> RenderInstruction {
        self.pattern.tick(self.elapsed(now))
    }

    /// Resolves an instruction against the bound frame.
    ///
    /// - calibration: value alternates with the slot index
    /// - frame: value is the symbol on air
    /// - otherwise: flat, value unused
    pub fn resolve(&self, instruction: RenderInstruction) -> Output {
        let brightness = instruction.brightness;
        match instruction.activity {
            Activity::Calibration { index } => Output {
                value: (index % 2) as u8,
                brightness,
                flatten: false,
            },
            Activity::Frame { index } => Output {
                value: self.frame.symbol_at(index),
                brightness,
                flatten: false,
            },
            Activity::Steady => Output {
                value: 0,
                brightness,
                flatten: true,
            },
        }
    }

    /// Samples the pattern at `now`, resolves it and writes it to the active
    /// channels.
    ///
    /// Returns `None` while disabled. A failed write is counted in
    /// [`write_errors`](InfoLed::write_errors) and does not change the result.
    pub fn tick(&mut self, now: u32) -> Option<Output> {
        if !self.enabled {
            return None;
        }
        let mut output = self.resolve(self.instruction(now));
        if self.suppress_data {
            output = output.flattened();
        }
        let written = self.bank.render(&output);
        self.record(written.is_ok());
        Some(output)
    }

    fn record(&mut self, ok: bool) {
        if ok {
            self.failing = false;
            return;
        }
        self.write_errors = self.write_errors.wrapping_add(1);
        if !self.failing {
            self.failing = true;
            warn!("infoled channel write failed ({} total)", self.write_errors);
        }
    }

    /// The channel bank.
    pub fn bank(&self) -> &PwmBank<P, N> {
        &self.bank
    }

    /// Gives the channels back.
    pub fn release(self) -> [P; N] {
        self.bank.release()
    }
}
