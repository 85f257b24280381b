//! Rotation through channel groups and patterns on a fixed interval.
//!
//! A [`Rotation`] owns the scheduling state a demo or test fixture needs to
//! cycle an [`InfoLed`](crate::player::InfoLed) through every combination of
//! channel group and [`Pattern`]: every `interval` the channel group advances,
//! and once all groups have been shown the pattern advances.
//!
//! ```text
//! iter    = now / interval
//! group   = iter % groups
//! pattern = iter / groups % 4
//! ```
//!
//! [`poll()`](Rotation::poll) is non-blocking in the `nb` sense: it returns
//! `WouldBlock` until the selection changes, then the new [`Selection`] once.
//! Hand that to [`InfoLed::apply`](crate::player::InfoLed::apply), which parks
//! the outputs before swapping.

use core::convert::Infallible;

use crate::consts::SWITCH_INTERVAL_MICROS;
use crate::pattern::Pattern;
use crate::render::ChannelSet;

/// One step of a [`Rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Selection {
    /// Index of the channel group.
    pub group: usize,
    /// Pattern to show.
    pub pattern: Pattern,
    /// Channels of the group.
    pub channels: ChannelSet,
}

/// Cycles through `G` channel groups and every [`Pattern`].
#[derive(Debug, Clone)]
pub struct Rotation<const G: usize> {
    groups: [ChannelSet; G],
    interval: u32,
    current: Option<(usize, Pattern)>,
}

impl<const G: usize> Rotation<G> {
    /// A rotation over `groups`, switching every
    /// [`SWITCH_INTERVAL_MICROS`].
    ///
    /// Fails to compile for `G == 0`.
    pub const fn new(groups: [ChannelSet; G]) -> Self {
        const { assert!(G > 0, "a rotation needs at least one channel group") };
        Self {
            groups,
            interval: SWITCH_INTERVAL_MICROS,
            current: None,
        }
    }

    /// Replaces the switch interval; `0` is treated as 1 µs.
    pub const fn with_interval(mut self, micros: u32) -> Self {
        self.interval = if micros == 0 { 1 } else { micros };
        self
    }

    /// The selection due at `now`, regardless of what was last returned.
    pub fn selection_at(&self, now: u32) -> Selection {
        let iter = (now / self.interval) as usize;
        let group = iter % G;
        let pattern = Pattern::ALL[iter / G % Pattern::ALL.len()];
        Selection {
            group,
            pattern,
            channels: self.groups[group],
        }
    }

    /// Returns the selection due at `now` if it differs from the previous one.
    ///
    /// The first poll always yields a selection.
    pub fn poll(&mut self, now: u32) -> nb::Result<Selection, Infallible> {
        let selection = self.selection_at(now);
        let key = (selection.group, selection.pattern);
        if self.current == Some(key) {
            return Err(nb::Error::WouldBlock);
        }
        self.current = Some(key);
        info!("{},{}", selection.group, selection.pattern.index());
        Ok(selection)
    }

    /// Forgets the last selection, so the next poll yields one.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
