//! Error types for frame construction, decoding and player configuration.
//!
//! The timing path itself is infallible: every error here is raised while
//! building or reconfiguring something, never from [`Pattern::tick`] or
//! [`InfoLed::resolve`].
//!
//! [`Pattern::tick`]: crate::pattern::Pattern::tick
//! [`InfoLed::resolve`]: crate::player::InfoLed::resolve

use thiserror::Error;

/// Shorthand for results carrying the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while configuring or decoding a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The payload does not have exactly [`DATA_LEN`](crate::consts::DATA_LEN) bits.
    #[error("payload must be {expected} bits, got {actual}")]
    PayloadLength {
        /// Required number of bits.
        expected: usize,
        /// Number of bits supplied.
        actual: usize,
    },

    /// A payload element is neither 0 nor 1.
    #[error("payload bit {index} has value {value}, expected 0 or 1")]
    InvalidBit {
        /// Position of the offending element.
        index: usize,
        /// The offending value.
        value: u8,
    },

    /// A symbol sequence handed to the decoder has the wrong length.
    #[error("frame must be {expected} symbols, got {actual}")]
    FrameLength {
        /// Required number of symbols.
        expected: usize,
        /// Number of symbols supplied.
        actual: usize,
    },

    /// The symbol sequence does not begin with the preamble.
    #[error("frame does not start with the preamble")]
    PreambleMismatch,

    /// A symbol pair is not one of the two valid expansions.
    #[error("invalid symbol pair at symbol {index}")]
    InvalidSymbolPair {
        /// Index of the first symbol of the pair, within the full frame.
        index: usize,
    },

    /// The transmitted checksum disagrees with the recomputed one.
    #[error("checksum mismatch: frame carries {actual:?}, payload folds to {expected:?}")]
    ChecksumMismatch {
        /// Checksum recomputed from the decoded payload.
        expected: [u8; 2],
        /// Checksum carried by the frame.
        actual: [u8; 2],
    },

    /// Two windows of a pattern layout overlap or are out of order.
    #[error("pattern windows overlap")]
    WindowOverlap,

    /// A pattern window extends beyond its cycle, or the cycle beyond the period.
    #[error("pattern window ends at {end} µs, past its {limit} µs bound")]
    WindowOverflow {
        /// End of the offending window.
        end: u32,
        /// Bound it must not exceed.
        limit: u32,
    },

    /// The frame window is long enough to index past the last symbol.
    #[error("frame window spans {slots} slots, frame has only {max}")]
    FrameWindowTooLong {
        /// Slots covered by the frame window.
        slots: u32,
        /// Number of symbols in a frame.
        max: usize,
    },

    /// More output channels than a [`ChannelSet`](crate::render::ChannelSet) can address.
    #[error("at most {max} channels are supported, got {actual}")]
    ChannelCount {
        /// Maximum number of channels.
        max: usize,
        /// Number of channels supplied.
        actual: usize,
    },

    /// A channel set references a channel the player does not own.
    #[error("channel {index} out of range for {count} channels")]
    ChannelOutOfRange {
        /// The offending channel index.
        index: usize,
        /// Number of channels owned by the player.
        count: usize,
    },
}
