//! Constants used across the optical framing protocol.
//!
//! This module defines the frame layout (preamble, checksum and payload sizes),
//! the symbol timing shared by every [`Pattern`](crate::pattern::Pattern), and
//! the defaults used by the player and the rotation scheduler.
//!
//! ## Key Concepts
//!
//! - **Preamble**: raw, unexpanded symbols that mark the start of a frame.
//! - **Checksum**: two XOR-folded bits, expanded like the payload.
//! - **Slot**: the on-air duration of one symbol, `1 s / SYMBOL_RATE_HZ`.
//! - **Windows**: the calibration and frame bursts measured in slots.
//!
//! The invariants tying these together are checked at compile time, so editing
//! one constant without the others fails the build instead of producing a frame
//! index past the end of the symbol table.

/// Number of payload bits carried by one frame.
pub const DATA_LEN: usize = 16;

/// Number of checksum bits carried by one frame.
pub const HASH_LEN: usize = 2;

/// Number of raw preamble symbols at the start of a frame.
pub const HEADER_LEN: usize = 10;

/// Number of alternating symbols emitted during a calibration burst.
pub const CALIB_LEN: usize = 10;

/// Every checksum and payload bit is sent as a pair of symbols.
pub const SYMBOLS_PER_BIT: usize = 2;

/// Total number of symbols in an encoded frame.
///
/// `HEADER_LEN + (HASH_LEN + DATA_LEN) * 2 == 46`
pub const FRAME_LEN: usize = HEADER_LEN + (HASH_LEN + DATA_LEN) * SYMBOLS_PER_BIT;

/// Fixed synchronization marker, sent unexpanded.
pub const PREAMBLE: [u8; HEADER_LEN] = [0, 1, 1, 0, 1, 1, 0, 0, 1, 0];

/// Payload used when none is supplied.
pub const DEFAULT_PAYLOAD: [u8; DATA_LEN] = [0, 1, 1, 0, 1, 0, 0, 1, 0, 1, 0, 1, 0, 0, 1, 1];

/// One second, in microseconds.
pub const MICROS_PER_SEC: u32 = 1_000_000;

/// Symbols per second.
pub const SYMBOL_RATE_HZ: u32 = 120;

/// On-air duration of a single symbol (≈8333 µs).
pub const SLOT_MICROS: u32 = MICROS_PER_SEC / SYMBOL_RATE_HZ;

/// Duration of a full frame burst.
pub const FRAME_WINDOW_MICROS: u32 = SLOT_MICROS * FRAME_LEN as u32;

/// Duration of a calibration burst.
pub const CALIB_WINDOW_MICROS: u32 = SLOT_MICROS * CALIB_LEN as u32;

/// Interval between selection changes of the [`Rotation`](crate::schedule::Rotation) scheduler.
pub const SWITCH_INTERVAL_MICROS: u32 = 5_000_000;

/// Default contrast divider: one third baseline, two thirds modulated.
pub const DEFAULT_CONTRAST_DIVIDER: u8 = 3;

/// Largest number of output channels a single player can drive.
///
/// Bounded by the width of [`ChannelSet`](crate::render::ChannelSet).
pub const MAX_CHANNELS: usize = 32;

/// Brightness used by every pattern while fully on.
pub const FULL_BRIGHTNESS: u8 = u8::MAX;

const _: () = assert!(FRAME_LEN == 46);
const _: () = assert!(DATA_LEN % 2 == 0, "checksum folds the payload pairwise");
const _: () = assert!(HASH_LEN == 2);
const _: () = assert!(CALIB_WINDOW_MICROS + FRAME_WINDOW_MICROS <= MICROS_PER_SEC / 2);
