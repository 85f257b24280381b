//! # infoled
//!
//! A portable, no_std Rust encoder that sends a short binary payload over an LED,
//! as a blink timeline a camera or photodiode can decode.
//!
//! This crate implements an optical signaling channel using:
//! - a fixed 46-symbol frame: preamble, XOR checksum and a self-clocking
//!   two-symbol-per-bit payload expansion
//! - four periodic patterns that map elapsed time to a render instruction
//! - `embedded-hal` PWM traits for the LED outputs
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for tick timing |
//! | `timer-isr` (default) | Uses `critical_section::with` to share the player with an ISR |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Frame encoder and decoder** with preamble search and checksum validation
//! - Patterns: `Constant`, `FastBlink`, `SlowBlink` and `Breathing`, each a pure
//!   function of elapsed time
//! - Dual-level contrast so a `0` symbol stays visibly lit
//! - Channel selection and a rotation scheduler for multi-LED boards
//!
//! ## Usage
//!
//! ```rust,ignore
//! use infoled::player::InfoLed;
//!
//! let mut led = InfoLed::with_defaults([red, green, blue], micros())?;
//! loop {
//!     led.tick(micros()); // Call at least twice per 8.3 ms slot
//! }
//! ```
//!
//! Or, use `run_tick_loop()` with a `DelayNs` implementation:
//!
//! ```rust,ignore
//! infoled::timer::run_tick_loop(&mut led, &mut micros, &mut delay, 1000);
//! ```
//!
//! ## Integration Notes
//!
//! - Symbols are sent at 120 per second (~8333 µs per slot)
//! - The microsecond counter must be monotonic; wrapping is handled
//! - Only one player instance should be active at a time in interrupt-driven mode
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod checksum;
pub mod consts;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod pattern;
pub mod player;
pub mod receiver;
pub mod render;
pub mod schedule;
pub mod timer;

pub use error::{Error, Result};
pub use frame::{Frame, Payload};
pub use pattern::{Pattern, RenderInstruction};
pub use player::InfoLed;
pub use render::Output;
