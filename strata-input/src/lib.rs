//! Strata input decoding
//!
//! Turns a raw terminal byte stream into logical key codes:
//! - [`Key`]: printable characters, named special keys, and arithmetic
//!   modifier offsets
//! - [`Keymap`]: per-terminal-family table mapping CSI terminators to
//!   keys (one family shipped: xterm)
//! - [`Decoder`]: the escape-sequence state machine, pulling bytes
//!   from any [`ByteSource`]
//!
//! The crate is I/O-free: the blocking byte source lives in
//! `strata-tty`, and tests drive the decoder with scripted sources.

pub mod decoder;
pub mod error;
pub mod key;
pub mod keymap;

pub use decoder::{ByteSource, Decoder};
pub use error::InputError;
pub use key::Key;
pub use keymap::Keymap;
