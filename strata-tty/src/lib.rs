//! Strata terminal plumbing for Unix.
//!
//! Everything here is a thin wrapper over termios, poll(2), ioctl and
//! signalfd:
//! - [`RawTty`]: scoped raw mode on stdin plus a polled [`ByteSource`]
//!   implementation for the decoder
//! - [`window_size`]: current terminal dimensions
//! - [`WinchWatcher`]: blocking wait for SIGWINCH size changes
//!
//! [`ByteSource`]: strata_input::ByteSource

pub mod error;
pub mod raw;
pub mod size;

pub use error::TtyError;
pub use raw::RawTty;
pub use size::{window_size, WinchWatcher};
