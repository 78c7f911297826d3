//! Error type for the decoder.
//!
//! Only genuine I/O failures are errors. Timeouts are the `Ok(None)`
//! outcome of [`Decoder::wait_for_key`](crate::Decoder::wait_for_key),
//! and malformed escape input decodes to
//! [`Key::UNKNOWN`](crate::Key::UNKNOWN).

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O error reading input: {0}")]
    Io(#[from] io::Error),
}
