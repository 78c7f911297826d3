use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermError {
    #[error("Compositor error: {0}")]
    Compose(#[from] strata_core::Error),

    #[error("Terminal error: {0}")]
    Tty(#[from] strata_tty::TtyError),

    #[error("Input error: {0}")]
    Input(#[from] strata_input::InputError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
