//! Error types for terminal plumbing.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtyError {
    #[error("Failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to query window size: {0}")]
    WindowSize(#[source] io::Error),

    #[error("Failed to block SIGWINCH: {0}")]
    BlockSignal(#[source] nix::Error),

    #[error("Failed to create signal fd: {0}")]
    SignalFd(#[source] nix::Error),

    #[error("Failed to read signal fd: {0}")]
    SignalRead(#[source] nix::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
