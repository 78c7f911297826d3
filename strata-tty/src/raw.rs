//! Raw-mode stdin.
//!
//! [`RawTty`] is a scoped resource: constructing it saves the current
//! termios settings and disables local echo and line buffering;
//! dropping it restores the saved settings unconditionally. While the
//! handle lives it serves as the decoder's [`ByteSource`], reading
//! single bytes from stdin with poll(2) timeouts.

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::time::Duration;

use log::{debug, warn};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use nix::unistd::read;

use strata_input::ByteSource;

use crate::error::TtyError;

/// Scoped raw mode on stdin.
pub struct RawTty {
    saved: Termios,
}

impl RawTty {
    /// Switch stdin to raw mode (no echo, no line buffering).
    pub fn new() -> Result<Self, TtyError> {
        let stdin = io::stdin();
        let saved = termios::tcgetattr(stdin.as_fd()).map_err(TtyError::GetAttr)?;

        let mut raw = saved.clone();
        raw.local_flags &= !(LocalFlags::ECHO | LocalFlags::ICANON);
        termios::tcsetattr(stdin.as_fd(), SetArg::TCSAFLUSH, &raw).map_err(TtyError::SetAttr)?;

        debug!("stdin switched to raw mode");
        Ok(RawTty { saved })
    }

    /// Block until stdin is readable or the timeout expires.
    ///
    /// `None` blocks indefinitely. EINTR reports as "nothing yet" so
    /// a signal during the wait behaves like a timeout.
    fn poll_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let timeout_ms: libc::c_int = match timeout {
            None => -1,
            Some(d) => d.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
        };

        let stdin = io::stdin();
        let fd: BorrowedFd<'_> = stdin.as_fd();
        let mut fds = [PollFd::new(&fd, PollFlags::POLLIN)];

        match poll(&mut fds, timeout_ms) {
            Ok(n) if n > 0 => {
                let revents = fds[0].revents().unwrap_or(PollFlags::empty());
                Ok(revents.contains(PollFlags::POLLIN))
            }
            Ok(_) => Ok(false),
            Err(nix::errno::Errno::EINTR) => Ok(false),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

impl ByteSource for RawTty {
    fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>> {
        if !self.poll_readable(timeout)? {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        match read(io::stdin().as_raw_fd(), &mut buf) {
            // Readable but zero bytes: the stream is closed.
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )),
            Ok(_) => Ok(Some(buf[0])),
            Err(nix::errno::Errno::EINTR) => Ok(None),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

impl Drop for RawTty {
    fn drop(&mut self) {
        let stdin = io::stdin();
        if let Err(e) = termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &self.saved) {
            warn!("failed to restore terminal attributes: {e}");
        } else {
            debug!("stdin restored from raw mode");
        }
    }
}
