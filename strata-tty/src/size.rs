//! Terminal geometry and resize notification.

use std::io;
use std::mem::MaybeUninit;

use log::debug;
use nix::sys::signal::{SigSet, Signal};
use nix::sys::signalfd::SignalFd;

use crate::error::TtyError;

/// Query the controlling terminal's size as `(cols, rows)`.
pub fn window_size() -> Result<(u16, u16), TtyError> {
    let mut ws = MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ writes a winsize into the pointed-to buffer
    // and nothing else.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, ws.as_mut_ptr()) };
    if rc != 0 {
        return Err(TtyError::WindowSize(io::Error::last_os_error()));
    }
    let ws = unsafe { ws.assume_init() };
    Ok((ws.ws_col, ws.ws_row))
}

/// Blocks SIGWINCH for the calling thread and surfaces resizes as
/// synchronous reads on a signalfd.
pub struct WinchWatcher {
    fd: SignalFd,
}

impl WinchWatcher {
    pub fn new() -> Result<Self, TtyError> {
        let mut mask = SigSet::empty();
        mask.add(Signal::SIGWINCH);
        mask.thread_block().map_err(TtyError::BlockSignal)?;
        let fd = SignalFd::new(&mask).map_err(TtyError::SignalFd)?;
        Ok(WinchWatcher { fd })
    }

    /// Wait for the next SIGWINCH, then report the new size.
    pub fn wait(&mut self) -> Result<(u16, u16), TtyError> {
        loop {
            match self.fd.read_signal() {
                Ok(Some(_)) => break,
                Ok(None) => continue,
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(TtyError::SignalRead(e)),
            }
        }
        let size = window_size()?;
        debug!("terminal resized to {}x{}", size.0, size.1);
        Ok(size)
    }
}
