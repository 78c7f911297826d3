//! Escape-sequence decoder.
//!
//! The decoder reads one keypress at a time from a [`ByteSource`] and
//! resolves multi-byte escape sequences into [`Key`] codes. The tricky
//! part is the ambiguous prefix: a lone Escape keypress and the start
//! of a CSI sequence both begin with the ESC byte. After seeing ESC
//! the decoder polls the source with a short timeout — if no byte
//! follows, the user pressed Escape; if `[` or `O` follows, a sequence
//! is in flight; anything else is an Alt-modified key (terminals send
//! Alt+x as ESC x).
//!
//! Sequence parameters (`CSI 5 ; 3 ~`) accumulate digit by digit; `;`
//! commits the current parameter, and the first non-digit,
//! non-separator byte terminates the sequence and is resolved through
//! the [`Keymap`]. Parse state lives only for the duration of one
//! decode call.

use std::io;
use std::time::Duration;

use log::{debug, trace};

use crate::error::InputError;
use crate::key::Key;
use crate::keymap::Keymap;

/// How long to wait for a byte after ESC before declaring it a lone
/// Escape keypress. Terminals deliver sequence bytes back to back, so
/// one millisecond is plenty.
const ESC_DISAMBIGUATE: Duration = Duration::from_millis(1);

/// A pull-based byte supplier.
///
/// `timeout` of `None` blocks until a byte arrives. `Ok(None)` means
/// the timeout expired with no byte; `Err` is a hard I/O failure.
pub trait ByteSource {
    fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>>;
}

/// Decodes raw bytes into logical keys.
#[derive(Debug)]
pub struct Decoder<S: ByteSource> {
    source: S,
    keymap: Keymap,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        Decoder {
            source,
            keymap: Keymap::default(),
        }
    }

    pub fn with_keymap(source: S, keymap: Keymap) -> Self {
        Decoder { source, keymap }
    }

    /// Wait for one keypress.
    ///
    /// Returns `Ok(None)` if `timeout` expires first; `None` blocks
    /// indefinitely. Unrecognized escape input yields
    /// [`Key::UNKNOWN`], never an error.
    pub fn wait_for_key(&mut self, timeout: Option<Duration>) -> Result<Option<Key>, InputError> {
        let byte = match self.source.read_byte(timeout)? {
            Some(b) => b,
            None => return Ok(None),
        };

        if byte != 0x1b {
            return Ok(Some(Key::from_byte(byte)));
        }

        // ESC seen: a quick poll tells a lone Escape keypress apart
        // from the head of a sequence.
        match self.source.read_byte(Some(ESC_DISAMBIGUATE))? {
            None => Ok(Some(Key::ESCAPE)),
            Some(b'[') | Some(b'O') => self.parse_sequence().map(Some),
            Some(b) => {
                trace!("alt-prefixed byte {:#04x}", b);
                Ok(Some(Key::from_byte(b).with_alt()))
            }
        }
    }

    /// Parse parameter bytes up to and including the terminator.
    ///
    /// Parse state is local to this call; every decode starts fresh.
    fn parse_sequence(&mut self) -> Result<Key, InputError> {
        let mut params: Vec<i32> = Vec::new();
        let mut pending: i32 = 0;

        loop {
            let byte = self.next_sequence_byte()?;
            match byte {
                b'0'..=b'9' => {
                    let digit = i32::from(byte - b'0');
                    pending = if pending != 0 { pending * 10 + digit } else { digit };
                }
                b';' => {
                    params.push(pending);
                    pending = 0;
                }
                terminator => {
                    if pending != 0 {
                        params.push(pending);
                    }
                    let key = self.keymap.resolve(terminator, &params);
                    if key == Key::UNKNOWN {
                        debug!(
                            "unrecognized sequence: terminator {:#04x} params {:?}",
                            terminator, params
                        );
                    }
                    return Ok(key);
                }
            }
        }
    }

    /// A sequence already started; block until its next byte arrives.
    ///
    /// Sequence bytes usually arrive back to back, but over a slow
    /// link they can straggle, and a valid sequence must still decode.
    /// Only a real I/O error aborts; a spurious empty read (EINTR in
    /// the source) retries.
    fn next_sequence_byte(&mut self) -> Result<u8, InputError> {
        loop {
            if let Some(b) = self.source.read_byte(None)? {
                return Ok(b);
            }
        }
    }
}
