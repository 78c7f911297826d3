//! Terminator keymaps.
//!
//! A CSI sequence ends with a terminator byte; the keymap resolves
//! that byte plus the committed parameter list to a [`Key`]. Keymaps
//! are per terminal family; only the xterm family is shipped, which
//! covers the common cases. Everything unrecognized resolves to
//! [`Key::UNKNOWN`] — garbage input is never an error.
//!
//! Modifier handling preserves the xterm wire encoding as-is: a single
//! trailing parameter in 1..=8 is multiplied onto one fixed step
//! ([`Key::MOD_META`]) regardless of which modifier combination it
//! names — the wire never distinguished them, so decoding further
//! would invent information. Callers can split the raw offset with
//! [`Key::base`] and [`Key::modifier`].

use crate::key::Key;

/// A terminal family's terminator table.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    pub name: &'static str,
    lookup: fn(u8, &[i32]) -> Key,
}

impl Keymap {
    /// The xterm family table (also the default).
    pub fn xterm() -> Keymap {
        Keymap {
            name: "xterm",
            lookup: xterm_lookup,
        }
    }

    /// Resolve a terminator byte and its parameters.
    pub fn resolve(&self, terminator: u8, params: &[i32]) -> Key {
        (self.lookup)(terminator, params)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Keymap::xterm()
    }
}

/// Base key plus the optional trailing modifier parameter.
fn with_params(key: Key, params: &[i32]) -> Key {
    match params {
        [] => key,
        [.., p] if (1..=8).contains(p) => key.with_modifier_param(*p),
        _ => Key::UNKNOWN,
    }
}

/// The `~` terminator selects among editing keys by its leading
/// parameter (`CSI 5 ~` is PageUp, `CSI 5 ; 3 ~` is PageUp with
/// modifier 3).
fn tilde_key(params: &[i32]) -> Key {
    let Some(&selector) = params.first() else {
        return Key::UNKNOWN;
    };
    let key = match selector {
        2 => Key::INSERT,
        3 => Key::DELETE,
        5 => Key::PAGE_UP,
        6 => Key::PAGE_DOWN,
        15 => Key::F5,
        17 => Key::F6,
        18 => Key::F7,
        19 => Key::F8,
        20 => Key::F9,
        21 => Key::F10,
        23 => Key::F11,
        24 => Key::F12,
        _ => return Key::UNKNOWN,
    };
    match params {
        [_] => key,
        [_, p] if (1..=8).contains(p) => key.with_modifier_param(*p),
        _ => Key::UNKNOWN,
    }
}

fn xterm_lookup(terminator: u8, params: &[i32]) -> Key {
    match terminator {
        b'~' => tilde_key(params),
        b'A' => with_params(Key::UP, params),
        b'B' => with_params(Key::DOWN, params),
        b'C' => with_params(Key::RIGHT, params),
        b'D' => with_params(Key::LEFT, params),
        b'H' => with_params(Key::HOME, params),
        b'F' => with_params(Key::END, params),
        b'P' => with_params(Key::F1, params),
        b'Q' => with_params(Key::F2, params),
        b'R' => with_params(Key::F3, params),
        b'S' => with_params(Key::F4, params),
        _ => Key::UNKNOWN,
    }
}
