//! Logical key codes.
//!
//! A [`Key`] wraps the integer encoding the decoder produces:
//! printable ASCII maps to itself, named special keys occupy the
//! 10000 range, and modifier combinations add a fixed arithmetic step
//! (`Key::UP + 3 * MOD_META` for Alt+Up as xterm reports it). The
//! encoding is kept arithmetic so callers can match on `base()` and
//! `modifier()` independently.

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(pub i32);

impl Key {
    /// Unrecognized input; decoding garbage is not an error.
    pub const UNKNOWN: Key = Key(0);
    pub const TAB: Key = Key(9);
    pub const ENTER: Key = Key(10);
    pub const ESCAPE: Key = Key(27);
    pub const BACKSPACE: Key = Key(127);

    pub const F1: Key = Key(10000);
    pub const F2: Key = Key(10001);
    pub const F3: Key = Key(10002);
    pub const F4: Key = Key(10003);
    pub const F5: Key = Key(10004);
    pub const F6: Key = Key(10005);
    pub const F7: Key = Key(10006);
    pub const F8: Key = Key(10007);
    pub const F9: Key = Key(10008);
    pub const F10: Key = Key(10009);
    pub const F11: Key = Key(10010);
    pub const F12: Key = Key(10011);
    pub const INSERT: Key = Key(10012);
    pub const DELETE: Key = Key(10013);
    pub const HOME: Key = Key(10014);
    pub const END: Key = Key(10015);
    pub const PAGE_UP: Key = Key(10016);
    pub const PAGE_DOWN: Key = Key(10017);
    pub const UP: Key = Key(10018);
    pub const DOWN: Key = Key(10019);
    pub const LEFT: Key = Key(10020);
    pub const RIGHT: Key = Key(10021);

    /// One modifier step. CSI sequences report the modifier as a
    /// trailing parameter in 1..=8, which is multiplied onto this step
    /// and added to the base key.
    pub const MOD_META: i32 = 1000;
    pub const MOD_SHIFT: i32 = 2000;
    pub const MOD_ALT: i32 = 3000;
    pub const MOD_SHIFT_ALT: i32 = 4000;
    pub const MOD_CTRL: i32 = 5000;
    pub const MOD_SHIFT_CTRL: i32 = 6000;
    pub const MOD_ALT_CTRL: i32 = 7000;
    pub const MOD_SHIFT_ALT_CTRL: i32 = 8000;

    /// A key for a single raw byte (printable or control).
    pub fn from_byte(b: u8) -> Key {
        Key(b as i32)
    }

    /// The key with a CSI modifier parameter applied.
    pub fn with_modifier_param(self, param: i32) -> Key {
        Key(self.0 + param * Key::MOD_META)
    }

    /// The key as sent by Alt+key (ESC prefix).
    pub fn with_alt(self) -> Key {
        Key(self.0 + Key::MOD_ALT)
    }

    /// The key with any modifier offset stripped.
    pub fn base(self) -> Key {
        if self.0 >= Key::MOD_META {
            let code = self.0 % Key::MOD_META;
            // Special keys live above 10000; their modifier offsets
            // start at 11000.
            if self.0 >= Key::F1.0 {
                Key(Key::F1.0 + code)
            } else {
                Key(code)
            }
        } else {
            self
        }
    }

    /// The raw modifier offset (a multiple of [`Key::MOD_META`]), or 0.
    pub fn modifier(self) -> i32 {
        if self.0 >= Key::F1.0 {
            self.0 - self.base().0
        } else if self.0 >= Key::MOD_META {
            self.0 - (self.0 % Key::MOD_META)
        } else {
            0
        }
    }

    /// The printable character, if this key is unmodified printable
    /// ASCII.
    pub fn as_char(self) -> Option<char> {
        u8::try_from(self.0)
            .ok()
            .map(char::from)
            .filter(|c| !c.is_control())
    }
}

impl From<u8> for Key {
    fn from(b: u8) -> Self {
        Key::from_byte(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_roundtrip() {
        assert_eq!(Key::from_byte(b'a').as_char(), Some('a'));
        assert_eq!(Key::from_byte(b' ').as_char(), Some(' '));
        assert_eq!(Key::ESCAPE.as_char(), None);
        assert_eq!(Key::UP.as_char(), None);
    }

    #[test]
    fn modifier_arithmetic() {
        let k = Key::PAGE_UP.with_modifier_param(3);
        assert_eq!(k, Key(10016 + 3000));
        assert_eq!(k.base(), Key::PAGE_UP);
        assert_eq!(k.modifier(), 3 * Key::MOD_META);
    }

    #[test]
    fn alt_prefixed_printable() {
        let k = Key::from_byte(b'x').with_alt();
        assert_eq!(k.0, b'x' as i32 + Key::MOD_ALT);
        assert_eq!(k.base(), Key::from_byte(b'x'));
        assert_eq!(k.modifier(), Key::MOD_ALT);
    }

    #[test]
    fn unmodified_keys_report_zero_modifier() {
        assert_eq!(Key::UP.modifier(), 0);
        assert_eq!(Key::UP.base(), Key::UP);
        assert_eq!(Key::from_byte(b'q').modifier(), 0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn special_key_modifier_roundtrip(
                offset in 0i32..=21,
                param in 1i32..=8,
            ) {
                let key = Key(Key::F1.0 + offset);
                let modified = key.with_modifier_param(param);
                prop_assert_eq!(modified.base(), key);
                prop_assert_eq!(modified.modifier(), param * Key::MOD_META);
            }

            #[test]
            fn printable_alt_roundtrip(b in 0x20u8..0x7f) {
                let modified = Key::from_byte(b).with_alt();
                prop_assert_eq!(modified.base(), Key::from_byte(b));
                prop_assert_eq!(modified.modifier(), Key::MOD_ALT);
            }
        }
    }
}
