use crate::{Key, KeyCode};

// Central mapping between enum variants and spec strings for shorthand/non-name specs.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Minus => "-",
            Equal => "=",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Quote => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Grave => "`",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s, )*
            _ => $key.name(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            Control => "ctrl",
            Alt => "menu",
            CapsLock => "caps",
            Escape => "esc",
            Enter => "return",
            Enter => "ret",
            Delete => "del",
            Insert => "ins",
            PrintScreen => "prtsc",
            LeftArrow => "left",
            RightArrow => "right",
            UpArrow => "up",
            DownArrow => "down",
            PageUp => "pgup",
            PageDown => "pgdn",
            Backslash => "backslash",
            Comma => "comma",
            Period => "period",
            Slash => "slash",
            Minus => "minus",
            Equal => "equal",
            Semicolon => "semicolon",
            Quote => "quote",
            Grave => "grave",
            Grave => "tilde",
        }
    };
}

/// Parse a raw numeric code: `0x` hex, or decimal with at least two digits.
fn parse_code(s: &str) -> Option<KeyCode> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => KeyCode::from_str_radix(hex, 16).ok(),
        None if s.len() > 1 && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        None => None,
    }
}

/// Parses a key specification into a raw key code.
///
/// Accepted forms, tried in order:
/// - a case-insensitive `Key` variant name ("PageUp", "f5", "b");
/// - symbol shorthands for digits and punctuation ("7", "-", "[");
/// - alias words ("esc", "ctrl", "pgup", "tilde");
/// - a numeric code with at least two digits ("66") or in hex ("0x42").
///
/// A single digit is always the digit key, never the raw code.
pub fn from_spec(s: &str) -> Option<KeyCode> {
    let s = s.trim();
    if let Some(k) = Key::from_name(s) {
        return Some(k.code());
    }
    if let Some(k) = key_spec_map!(from_spec_match, s) {
        return Some(k.code());
    }
    let lowered = s.to_ascii_lowercase();
    if let Some(k) = key_spec_aliases!(from_spec_match, lowered.as_str()) {
        return Some(k.code());
    }
    parse_code(s)
}

/// Renders a key code for display.
///
/// Named keys use their symbol shorthand or lowercased variant name; unnamed codes are
/// rendered as decimal so that `from_spec(&to_spec(c)) == Some(c)` for every code >= 10.
pub fn to_spec(code: KeyCode) -> String {
    match Key::from_code(code) {
        Some(k) => key_spec_map!(to_spec_match, k).to_ascii_lowercase(),
        None => code.to_string(),
    }
}

impl Key {
    /// Returns the key specification string for this `Key`.
    pub fn to_spec(self) -> String {
        to_spec(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(k: Key) {
        let spec = k.to_spec();
        assert_eq!(
            from_spec(&spec),
            Some(k.code()),
            "roundtrip failed for {} -> {}",
            k.name(),
            spec
        );
    }

    #[test]
    fn every_named_key_roundtrips() {
        for k in Key::ALL {
            assert_roundtrip(*k);
        }
    }

    #[test]
    fn digits_and_punctuation() {
        assert_eq!(from_spec("1"), Some(Key::Digit1.code()));
        assert_eq!(to_spec(Key::Comma.code()), ",");
        assert_eq!(from_spec("comma"), Some(Key::Comma.code()));
        assert_eq!(from_spec("\\"), Some(Key::Backslash.code()));
    }

    #[test]
    fn aliases() {
        assert_eq!(from_spec("ESC"), Some(Key::Escape.code()));
        assert_eq!(from_spec("ctrl"), Some(Key::Control.code()));
        assert_eq!(from_spec("pgdn"), Some(Key::PageDown.code()));
        assert_eq!(from_spec(" enter "), Some(Key::Enter.code()));
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(from_spec("66"), Some(66));
        assert_eq!(from_spec("0x48"), Some(72));
        assert_eq!(from_spec("0xZZ"), None);
        assert_eq!(from_spec("bogus"), None);
    }

    #[test]
    fn unnamed_codes_render_as_numbers() {
        assert_eq!(to_spec(255), "255");
        assert_eq!(from_spec(&to_spec(255)), Some(255));
        assert_eq!(to_spec(66), "b");
    }
}
