use serde::{Deserialize, Serialize};

use crate::Key;

/// Modifier keys a binding may require to be co-held.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Either shift key.
    Shift,
    /// Either control key.
    #[serde(alias = "ctrl")]
    Control,
    /// Either alt key.
    Alt,
}

impl Modifier {
    /// Every modifier, in polling order.
    pub const ALL: [Self; 3] = [Self::Shift, Self::Control, Self::Alt];

    /// Parses a modifier specification string via key specs, then converts.
    ///
    /// Accepts the same names and aliases as [`crate::from_spec`]; fails if the
    /// parsed key is not a modifier.
    pub fn from_spec(s: &str) -> Option<Self> {
        crate::from_spec(s)
            .and_then(Key::from_code)
            .and_then(|k| Self::try_from(k).ok())
    }

    /// Returns the canonical lowercase spec string ("shift", "ctrl", "alt").
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Control => "ctrl",
            Self::Alt => "alt",
        }
    }
}

impl From<Modifier> for Key {
    fn from(m: Modifier) -> Self {
        match m {
            Modifier::Shift => Self::Shift,
            Modifier::Control => Self::Control,
            Modifier::Alt => Self::Alt,
        }
    }
}

impl TryFrom<Key> for Modifier {
    type Error = ();
    fn try_from(k: Key) -> Result<Self, Self::Error> {
        match k {
            Key::Shift => Ok(Self::Shift),
            Key::Control => Ok(Self::Control),
            Key::Alt => Ok(Self::Alt),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_modifiers() {
        for m in Modifier::ALL {
            let k: Key = m.into();
            let back = Modifier::try_from(k).expect("should map back");
            assert_eq!(m, back);
        }
    }

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("Shift"), Some(Modifier::Shift));
        assert_eq!(Modifier::from_spec("alt"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_spec("menu"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_spec("a"), None);

        assert_eq!(Modifier::Control.to_spec(), "ctrl");
        assert_eq!(Key::from(Modifier::Alt).code(), 0x12);
    }
}
