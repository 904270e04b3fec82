use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Keys the automation knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Control,
    Shift,
    Alt,
    Meta,
    Enter,
    Escape,
    Space,
    Backspace,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("Empty key name")]
    Empty,

    #[error("Unknown key: {0}")]
    Unknown(String),
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c.to_ascii_lowercase()));
        }

        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Ok(Key::Control),
            "shift" => Ok(Key::Shift),
            "alt" | "option" => Ok(Key::Alt),
            "meta" | "win" | "cmd" | "super" => Ok(Key::Meta),
            "enter" | "return" => Ok(Key::Enter),
            "esc" | "escape" => Ok(Key::Escape),
            "space" => Ok(Key::Space),
            "backspace" => Ok(Key::Backspace),
            "tab" => Ok(Key::Tab),
            other => Err(KeyParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Control => f.write_str("ctrl"),
            Key::Shift => f.write_str("shift"),
            Key::Alt => f.write_str("alt"),
            Key::Meta => f.write_str("meta"),
            Key::Enter => f.write_str("enter"),
            Key::Escape => f.write_str("escape"),
            Key::Space => f.write_str("space"),
            Key::Backspace => f.write_str("backspace"),
            Key::Tab => f.write_str("tab"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Key chord written as `ctrl+shift+s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut(Vec<Key>);

impl Shortcut {
    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }
}

impl FromStr for Shortcut {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // a lone "+" is the plus key, not a separator
        if s.trim() == "+" {
            return Ok(Shortcut(vec![Key::Char('+')]));
        }
        let keys = s
            .split('+')
            .map(str::parse)
            .collect::<Result<Vec<Key>, _>>()?;
        Ok(Shortcut(keys))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Key::to_string).collect();
        f.write_str(&names.join("+"))
    }
}

impl Serialize for Shortcut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Shortcut {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chords() {
        let s: Shortcut = "ctrl+shift+s".parse().unwrap();
        assert_eq!(s.keys(), &[Key::Control, Key::Shift, Key::Char('s')]);
        assert_eq!(s.to_string(), "ctrl+shift+s");
    }

    #[test]
    fn single_chars_are_lowercased() {
        assert_eq!("S".parse::<Key>().unwrap(), Key::Char('s'));
        assert_eq!("Return".parse::<Key>().unwrap(), Key::Enter);
    }

    #[test]
    fn rejects_unknown_and_empty_names() {
        assert_eq!(
            "hyper".parse::<Key>(),
            Err(KeyParseError::Unknown("hyper".to_string()))
        );
        assert!("ctrl++s".parse::<Shortcut>().is_err());
        assert_eq!("+".parse::<Shortcut>().unwrap().keys(), &[Key::Char('+')]);
    }
}
