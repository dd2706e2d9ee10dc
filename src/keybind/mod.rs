//! Keybinding model.
//!
//! A [`Keybind`] is a virtual key code plus a modifier set. The distinguished
//! [`Keybind::NOT_SET`] value represents "no binding configured"; every other
//! keybind carries a keyboard key code in `0x01..=0xFE`.

pub mod parsing;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parsing::{is_mouse_vk, key_name_to_vk, vk_to_key_name};

bitflags! {
    /// Modifier keys stored alongside a keybinding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

impl Modifiers {
    /// Display order used when formatting a keybind.
    const NAMED: [(Modifiers, &'static str); 4] = [
        (Modifiers::CTRL, "CTRL"),
        (Modifiers::ALT, "ALT"),
        (Modifiers::SHIFT, "SHIFT"),
        (Modifiers::META, "META"),
    ];

    /// Parses a modifier name, accepting the common aliases.
    fn from_alias(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "CTRL" | "CONTROL" => Some(Self::CTRL),
            "ALT" => Some(Self::ALT),
            "SHIFT" => Some(Self::SHIFT),
            "META" | "WIN" | "SUPER" => Some(Self::META),
            _ => None,
        }
    }
}

/// Text written to configuration for an unbound button.
pub const NOT_SET_NAME: &str = "NOT_SET";

/// An immutable key code plus modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keybind {
    key_code: u32,
    modifiers: Modifiers,
}

impl Keybind {
    /// No binding configured.
    pub const NOT_SET: Keybind = Keybind {
        key_code: 0,
        modifiers: Modifiers::empty(),
    };

    /// Creates a keybind. Key codes that do not name a keyboard key (0,
    /// mouse buttons, anything above 0xFE) yield [`Keybind::NOT_SET`].
    pub const fn new(key_code: u32, modifiers: Modifiers) -> Self {
        if key_code == 0 || key_code > 0xFE || is_mouse_vk(key_code) {
            return Self::NOT_SET;
        }
        Self {
            key_code,
            modifiers,
        }
    }

    /// Keybind for a bare key with no modifiers.
    pub const fn key(key_code: u32) -> Self {
        Self::new(key_code, Modifiers::empty())
    }

    #[inline]
    pub const fn is_set(&self) -> bool {
        self.key_code != 0
    }

    /// Base key code; 0 for [`Keybind::NOT_SET`].
    #[inline]
    pub const fn key_code(&self) -> u32 {
        self.key_code
    }

    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// Reasons a keybind string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeybindParseError {
    #[error("unknown key name '{0}'")]
    UnknownKey(String),
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("'{0}' is a mouse button, not a key")]
    NotAKey(String),
    #[error("keybind '{0}' has an empty component")]
    EmptyComponent(String),
}

impl FromStr for Keybind {
    type Err = KeybindParseError;

    /// Parses `"KEY"` or `"MOD+...+KEY"`. `"NOT_SET"` and the empty string
    /// yield [`Keybind::NOT_SET`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_SET_NAME) {
            return Ok(Self::NOT_SET);
        }

        let mut parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(KeybindParseError::EmptyComponent(trimmed.to_string()));
        }

        // split('+') on a non-empty string always yields at least one part
        let key_name = parts.pop().unwrap_or_default();
        let key_code = key_name_to_vk(key_name)
            .ok_or_else(|| KeybindParseError::UnknownKey(key_name.to_string()))?;
        if is_mouse_vk(key_code) {
            return Err(KeybindParseError::NotAKey(key_name.to_string()));
        }

        let mut modifiers = Modifiers::empty();
        for part in parts {
            modifiers |= Modifiers::from_alias(part)
                .ok_or_else(|| KeybindParseError::UnknownModifier(part.to_string()))?;
        }

        Ok(Self::new(key_code, modifiers))
    }
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_set() {
            return f.write_str(NOT_SET_NAME);
        }
        for (flag, name) in Modifiers::NAMED {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        f.write_str(&vk_to_key_name(self.key_code))
    }
}

impl TryFrom<String> for Keybind {
    type Error = KeybindParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Keybind> for String {
    fn from(keybind: Keybind) -> Self {
        keybind.to_string()
    }
}
