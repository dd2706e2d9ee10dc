//! Key name and scancode tables.
//!
//! Key codes use Windows virtual-key numbering on every platform so that
//! configuration files stay portable.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Converts a virtual key code to its canonical name.
#[inline]
pub fn vk_to_key_name(vk: u32) -> String {
    match vk {
        // A-Z, 0-9
        0x41..=0x5A | 0x30..=0x39 => char::from_u32(vk)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("VK_{:02X}", vk)),
        0x60..=0x69 => format!("NUMPAD{}", vk - 0x60),
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        0x20 => "SPACE".to_string(),
        0x0D => "ENTER".to_string(),
        0x09 => "TAB".to_string(),
        0x1B => "ESC".to_string(),
        0x08 => "BACKSPACE".to_string(),
        0x0C => "CLEAR".to_string(),
        0x2E => "DELETE".to_string(),
        0x2D => "INSERT".to_string(),
        0x24 => "HOME".to_string(),
        0x23 => "END".to_string(),
        0x21 => "PAGEUP".to_string(),
        0x22 => "PAGEDOWN".to_string(),
        0x26 => "UP".to_string(),
        0x28 => "DOWN".to_string(),
        0x25 => "LEFT".to_string(),
        0x27 => "RIGHT".to_string(),
        0x14 => "CAPSLOCK".to_string(),
        0x90 => "NUMLOCK".to_string(),
        0x91 => "SCROLL".to_string(),
        0x13 => "PAUSE".to_string(),
        0x2C => "SNAPSHOT".to_string(),
        0x6A => "MULTIPLY".to_string(),
        0x6B => "ADD".to_string(),
        0x6C => "SEPARATOR".to_string(),
        0x6D => "SUBTRACT".to_string(),
        0x6E => "DECIMAL".to_string(),
        0x6F => "DIVIDE".to_string(),
        0xBA => "OEM_1".to_string(),
        0xBB => "OEM_PLUS".to_string(),
        0xBC => "OEM_COMMA".to_string(),
        0xBD => "OEM_MINUS".to_string(),
        0xBE => "OEM_PERIOD".to_string(),
        0xBF => "OEM_2".to_string(),
        0xC0 => "OEM_3".to_string(),
        0xDB => "OEM_4".to_string(),
        0xDC => "OEM_5".to_string(),
        0xDD => "OEM_6".to_string(),
        0xDE => "OEM_7".to_string(),
        0xDF => "OEM_8".to_string(),
        0xE2 => "OEM_102".to_string(),
        0x10 => "SHIFT".to_string(),
        0x11 => "CTRL".to_string(),
        0x12 => "ALT".to_string(),
        0xA0 => "LSHIFT".to_string(),
        0xA1 => "RSHIFT".to_string(),
        0xA2 => "LCTRL".to_string(),
        0xA3 => "RCTRL".to_string(),
        0xA4 => "LALT".to_string(),
        0xA5 => "RALT".to_string(),
        0x5B => "LWIN".to_string(),
        0x5C => "RWIN".to_string(),
        _ => format!("VK_{:02X}", vk),
    }
}

/// Converts a key name to its virtual key code (case insensitive).
pub fn key_name_to_vk(key_name: &str) -> Option<u32> {
    let key = key_name.trim().to_uppercase();

    // letter and number keys
    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_alphabetic() || c.is_ascii_digit())
    {
        return Some(c as u32);
    }

    // F1-F24
    if key.starts_with('F')
        && key.len() > 1
        && let Ok(num) = key[1..].parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(0x70 + num - 1);
    }

    if key.starts_with("NUMPAD")
        && key.len() > 6
        && let Ok(num) = key[6..].parse::<u32>()
        && num <= 9
    {
        return Some(0x60 + num);
    }

    // Raw codes written back by vk_to_key_name for unnamed keys
    if let Some(hex) = key.strip_prefix("VK_")
        && let Ok(vk) = u32::from_str_radix(hex, 16)
        && (0x01..=0xFE).contains(&vk)
    {
        return Some(vk);
    }

    match key.as_str() {
        "ESC" | "ESCAPE" => Some(0x1B),
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "CLEAR" => Some(0x0C),
        "SHIFT" => Some(0x10),
        "CTRL" | "CONTROL" => Some(0x11),
        "ALT" => Some(0x12),
        "PAUSE" => Some(0x13),
        "CAPSLOCK" | "CAPITAL" => Some(0x14),
        "SPACE" => Some(0x20),
        "BACKSPACE" | "BACK" => Some(0x08),
        "DELETE" => Some(0x2E),
        "INSERT" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),
        "LSHIFT" => Some(0xA0),
        "RSHIFT" => Some(0xA1),
        "LCTRL" => Some(0xA2),
        "RCTRL" => Some(0xA3),
        "LALT" => Some(0xA4),
        "RALT" => Some(0xA5),
        "LWIN" => Some(0x5B),
        "RWIN" => Some(0x5C),
        "NUMLOCK" => Some(0x90),
        "SCROLL" => Some(0x91),
        "SNAPSHOT" => Some(0x2C),
        "MULTIPLY" => Some(0x6A),
        "ADD" => Some(0x6B),
        "SEPARATOR" => Some(0x6C),
        "SUBTRACT" => Some(0x6D),
        "DECIMAL" => Some(0x6E),
        "DIVIDE" => Some(0x6F),
        "OEM_1" => Some(0xBA),
        "OEM_PLUS" => Some(0xBB),
        "OEM_COMMA" => Some(0xBC),
        "OEM_MINUS" => Some(0xBD),
        "OEM_PERIOD" => Some(0xBE),
        "OEM_2" => Some(0xBF),
        "OEM_3" => Some(0xC0),
        "OEM_4" => Some(0xDB),
        "OEM_5" => Some(0xDC),
        "OEM_6" => Some(0xDD),
        "OEM_7" => Some(0xDE),
        "OEM_8" => Some(0xDF),
        "OEM_102" => Some(0xE2),
        "LBUTTON" => Some(0x01),
        "RBUTTON" => Some(0x02),
        "MBUTTON" => Some(0x04),
        "XBUTTON1" => Some(0x05),
        "XBUTTON2" => Some(0x06),
        _ => None,
    }
}

/// Virtual key codes that name mouse buttons rather than keys.
#[inline]
pub const fn is_mouse_vk(vk: u32) -> bool {
    matches!(vk, 0x01 | 0x02 | 0x04 | 0x05 | 0x06)
}

/// Returns the set-1 scancode for a virtual key, or 0 when unknown.
pub fn vk_to_scancode(vk_code: u32) -> u16 {
    SCANCODE_MAP.get(&vk_code).copied().unwrap_or(0)
}

/// Keys whose scancode must be sent with the extended-key (E0) prefix.
#[inline]
pub fn is_extended_key(vk_code: u32) -> bool {
    matches!(
        vk_code,
        0x21..=0x28 // PAGEUP, PAGEDOWN, END, HOME, arrows
            | 0x2C // SNAPSHOT
            | 0x2D // INSERT
            | 0x2E // DELETE
            | 0x5B // LWIN
            | 0x5C // RWIN
            | 0x6F // DIVIDE
            | 0x90 // NUMLOCK
            | 0xA3 // RCTRL
            | 0xA5 // RALT
    )
}

static SCANCODE_MAP: LazyLock<HashMap<u32, u16>> = LazyLock::new(|| {
    [
        // letter keys (A-Z)
        (0x41, 0x1E),
        (0x42, 0x30),
        (0x43, 0x2E),
        (0x44, 0x20),
        (0x45, 0x12),
        (0x46, 0x21),
        (0x47, 0x22),
        (0x48, 0x23),
        (0x49, 0x17),
        (0x4A, 0x24),
        (0x4B, 0x25),
        (0x4C, 0x26),
        (0x4D, 0x32),
        (0x4E, 0x31),
        (0x4F, 0x18),
        (0x50, 0x19),
        (0x51, 0x10),
        (0x52, 0x13),
        (0x53, 0x1F),
        (0x54, 0x14),
        (0x55, 0x16),
        (0x56, 0x2F),
        (0x57, 0x11),
        (0x58, 0x2D),
        (0x59, 0x15),
        (0x5A, 0x2C),
        // number keys (0-9)
        (0x30, 0x0B),
        (0x31, 0x02),
        (0x32, 0x03),
        (0x33, 0x04),
        (0x34, 0x05),
        (0x35, 0x06),
        (0x36, 0x07),
        (0x37, 0x08),
        (0x38, 0x09),
        (0x39, 0x0A),
        // function keys (F1-F12)
        (0x70, 0x3B),
        (0x71, 0x3C),
        (0x72, 0x3D),
        (0x73, 0x3E),
        (0x74, 0x3F),
        (0x75, 0x40),
        (0x76, 0x41),
        (0x77, 0x42),
        (0x78, 0x43),
        (0x79, 0x44),
        (0x7A, 0x57),
        (0x7B, 0x58),
        (0x1B, 0x01), // ESC
        (0x0D, 0x1C), // ENTER
        (0x09, 0x0F), // TAB
        (0x20, 0x39), // SPACE
        (0x08, 0x0E), // BACKSPACE
        (0x2E, 0x53), // DELETE
        (0x2D, 0x52), // INSERT
        (0x24, 0x47), // HOME
        (0x23, 0x4F), // END
        (0x21, 0x49), // PAGEUP
        (0x22, 0x51), // PAGEDOWN
        (0x26, 0x48), // UP
        (0x28, 0x50), // DOWN
        (0x25, 0x4B), // LEFT
        (0x27, 0x4D), // RIGHT
        (0x14, 0x3A), // CAPSLOCK
        (0x90, 0x45), // NUMLOCK
        (0x91, 0x46), // SCROLL LOCK
        (0x60, 0x52), // NUMPAD0
        (0x61, 0x4F), // NUMPAD1
        (0x62, 0x50), // NUMPAD2
        (0x63, 0x51), // NUMPAD3
        (0x64, 0x4B), // NUMPAD4
        (0x65, 0x4C), // NUMPAD5
        (0x66, 0x4D), // NUMPAD6
        (0x67, 0x47), // NUMPAD7
        (0x68, 0x48), // NUMPAD8
        (0x69, 0x49), // NUMPAD9
        (0x6A, 0x37), // MULTIPLY
        (0x6B, 0x4E), // ADD
        (0x6D, 0x4A), // SUBTRACT
        (0x6E, 0x53), // DECIMAL
        (0x6F, 0x35), // DIVIDE
        (0xBA, 0x27), // OEM_1 (;:)
        (0xBB, 0x0D), // OEM_PLUS (=+)
        (0xBC, 0x33), // OEM_COMMA (,<)
        (0xBD, 0x0C), // OEM_MINUS (-_)
        (0xBE, 0x34), // OEM_PERIOD (.>)
        (0xBF, 0x35), // OEM_2 (/?)
        (0xC0, 0x29), // OEM_3 (`~)
        (0xDB, 0x1A), // OEM_4 ([{)
        (0xDC, 0x2B), // OEM_5 (\|)
        (0xDD, 0x1B), // OEM_6 (]})
        (0xDE, 0x28), // OEM_7 ('")
        (0xE2, 0x56), // OEM_102 (<>)
        (0xA0, 0x2A), // LSHIFT
        (0xA1, 0x36), // RSHIFT
        (0xA2, 0x1D), // LCTRL
        (0xA3, 0x1D), // RCTRL (extended)
        (0xA4, 0x38), // LALT
        (0xA5, 0x38), // RALT (extended)
        (0x5B, 0x5B), // LWIN (extended)
        (0x5C, 0x5C), // RWIN (extended)
        (0x10, 0x2A), // SHIFT
        (0x11, 0x1D), // CTRL
        (0x12, 0x38), // ALT
    ]
    .iter()
    .cloned()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_to_vk_letters_and_digits() {
        assert_eq!(key_name_to_vk("A"), Some(0x41));
        assert_eq!(key_name_to_vk("z"), Some(0x5A));
        assert_eq!(key_name_to_vk("7"), Some(0x37));
    }

    #[test]
    fn test_key_name_to_vk_function_and_numpad() {
        assert_eq!(key_name_to_vk("F1"), Some(0x70));
        assert_eq!(key_name_to_vk("f24"), Some(0x87));
        assert_eq!(key_name_to_vk("F25"), None);
        assert_eq!(key_name_to_vk("NUMPAD3"), Some(0x63));
        assert_eq!(key_name_to_vk("NUMPAD10"), None);
    }

    #[test]
    fn test_key_name_to_vk_aliases() {
        assert_eq!(key_name_to_vk("ENTER"), key_name_to_vk("RETURN"));
        assert_eq!(key_name_to_vk("ESC"), key_name_to_vk("escape"));
        assert_eq!(key_name_to_vk("BACK"), Some(0x08));
        assert_eq!(key_name_to_vk(" tab "), Some(0x09));
    }

    #[test]
    fn test_key_name_to_vk_raw_hex() {
        assert_eq!(key_name_to_vk("VK_FF"), None);
        assert_eq!(key_name_to_vk("VK_E5"), Some(0xE5));
        assert_eq!(key_name_to_vk("VK_00"), None);
    }

    #[test]
    fn test_key_name_to_vk_unknown() {
        assert_eq!(key_name_to_vk(""), None);
        assert_eq!(key_name_to_vk("HYPER"), None);
    }

    #[test]
    fn test_vk_name_round_trip() {
        for vk in 0x01..=0xFEu32 {
            if is_mouse_vk(vk) {
                continue;
            }
            let name = vk_to_key_name(vk);
            assert_eq!(key_name_to_vk(&name), Some(vk), "round trip for {name}");
        }
    }

    #[test]
    fn test_vk_to_scancode() {
        assert_eq!(vk_to_scancode(0x41), 0x1E);
        assert_eq!(vk_to_scancode(0x0D), 0x1C);
        assert_eq!(vk_to_scancode(0x87), 0); // F24 has no set-1 scancode here
    }

    #[test]
    fn test_extended_keys() {
        assert!(is_extended_key(0x26)); // UP
        assert!(is_extended_key(0xA3)); // RCTRL
        assert!(!is_extended_key(0xA2)); // LCTRL
        assert!(!is_extended_key(0x0D));
        assert!(!is_extended_key(0x68)); // NUMPAD8 shares UP's scancode
    }
}
