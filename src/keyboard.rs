/*
 * Keyboard translation for application windows: modifier tracking from key
 * down/up messages, the named virtual-key table, alt-qualified letter synthesis
 * and character-message decoding.
 *
 * Virtual-key codes are kept as plain `u16` values so this module stays
 * portable; the Windows test below pins them to the `VIRTUAL_KEY` constants.
 */
use crate::types::{KeyPress, Modifiers, NamedKey};

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_F1: u16 = 0x70;
pub const VK_F12: u16 = 0x7B;
/// `/?` on US layouts.
pub const VK_OEM_2: u16 = 0xBF;
/// `.>` on US layouts.
pub const VK_OEM_PERIOD: u16 = 0xBE;

/// Control characters delivered through character messages.
const CHAR_BACKSPACE: u16 = 0x08;
const CHAR_TAB: u16 = 0x09;
const CHAR_RETURN: u16 = 0x0D;

pub fn named_key(vk: u16) -> Option<NamedKey> {
    let key = match vk {
        VK_ESCAPE => NamedKey::Escape,
        VK_INSERT => NamedKey::Insert,
        VK_DELETE => NamedKey::Delete,
        VK_PRIOR => NamedKey::PageUp,
        VK_NEXT => NamedKey::PageDown,
        VK_HOME => NamedKey::Home,
        VK_END => NamedKey::End,
        VK_LEFT => NamedKey::Left,
        VK_UP => NamedKey::Up,
        VK_RIGHT => NamedKey::Right,
        VK_DOWN => NamedKey::Down,
        VK_F1..=VK_F12 => NamedKey::F((vk - VK_F1 + 1) as u8),
        _ => return None,
    };
    Some(key)
}

/*
 * Handles a key down. A plain key down releases alt first; a system key down
 * (alt held) keeps it. Modifier keys only update state. Named keys produce a
 * press qualified by every held modifier. Letters and the two punctuation keys
 * produce an alt-qualified character press while alt is held.
 */
pub fn key_down(modifiers: &mut Modifiers, vk: u16, system: bool) -> Option<KeyPress> {
    if !system {
        modifiers.alt = false;
    }
    match vk {
        VK_CONTROL => {
            modifiers.control = true;
            return None;
        }
        VK_MENU => {
            modifiers.alt = true;
            return None;
        }
        VK_SHIFT => {
            modifiers.shift = true;
            return None;
        }
        _ => {}
    }

    if let Some(named) = named_key(vk) {
        let mut press = KeyPress::named(named);
        press.modifiers = *modifiers;
        return Some(press);
    }

    let letter = alt_character(vk, modifiers.shift)?;
    if !modifiers.alt {
        return None;
    }
    let mut press = KeyPress::text(letter.to_string());
    press.modifiers = Modifiers {
        alt: true,
        ..Modifiers::default()
    };
    Some(press)
}

pub fn key_up(modifiers: &mut Modifiers, vk: u16) {
    match vk {
        VK_CONTROL => modifiers.control = false,
        VK_MENU => modifiers.alt = false,
        VK_SHIFT => modifiers.shift = false,
        _ => {}
    }
}

fn alt_character(vk: u16, shift: bool) -> Option<char> {
    match vk {
        VK_OEM_2 => Some(if shift { '?' } else { '/' }),
        VK_OEM_PERIOD => Some(if shift { '>' } else { '.' }),
        0x41..=0x5A => {
            let upper = char::from(vk as u8);
            Some(if shift {
                upper
            } else {
                upper.to_ascii_lowercase()
            })
        }
        _ => None,
    }
}

/*
 * Decodes one UTF-16 unit from a character message. Backspace and tab become
 * named presses and carriage return becomes "\n". A high surrogate is held in
 * `pending` until its low half arrives; unpaired halves are dropped.
 */
pub fn character(pending: &mut Option<u16>, unit: u16) -> Option<KeyPress> {
    match unit {
        CHAR_BACKSPACE => {
            *pending = None;
            return Some(KeyPress::named(NamedKey::Backspace));
        }
        CHAR_TAB => {
            *pending = None;
            return Some(KeyPress::named(NamedKey::Tab));
        }
        CHAR_RETURN => {
            *pending = None;
            return Some(KeyPress::text("\n"));
        }
        _ => {}
    }

    match unit {
        0xD800..=0xDBFF => {
            if let Some(stale) = pending.replace(unit) {
                log::warn!("Keyboard: dropping unpaired high surrogate {stale:#06x}");
            }
            None
        }
        0xDC00..=0xDFFF => {
            let Some(high) = pending.take() else {
                log::warn!("Keyboard: dropping unpaired low surrogate {unit:#06x}");
                return None;
            };
            char::decode_utf16([high, unit])
                .next()
                .and_then(|decoded| decoded.ok())
                .map(|c| KeyPress::text(c.to_string()))
        }
        _ => {
            if let Some(stale) = pending.take() {
                log::warn!("Keyboard: dropping unpaired high surrogate {stale:#06x}");
            }
            char::from_u32(u32::from(unit)).map(|c| KeyPress::text(c.to_string()))
        }
    }
}
