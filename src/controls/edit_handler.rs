/*
 * Single-line and multi-line edit controls. Changes reach the owning window as
 * `EN_CHANGE`; text is read back in full, without a length cap.
 */
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, SlotId};
use crate::window_common::{hwnd, read_window_text, set_window_text};

use windows::Win32::{
    Foundation::HWND,
    UI::{
        Controls::WC_EDITW,
        WindowsAndMessaging::{
            ES_AUTOHSCROLL, ES_AUTOVSCROLL, ES_LEFT, ES_MULTILINE, ES_NOHIDESEL, ES_PASSWORD,
            ES_WANTRETURN, WINDOW_STYLE, WS_BORDER, WS_EX_TRANSPARENT, WS_TABSTOP,
        },
    },
};

pub(crate) fn create_edit_line(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
    text: &str,
    secret: bool,
) -> PlatformResult<HWND> {
    log::debug!("EditHandler: creating edit line for {object:?} in slot {slot:?} (secret: {secret})");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_EDITW,
            text: &to_native_line_endings(text),
            ex_style: WS_EX_TRANSPARENT,
            style: compute_edit_line_style(secret),
            kind: ControlKind::EditLine,
            default_font: true,
        },
    )
}

pub(crate) fn create_edit_box(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
    text: &str,
) -> PlatformResult<HWND> {
    log::debug!("EditHandler: creating edit box for {object:?} in slot {slot:?}");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_EDITW,
            text: &to_native_line_endings(text),
            ex_style: WS_EX_TRANSPARENT,
            style: compute_edit_box_style(),
            kind: ControlKind::EditBox,
            default_font: true,
        },
    )
}

/// Full text of the edit with native line breaks turned back into `\n`.
pub(crate) fn text(control: NativeHandle) -> String {
    read_window_text(hwnd(control)).replace("\r\n", "\n")
}

pub(crate) fn set_text(control: NativeHandle, text: &str) -> PlatformResult<()> {
    set_window_text(hwnd(control), &to_native_line_endings(text))
}

/// Converts `\n` line breaks into the `\r\n` pairs native controls display.
pub(crate) fn to_native_line_endings(text: &str) -> String {
    let mut converted = String::with_capacity(text.len());
    let mut previous = None;
    for ch in text.chars() {
        if ch == '\n' && previous != Some('\r') {
            converted.push('\r');
        }
        converted.push(ch);
        previous = Some(ch);
    }
    converted
}

fn compute_edit_line_style(secret: bool) -> WINDOW_STYLE {
    let mut style = WS_TABSTOP
        | WS_BORDER
        | WINDOW_STYLE(ES_LEFT as u32)
        | WINDOW_STYLE(ES_AUTOHSCROLL as u32);
    if secret {
        style |= WINDOW_STYLE(ES_PASSWORD as u32);
    }
    style
}

fn compute_edit_box_style() -> WINDOW_STYLE {
    WS_TABSTOP
        | WS_BORDER
        | WINDOW_STYLE(ES_LEFT as u32)
        | WINDOW_STYLE(ES_MULTILINE as u32)
        | WINDOW_STYLE(ES_AUTOVSCROLL as u32)
        | WINDOW_STYLE(ES_WANTRETURN as u32)
        | WINDOW_STYLE(ES_NOHIDESEL as u32)
}
