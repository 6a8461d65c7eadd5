/*
 * Push buttons. A click reaches the owning window as `BN_CLICKED` inside
 * `WM_COMMAND` and is resolved to the toolkit object through the slot's
 * control registry.
 */
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, ObjectRef, Place, SlotId};

use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{
        BS_PUSHBUTTON, WINDOW_STYLE, WS_EX_NOPARENTNOTIFY, WS_TABSTOP,
    },
};
use windows::core::PCWSTR;

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

pub(crate) fn create_button(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
    text: &str,
) -> PlatformResult<HWND> {
    log::debug!("ButtonHandler: creating button '{text}' for {object:?} in slot {slot:?}");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_BUTTON,
            text,
            ex_style: WS_EX_NOPARENTNOTIFY,
            style: compute_button_style(),
            kind: ControlKind::Button,
            default_font: true,
        },
    )
}

fn compute_button_style() -> WINDOW_STYLE {
    WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_take_part_in_tab_navigation() {
        assert!(compute_button_style().0 & WS_TABSTOP.0 != 0);
    }
}
