/*
 * Check boxes (`BS_AUTOCHECKBOX`): the control toggles itself, the backend
 * only reads and writes the checked state.
 */
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, SlotId};
use crate::window_common::hwnd;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Controls::{BST_CHECKED, BST_UNCHECKED},
        WindowsAndMessaging::{
            BM_GETCHECK, BM_SETCHECK, BS_AUTOCHECKBOX, SendMessageW, WINDOW_STYLE,
            WS_EX_TRANSPARENT, WS_TABSTOP,
        },
    },
};
use windows::core::PCWSTR;

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

pub(crate) fn create_check(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
) -> PlatformResult<HWND> {
    log::debug!("CheckBoxHandler: creating check box for {object:?} in slot {slot:?}");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_BUTTON,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: compute_checkbox_style(),
            kind: ControlKind::CheckBox,
            default_font: true,
        },
    )
}

/// Reads the check state via `BM_GETCHECK`; indeterminate counts as unchecked.
pub(crate) fn is_checked(control: NativeHandle) -> bool {
    let result = unsafe { SendMessageW(hwnd(control), BM_GETCHECK, None, None) };
    result.0 as u32 == BST_CHECKED.0
}

pub(crate) fn set_checked(control: NativeHandle, checked: bool) {
    unsafe {
        SendMessageW(
            hwnd(control),
            BM_SETCHECK,
            Some(WPARAM(win32_check_state(checked))),
            Some(LPARAM(0)),
        );
    }
}

fn compute_checkbox_style() -> WINDOW_STYLE {
    WS_TABSTOP | WINDOW_STYLE(BS_AUTOCHECKBOX as u32)
}

pub(super) fn win32_check_state(checked: bool) -> usize {
    if checked {
        BST_CHECKED.0 as usize
    } else {
        BST_UNCHECKED.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_style_toggles_itself() {
        let style = compute_checkbox_style();
        assert!(style.0 & (BS_AUTOCHECKBOX as u32) != 0);
        assert!(style.0 & WS_TABSTOP.0 != 0);
    }

    #[test]
    fn checked_state_maps_to_button_states() {
        assert_eq!(win32_check_state(true), 1);
        assert_eq!(win32_check_state(false), 0);
    }
}
