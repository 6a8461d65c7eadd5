/*
 * Radio buttons. They use `BS_RADIOBUTTON`, not the automatic variant: the
 * toolkit owns group semantics and sets the check state itself, so reading
 * and writing it goes through the check box helpers.
 */
use super::checkbox_handler;
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, SlotId};

use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{BS_RADIOBUTTON, WINDOW_STYLE, WS_EX_TRANSPARENT, WS_TABSTOP},
};
use windows::core::PCWSTR;

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

pub(crate) fn create_radio(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
) -> PlatformResult<HWND> {
    log::debug!("RadioButtonHandler: creating radio button for {object:?} in slot {slot:?}");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_BUTTON,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: compute_radio_style(),
            kind: ControlKind::RadioButton,
            default_font: true,
        },
    )
}

pub(crate) fn is_selected(control: NativeHandle) -> bool {
    checkbox_handler::is_checked(control)
}

pub(crate) fn set_selected(control: NativeHandle, selected: bool) {
    checkbox_handler::set_checked(control, selected);
}

fn compute_radio_style() -> WINDOW_STYLE {
    WS_TABSTOP | WINDOW_STYLE(BS_RADIOBUTTON as u32)
}
