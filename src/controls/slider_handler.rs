/*
 * Sliders (trackbars). Dragging the thumb sends `WM_HSCROLL` with
 * `TB_THUMBTRACK` to the owning window, which resolves the slider by its id.
 * Values use the same percent scale as progress bars.
 */
use super::progress_handler::{fraction_to_position, position_to_fraction};
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, SlotId};
use crate::window_common::hwnd;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Controls::{TBM_GETPOS, TBM_SETPOS, TRACKBAR_CLASSW},
        WindowsAndMessaging::{SendMessageW, WINDOW_STYLE, WS_EX_TRANSPARENT},
    },
};

pub(crate) fn create_slider(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
) -> PlatformResult<HWND> {
    log::debug!("SliderHandler: creating slider for {object:?} in slot {slot:?}");
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: TRACKBAR_CLASSW,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: WINDOW_STYLE(0),
            kind: ControlKind::Slider,
            default_font: false,
        },
    )
}

pub(crate) fn fraction(control: NativeHandle) -> f64 {
    let position =
        unsafe { SendMessageW(hwnd(control), TBM_GETPOS, Some(WPARAM(0)), Some(LPARAM(0))) };
    position_to_fraction(position.0)
}

/// Moves the thumb and redraws the trackbar.
pub(crate) fn set_fraction(control: NativeHandle, fraction: f64) {
    unsafe {
        SendMessageW(
            hwnd(control),
            TBM_SETPOS,
            Some(WPARAM(1)),
            Some(LPARAM(fraction_to_position(fraction) as isize)),
        );
    }
}
