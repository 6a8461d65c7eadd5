/*
 * Progress bars. They never notify their parent, so they get no control id
 * and stay out of the slot's registry. Positions are percentages: a fraction
 * of 1.0 is position 100.
 */
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, Place, SlotId};
use crate::window_common::hwnd;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Controls::{PBM_GETPOS, PBM_SETPOS, PBS_SMOOTH, PROGRESS_CLASSW},
        WindowsAndMessaging::{SendMessageW, WINDOW_STYLE, WS_EX_TRANSPARENT},
    },
};

pub(crate) fn create_progress(
    runtime: &Runtime,
    slot: SlotId,
    place: Place,
) -> PlatformResult<HWND> {
    log::debug!("ProgressHandler: creating progress bar in slot {slot:?}");
    create_control(
        runtime,
        slot,
        None,
        place,
        ControlSpec {
            class: PROGRESS_CLASSW,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: WINDOW_STYLE(PBS_SMOOTH),
            kind: ControlKind::Progress,
            default_font: false,
        },
    )
}

pub(crate) fn fraction(control: NativeHandle) -> f64 {
    let position =
        unsafe { SendMessageW(hwnd(control), PBM_GETPOS, Some(WPARAM(0)), Some(LPARAM(0))) };
    position_to_fraction(position.0)
}

pub(crate) fn set_fraction(control: NativeHandle, fraction: f64) {
    unsafe {
        SendMessageW(
            hwnd(control),
            PBM_SETPOS,
            Some(WPARAM(fraction_to_position(fraction))),
            Some(LPARAM(0)),
        );
    }
}

/// Position for a fraction, truncated and kept within 0..=100.
pub(super) fn fraction_to_position(fraction: f64) -> usize {
    (fraction * 100.0).clamp(0.0, 100.0) as usize
}

pub(super) fn position_to_fraction(position: isize) -> f64 {
    position as f64 * 0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_scale_to_percent_positions() {
        assert_eq!(fraction_to_position(0.5), 50);
        assert_eq!(fraction_to_position(0.999), 99);
        assert_eq!(fraction_to_position(1.7), 100);
        assert_eq!(fraction_to_position(-0.2), 0);
    }

    #[test]
    fn positions_read_back_as_fractions() {
        assert!((position_to_fraction(25) - 0.25).abs() < 1e-9);
    }
}
