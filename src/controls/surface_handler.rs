/*
 * Generic child surfaces: plain child windows of the surface class for
 * external renderers (video, for instance) to draw into. They are registered
 * like controls so their ids stay in step with the slot's registry.
 */
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, ObjectRef, Place, SlotId};

use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{WS_EX_TRANSPARENT, WS_TABSTOP},
};
use windows::core::PCWSTR;

pub(crate) fn create_surface(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
) -> PlatformResult<HWND> {
    log::debug!("SurfaceHandler: creating child surface for {object:?} in slot {slot:?}");
    let class = PCWSTR(runtime.classes().surface.as_ptr());
    create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: WS_TABSTOP,
            kind: ControlKind::Surface,
            default_font: false,
        },
    )
}
