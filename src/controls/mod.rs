/*
 * Native controls hosted by slots. `create_control` holds the creation
 * sequence every control shares: read the parent window and the next free id,
 * create the child without holding any state borrow, then register it. The
 * per-kind handlers choose class and styles and implement value operations.
 *
 * Operations act on the native handle returned at creation; only creation and
 * removal touch the slot's registry.
 */
pub(crate) mod button_handler;
pub(crate) mod checkbox_handler;
pub(crate) mod combobox_handler;
pub(crate) mod edit_handler;
pub(crate) mod progress_handler;
pub(crate) mod radiobutton_handler;
pub(crate) mod slider_handler;
pub(crate) mod surface_handler;

use crate::app::Runtime;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::scroll::control_reposition;
use crate::state::ControlEntry;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, Rect, SlotId};
use crate::window_common::{apply_default_font, hwnd, native_handle, raise_without_redraw};

use std::ffi::c_void;
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Input::KeyboardAndMouse::{EnableWindow, GetFocus, SetFocus},
        WindowsAndMessaging::{
            CreateWindowExW, DestroyWindow, HMENU, MoveWindow, SW_HIDE, SW_SHOW, SendMessageW,
            ShowWindow, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WS_VISIBLE,
        },
    },
};
use windows::core::{HSTRING, PCWSTR};

const EM_SETREADONLY: u32 = 0x00CF;

/// Class, styles and registration details of a control about to be created.
pub(crate) struct ControlSpec<'a> {
    pub(crate) class: PCWSTR,
    pub(crate) text: &'a str,
    pub(crate) ex_style: WINDOW_EX_STYLE,
    /// Added to `WS_CHILD | WS_VISIBLE`.
    pub(crate) style: WINDOW_STYLE,
    pub(crate) kind: ControlKind,
    pub(crate) default_font: bool,
}

/*
 * Creates a control as a child of the slot's window at `place`. With an
 * `object` the control is registered and gets the slot's next id as its native
 * id; without one it has neither.
 */
pub(crate) fn create_control(
    runtime: &Runtime,
    slot: SlotId,
    object: Option<ObjectRef>,
    place: Place,
    spec: ControlSpec<'_>,
) -> PlatformResult<HWND> {
    let (parent, expected_id) = {
        let state = runtime.state().borrow();
        let parent = state.slot(slot)?.window;
        let id = match object {
            Some(_) => Some(state.next_control_id(slot)?),
            None => None,
        };
        (parent, id)
    };
    if parent.is_null() {
        return Err(PlatformError::InvalidHandle(format!(
            "Slot {slot:?} has no window to host a {:?}",
            spec.kind
        )));
    }

    let hwnd_control = unsafe {
        CreateWindowExW(
            spec.ex_style,
            spec.class,
            &HSTRING::from(spec.text),
            WS_CHILD | WS_VISIBLE | spec.style,
            place.left(),
            place.top(),
            place.iw,
            place.ih,
            Some(hwnd(parent)),
            expected_id.map(|id| HMENU(id.raw() as isize as *mut c_void)),
            Some(runtime.h_instance()),
            None,
        )?
    };
    raise_without_redraw(hwnd_control);
    if spec.default_font {
        apply_default_font(hwnd_control);
    }

    if let (Some(object), Some(expected)) = (object, expected_id) {
        let entry = ControlEntry {
            object,
            handle: native_handle(hwnd_control),
            kind: spec.kind,
        };
        let registered = runtime.state().borrow_mut().register_control(slot, entry);
        match registered {
            Ok(id) if id == expected => {}
            Ok(id) => {
                log::warn!(
                    "Controls: {:?} {object:?} registered as ID {} but was created with ID {}; discarding",
                    spec.kind,
                    id.raw(),
                    expected.raw()
                );
                runtime.state().borrow_mut().remove_item(slot, object);
                unsafe { DestroyWindow(hwnd_control).ok() };
                return Err(PlatformError::OperationFailed(format!(
                    "Control ID {} was taken while {object:?} was being created",
                    expected.raw()
                )));
            }
            Err(err) => {
                unsafe { DestroyWindow(hwnd_control).ok() };
                return Err(err);
            }
        }
    }

    log::debug!(
        "Controls: created {:?} for {object:?} in slot {slot:?} (ID {:?}, HWND {hwnd_control:?})",
        spec.kind,
        expected_id.map(|id| id.raw())
    );
    Ok(hwnd_control)
}

pub(crate) fn hide(control: NativeHandle) {
    unsafe {
        let _ = ShowWindow(hwnd(control), SW_HIDE);
    }
}

pub(crate) fn show(control: NativeHandle) {
    unsafe {
        let _ = ShowWindow(hwnd(control), SW_SHOW);
    }
}

fn move_to(control: NativeHandle, bounds: Rect) {
    if let Err(err) = unsafe {
        MoveWindow(
            hwnd(control),
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            true,
        )
    } {
        log::trace!("Controls: MoveWindow failed for {control:?}: {err:?}");
    }
}

/// Moves a control to its layout place, unscrolled.
pub(crate) fn position(control: NativeHandle, place: Place) {
    move_to(
        control,
        Rect {
            left: place.left(),
            top: place.top(),
            right: place.left() + place.iw,
            bottom: place.top() + place.ih,
        },
    );
}

/// Follows the slot's scroll offset; `shown` is where the control was last placed.
pub(crate) fn repaint(control: NativeHandle, shown: Place, place: Place, scrolly: i32) {
    if let Some(bounds) = control_reposition(shown, place, scrolly) {
        move_to(control, bounds);
    }
}

/// Enables or disables the control and toggles the read-only state of edits.
pub(crate) fn set_state(control: NativeHandle, enabled: bool, editable: bool) {
    unsafe {
        let _ = EnableWindow(hwnd(control), enabled);
        SendMessageW(
            hwnd(control),
            EM_SETREADONLY,
            Some(WPARAM(usize::from(!editable))),
            Some(LPARAM(0)),
        );
    }
}

pub(crate) fn focus(control: NativeHandle) {
    if let Err(err) = unsafe { SetFocus(Some(hwnd(control))) } {
        log::trace!("Controls: SetFocus failed for {control:?}: {err:?}");
    }
}

/// Destroys a control window, first handing focus back to the application
/// window if the control holds it.
pub(crate) fn destroy(control: NativeHandle, app_window: NativeHandle) {
    unsafe {
        if GetFocus() == hwnd(control) {
            let _ = SetFocus(Some(hwnd(app_window)));
        }
        if let Err(err) = DestroyWindow(hwnd(control)) {
            log::trace!("Controls: DestroyWindow failed for {control:?}: {err:?}");
        }
    }
}
