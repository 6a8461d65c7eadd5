/*
 * List boxes, realised as drop-down list combo boxes. Items are plain strings;
 * the toolkit maps the active index back to its own item objects.
 */
use super::edit_handler::to_native_line_endings;
use super::{ControlSpec, create_control};
use crate::app::Runtime;
use crate::error::Result as PlatformResult;
use crate::types::{ControlKind, NativeHandle, ObjectRef, Place, SlotId};
use crate::window_common::{hwnd, native_handle};

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{
        SendMessageW, WINDOW_STYLE, WS_BORDER, WS_EX_TRANSPARENT, WS_TABSTOP, WS_VSCROLL,
    },
};
use windows::core::{HSTRING, PCWSTR};

const WC_COMBOBOX: PCWSTR = windows::core::w!("COMBOBOX");

// ComboBox styles
const CBS_DROPDOWNLIST: u32 = 0x0003;

// ComboBox messages
const CB_RESETCONTENT: u32 = 0x014B;
const CB_ADDSTRING: u32 = 0x0143;
const CB_SETCURSEL: u32 = 0x014E;
const CB_GETCURSEL: u32 = 0x0147;
const CB_ERR: isize = -1;

pub(crate) fn create_list_box(
    runtime: &Runtime,
    slot: SlotId,
    object: ObjectRef,
    place: Place,
    items: &[String],
) -> PlatformResult<HWND> {
    log::debug!(
        "ComboBoxHandler: creating list box with {} item(s) for {object:?} in slot {slot:?}",
        items.len()
    );
    let hwnd_combo = create_control(
        runtime,
        slot,
        Some(object),
        place,
        ControlSpec {
            class: WC_COMBOBOX,
            text: "",
            ex_style: WS_EX_TRANSPARENT,
            style: WS_TABSTOP | WS_BORDER | WS_VSCROLL | WINDOW_STYLE(CBS_DROPDOWNLIST),
            kind: ControlKind::ListBox,
            default_font: true,
        },
    )?;
    if !items.is_empty() {
        update_items(native_handle(hwnd_combo), items);
    }
    Ok(hwnd_combo)
}

/// Replaces every item of the list.
pub(crate) fn update_items(control: NativeHandle, items: &[String]) {
    let hwnd_combo = hwnd(control);
    unsafe {
        SendMessageW(hwnd_combo, CB_RESETCONTENT, Some(WPARAM(0)), Some(LPARAM(0)));
    }
    for item in items {
        let h_item = HSTRING::from(to_native_line_endings(item).as_str());
        unsafe {
            SendMessageW(
                hwnd_combo,
                CB_ADDSTRING,
                Some(WPARAM(0)),
                Some(LPARAM(h_item.as_ptr() as isize)),
            );
        }
    }
    log::trace!("ComboBoxHandler: {} item(s) set on {control:?}", items.len());
}

/// Index of the selected item, `None` when nothing is selected.
pub(crate) fn active_index(control: NativeHandle) -> Option<usize> {
    let result =
        unsafe { SendMessageW(hwnd(control), CB_GETCURSEL, Some(WPARAM(0)), Some(LPARAM(0))) };
    selection_from_raw(result.0)
}

pub(crate) fn set_active_index(control: NativeHandle, index: usize) {
    let result = unsafe {
        SendMessageW(
            hwnd(control),
            CB_SETCURSEL,
            Some(WPARAM(index)),
            Some(LPARAM(0)),
        )
    };
    if result.0 == CB_ERR {
        log::warn!("ComboBoxHandler: CB_SETCURSEL rejected index {index} on {control:?}");
    }
}

fn selection_from_raw(raw: isize) -> Option<usize> {
    if raw < 0 { None } else { Some(raw as usize) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_selection_maps_to_none() {
        assert_eq!(selection_from_raw(CB_ERR), None);
    }

    #[test]
    fn selected_index_maps_to_some() {
        assert_eq!(selection_from_raw(5), Some(5));
    }
}
