/*
 * Decoded window messages and the outcome a handler hands back to the
 * dispatcher. The Windows layer turns `(msg, wparam, lparam)` into a
 * `WindowMessage`; the handlers never see raw parameters, which keeps them
 * portable and testable.
 */
use crate::scroll::ScrollAction;
use crate::types::{AppEvent, AppId, MouseButton, NativeHandle, Point, SlotId};

pub const WM_DESTROY: u32 = 0x0002;
pub const WM_ACTIVATE: u32 = 0x0006;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_ERASEBKGND: u32 = 0x0014;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_COMMAND: u32 = 0x0111;
pub const WM_TIMER: u32 = 0x0113;
pub const WM_HSCROLL: u32 = 0x0114;
pub const WM_VSCROLL: u32 = 0x0115;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MOUSEWHEEL: u32 = 0x020A;

/// Base of the message range the hidden sink window forwards to the toolkit
/// (`WM_APP + 0x200`).
pub const WM_APP_HOST_MESSAGE: u32 = 0x8000 + 0x200;
/// Number of message ids reserved above `WM_APP_HOST_MESSAGE`.
pub const HOST_MESSAGE_LIMIT: u32 = 0x100;

const SB_LINEUP: u16 = 0;
const SB_LINEDOWN: u16 = 1;
const SB_PAGEUP: u16 = 2;
const SB_PAGEDOWN: u16 = 3;
const SB_THUMBTRACK: u16 = 5;
/// Trackbar notification sent while the thumb is dragged.
const TB_THUMBTRACK: u16 = 5;
const WA_INACTIVE: u16 = 0;

/// `BN_CLICKED` notification code.
pub const BN_CLICKED: u16 = 0;
/// `CBN_SELCHANGE` notification code.
pub const CBN_SELCHANGE: u16 = 1;
/// `EN_CHANGE` notification code.
pub const EN_CHANGE: u16 = 0x0300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    EraseBackground,
    Paint,
    VScroll(ScrollAction),
    /// Horizontal scroll notification from a child control such as a trackbar.
    HScroll {
        thumb_track: bool,
        control: NativeHandle,
    },
    ButtonDown {
        button: MouseButton,
        point: Point,
    },
    ButtonUp {
        button: MouseButton,
        point: Point,
    },
    MouseMove {
        point: Point,
    },
    Activate {
        inactive: bool,
    },
    SetFocus,
    /// `WM_COMMAND`: notification code, child id and child window.
    Command {
        notification: u16,
        id: i32,
        control: NativeHandle,
    },
    Destroy,
    GetMinMaxInfo,
    Char(u16),
    KeyDown {
        vk: u16,
        system: bool,
    },
    KeyUp {
        vk: u16,
    },
    MouseWheel {
        delta: i32,
    },
    Timer {
        id: usize,
    },
    Other,
}

/// What the window procedure returns to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageResult {
    Handled(isize),
    /// Fall through to `DefWindowProcW`.
    Default,
    /// Minimum tracking size to write into the `MINMAXINFO`; returns 0.
    MinTrackSize { width: i32, height: i32 },
}

/// The work a handler leaves for the dispatcher once state is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOutcome {
    pub events: Vec<AppEvent>,
    /// Slot to run a paint cycle on after the events are delivered.
    pub paint: Option<SlotId>,
    /// Application whose window was destroyed.
    pub destroyed: Option<AppId>,
    pub result: MessageResult,
}

impl MessageOutcome {
    pub fn default_processing() -> Self {
        Self::with_result(MessageResult::Default)
    }

    pub fn handled(value: isize) -> Self {
        Self::with_result(MessageResult::Handled(value))
    }

    pub fn with_result(result: MessageResult) -> Self {
        Self {
            events: Vec::new(),
            paint: None,
            destroyed: None,
            result,
        }
    }

    pub fn event(mut self, event: AppEvent) -> Self {
        self.events.push(event);
        self
    }
}

/*
 * Decodes a raw window message. Messages no handler looks at become
 * `WindowMessage::Other` and go straight to default processing.
 */
pub fn decode(msg: u32, wparam: usize, lparam: isize) -> WindowMessage {
    match msg {
        WM_ERASEBKGND => WindowMessage::EraseBackground,
        WM_PAINT => WindowMessage::Paint,
        WM_VSCROLL => WindowMessage::VScroll(scroll_action(loword(wparam), hiword(wparam))),
        WM_HSCROLL => WindowMessage::HScroll {
            thumb_track: loword(wparam) == TB_THUMBTRACK,
            control: NativeHandle(lparam),
        },
        WM_LBUTTONDOWN => button_down(MouseButton::Left, lparam),
        WM_RBUTTONDOWN => button_down(MouseButton::Right, lparam),
        WM_MBUTTONDOWN => button_down(MouseButton::Middle, lparam),
        WM_LBUTTONUP => button_up(MouseButton::Left, lparam),
        WM_RBUTTONUP => button_up(MouseButton::Right, lparam),
        WM_MBUTTONUP => button_up(MouseButton::Middle, lparam),
        WM_MOUSEMOVE => WindowMessage::MouseMove {
            point: point_from_lparam(lparam),
        },
        WM_ACTIVATE => WindowMessage::Activate {
            inactive: loword(wparam) == WA_INACTIVE,
        },
        WM_SETFOCUS => WindowMessage::SetFocus,
        WM_COMMAND => WindowMessage::Command {
            notification: hiword(wparam),
            id: i32::from(loword(wparam)),
            control: NativeHandle(lparam),
        },
        WM_DESTROY => WindowMessage::Destroy,
        WM_GETMINMAXINFO => WindowMessage::GetMinMaxInfo,
        WM_CHAR => WindowMessage::Char(loword(wparam)),
        WM_KEYDOWN | WM_SYSKEYDOWN => WindowMessage::KeyDown {
            vk: loword(wparam),
            system: msg == WM_SYSKEYDOWN,
        },
        WM_KEYUP | WM_SYSKEYUP => WindowMessage::KeyUp { vk: loword(wparam) },
        WM_MOUSEWHEEL => WindowMessage::MouseWheel {
            delta: wheel_delta(wparam),
        },
        WM_TIMER => WindowMessage::Timer { id: wparam },
        _ => WindowMessage::Other,
    }
}

/// Host message name carried by `msg`, when it lies strictly inside the host range.
pub fn host_message_name(msg: u32) -> Option<u32> {
    let name = msg.checked_sub(WM_APP_HOST_MESSAGE)?;
    (name > 0 && name < HOST_MESSAGE_LIMIT).then_some(name)
}

pub fn scroll_action(code: u16, pos: u16) -> ScrollAction {
    match code {
        SB_LINEUP => ScrollAction::LineUp,
        SB_LINEDOWN => ScrollAction::LineDown,
        SB_PAGEUP => ScrollAction::PageUp,
        SB_PAGEDOWN => ScrollAction::PageDown,
        SB_THUMBTRACK => ScrollAction::ThumbTrack(i32::from(pos)),
        other => ScrollAction::Other(u32::from(other)),
    }
}

fn button_down(button: MouseButton, lparam: isize) -> WindowMessage {
    WindowMessage::ButtonDown {
        button,
        point: point_from_lparam(lparam),
    }
}

fn button_up(button: MouseButton, lparam: isize) -> WindowMessage {
    WindowMessage::ButtonUp {
        button,
        point: point_from_lparam(lparam),
    }
}

pub fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

pub fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

/// Signed client coordinates packed into an lparam.
pub fn point_from_lparam(lparam: isize) -> Point {
    let raw = lparam as usize;
    Point::new(
        i32::from(loword(raw) as i16),
        i32::from(hiword(raw) as i16),
    )
}

/// Signed wheel delta from the high word of a `WM_MOUSEWHEEL` wparam.
pub fn wheel_delta(wparam: usize) -> i32 {
    i32::from(hiword(wparam) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_split_low_and_high_halves() {
        assert_eq!(loword(0x1234_5678), 0x5678);
        assert_eq!(hiword(0x1234_5678), 0x1234);
    }

    #[test]
    fn lparam_points_are_sign_extended() {
        let lparam = ((0xFFFEusize << 16) | 0x0005) as isize;
        assert_eq!(point_from_lparam(lparam), Point::new(5, -2));
    }

    #[test]
    fn negative_wheel_delta_is_decoded() {
        let wparam = ((-360i16 as u16 as usize) << 16) | 0x0008;
        assert_eq!(wheel_delta(wparam), -360);
    }

    #[test]
    fn outcome_builder_collects_events() {
        let outcome = MessageOutcome::handled(1).event(AppEvent::ControlClicked {
            control: crate::types::ObjectRef(3),
        });
        assert_eq!(outcome.result, MessageResult::Handled(1));
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn decodes_command_parts() {
        let wparam = (usize::from(EN_CHANGE) << 16) | 10002;
        assert_eq!(
            decode(WM_COMMAND, wparam, 0x4242),
            WindowMessage::Command {
                notification: EN_CHANGE,
                id: 10002,
                control: NativeHandle(0x4242),
            }
        );
    }

    #[test]
    fn decodes_system_key_down_and_key_up() {
        assert_eq!(
            decode(WM_SYSKEYDOWN, 0x41, 0),
            WindowMessage::KeyDown {
                vk: 0x41,
                system: true
            }
        );
        assert_eq!(decode(WM_SYSKEYUP, 0x12, 0), WindowMessage::KeyUp { vk: 0x12 });
    }

    #[test]
    fn decodes_vertical_scroll_thumb_position() {
        let wparam = (300usize << 16) | usize::from(SB_THUMBTRACK);
        assert_eq!(
            decode(WM_VSCROLL, wparam, 0),
            WindowMessage::VScroll(ScrollAction::ThumbTrack(300))
        );
        assert_eq!(scroll_action(8, 0), ScrollAction::Other(8));
    }

    #[test]
    fn decodes_activation_state() {
        assert_eq!(
            decode(WM_ACTIVATE, 0, 0),
            WindowMessage::Activate { inactive: true }
        );
        assert_eq!(
            decode(WM_ACTIVATE, 1, 0),
            WindowMessage::Activate { inactive: false }
        );
    }

    #[test]
    fn host_range_excludes_its_bounds() {
        assert_eq!(host_message_name(WM_APP_HOST_MESSAGE), None);
        assert_eq!(host_message_name(WM_APP_HOST_MESSAGE + 3), Some(3));
        assert_eq!(host_message_name(WM_APP_HOST_MESSAGE + HOST_MESSAGE_LIMIT), None);
        assert_eq!(host_message_name(WM_PAINT), None);
    }

    #[test]
    fn unknown_messages_decode_to_other() {
        assert_eq!(decode(0x0400, 0, 0), WindowMessage::Other);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn message_ids_match_windows_values() {
        use windows::Win32::UI::WindowsAndMessaging as wm;
        let pairs = [
            (WM_DESTROY, wm::WM_DESTROY),
            (WM_ACTIVATE, wm::WM_ACTIVATE),
            (WM_SETFOCUS, wm::WM_SETFOCUS),
            (WM_PAINT, wm::WM_PAINT),
            (WM_ERASEBKGND, wm::WM_ERASEBKGND),
            (WM_GETMINMAXINFO, wm::WM_GETMINMAXINFO),
            (WM_KEYDOWN, wm::WM_KEYDOWN),
            (WM_KEYUP, wm::WM_KEYUP),
            (WM_CHAR, wm::WM_CHAR),
            (WM_SYSKEYDOWN, wm::WM_SYSKEYDOWN),
            (WM_SYSKEYUP, wm::WM_SYSKEYUP),
            (WM_COMMAND, wm::WM_COMMAND),
            (WM_TIMER, wm::WM_TIMER),
            (WM_HSCROLL, wm::WM_HSCROLL),
            (WM_VSCROLL, wm::WM_VSCROLL),
            (WM_MOUSEMOVE, wm::WM_MOUSEMOVE),
            (WM_LBUTTONDOWN, wm::WM_LBUTTONDOWN),
            (WM_LBUTTONUP, wm::WM_LBUTTONUP),
            (WM_RBUTTONDOWN, wm::WM_RBUTTONDOWN),
            (WM_RBUTTONUP, wm::WM_RBUTTONUP),
            (WM_MBUTTONDOWN, wm::WM_MBUTTONDOWN),
            (WM_MBUTTONUP, wm::WM_MBUTTONUP),
            (WM_MOUSEWHEEL, wm::WM_MOUSEWHEEL),
        ];
        for (ours, theirs) in pairs {
            assert_eq!(ours, theirs);
        }
        assert_eq!(WM_APP_HOST_MESSAGE, wm::WM_APP + 0x200);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn notification_codes_match_windows_values() {
        use windows::Win32::UI::WindowsAndMessaging as wm;
        assert_eq!(i64::from(BN_CLICKED), wm::BN_CLICKED as i64);
        assert_eq!(i64::from(CBN_SELCHANGE), wm::CBN_SELCHANGE as i64);
        assert_eq!(i64::from(EN_CHANGE), wm::EN_CHANGE as i64);
    }
}
