/*
 * Platform-agnostic types shared by the message handlers, the dispatcher and the
 * Windows layer. Keeping these free of Win32 types lets the message translation
 * logic compile and run its tests on every platform.
 *
 * Toolkit objects (controls, timers, canvases) are opaque to the backend: it only
 * ever holds an `ObjectRef` or id and hands it back through `AppEvent`s.
 */
use crate::surface::DrawingSurface;

/// Identifies an application (one top-level window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(pub u64);

/// Identifies a slot: the application's root region or a nested canvas window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

/// Identifies a toolkit canvas bound 1:1 to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(pub u64);

/// Opaque reference to a toolkit object (control, timer, surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u64);

/// Native child-window id handed to the OS (`HMENU` slot of `CreateWindowExW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(i32);

impl ControlId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

/// Id of a timer in its application's extras list, also used as the native timer id.
pub type TimerId = ControlId;

/// Raw native window or device-context handle, stored as its pointer bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeHandle(pub isize);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Toolkit placement of an element inside its parent canvas: inner position,
/// computed offset and inner dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Place {
    pub ix: i32,
    pub iy: i32,
    pub dx: i32,
    pub dy: i32,
    pub iw: i32,
    pub ih: i32,
}

impl Place {
    pub fn left(&self) -> i32 {
        self.ix + self.dx
    }

    pub fn top(&self) -> i32 {
        self.iy + self.dy
    }
}

/// Mouse buttons with the numbering the toolkit expects (left 1, right 2, middle 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn number(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 3,
        }
    }
}

/// Modifier keys currently held, as tracked from key down/up messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Keys the toolkit knows by symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Backspace,
    Tab,
    Escape,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    F(u8),
}

impl NamedKey {
    pub fn name(self) -> String {
        match self {
            NamedKey::Backspace => "backspace".into(),
            NamedKey::Tab => "tab".into(),
            NamedKey::Escape => "escape".into(),
            NamedKey::Insert => "insert".into(),
            NamedKey::Delete => "delete".into(),
            NamedKey::PageUp => "page_up".into(),
            NamedKey::PageDown => "page_down".into(),
            NamedKey::Home => "home".into(),
            NamedKey::End => "end".into(),
            NamedKey::Left => "left".into(),
            NamedKey::Up => "up".into(),
            NamedKey::Right => "right".into(),
            NamedKey::Down => "down".into(),
            NamedKey::F(n) => format!("f{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Named(NamedKey),
    Text(String),
}

/// A key press as delivered to the toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn named(key: NamedKey) -> Self {
        Self {
            key: Key::Named(key),
            modifiers: Modifiers::default(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            key: Key::Text(text.into()),
            modifiers: Modifiers::default(),
        }
    }

    /// Whether the toolkit receives this press as a symbol rather than a string.
    pub fn is_symbol(&self) -> bool {
        match &self.key {
            Key::Named(_) => true,
            Key::Text(_) => self.modifiers != Modifiers::default(),
        }
    }

    /// Name with modifier qualifiers, e.g. `control_shift_alt_f1` or `alt_a`.
    /// Unqualified text is returned as-is.
    pub fn qualified_name(&self) -> String {
        let base = match &self.key {
            Key::Named(named) => named.name(),
            Key::Text(text) => text.clone(),
        };
        let mut name = base;
        // Each held modifier prefixes the name, applied alt, then shift, then control.
        if self.modifiers.alt {
            name = format!("alt_{name}");
        }
        if self.modifiers.shift {
            name = format!("shift_{name}");
        }
        if self.modifiers.control {
            name = format!("control_{name}");
        }
        name
    }
}

/// Pointer shapes the toolkit can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Arrow,
    Hand,
    Text,
}

/// Kinds of native controls hosted inside a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    EditLine,
    EditBox,
    ListBox,
    Progress,
    Slider,
    CheckBox,
    RadioButton,
    Surface,
}

/// Kinds of per-application auxiliary objects addressed through the extras list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraKind {
    /// Fires once; the platform timer is cancelled before delivery.
    OneShotTimer,
    /// Fires every interval until removed.
    RepeatingTimer,
}

/// Events delivered to the toolkit. Coordinates are application-logical:
/// client coordinates of the application window plus the scroll offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Click {
        app: AppId,
        button: MouseButton,
        x: i32,
        y: i32,
    },
    Release {
        app: AppId,
        button: MouseButton,
        x: i32,
        y: i32,
    },
    Motion {
        app: AppId,
        x: i32,
        y: i32,
    },
    Keypress {
        app: AppId,
        key: KeyPress,
    },
    ControlClicked {
        control: ObjectRef,
    },
    ControlChanged {
        control: ObjectRef,
    },
    /// A slot regained focus and asks the toolkit to refocus its last control.
    FocusRequested {
        control: ObjectRef,
    },
    CanvasResized {
        canvas: CanvasId,
        width: i32,
        height: i32,
    },
    TimerFired {
        app: AppId,
        timer: ObjectRef,
    },
}

/// The toolkit side of the backend: receives translated events and paints canvases.
pub trait PlatformEventHandler {
    fn handle_event(&mut self, event: AppEvent);

    /// Draws `canvas` onto a surface already translated by the slot's scroll offset.
    fn paint_canvas(&mut self, canvas: CanvasId, surface: &mut dyn DrawingSurface);

    /// Removes `app` from the process-wide application list; returns `true`
    /// if it was the last one.
    fn remove_application(&mut self, app: AppId) -> bool;

    /// Messages posted to the hidden sink window, `name` relative to the sink base.
    fn handle_host_message(&mut self, name: u32, wparam: usize, lparam: isize) -> isize {
        log::trace!("Unhandled host message {name} ({wparam}, {lparam})");
        0
    }
}

/// Per-application window configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub resizable: bool,
    pub fullscreen: bool,
    /// Dialog-style edge instead of a client edge.
    pub dialog: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Slot Application".to_string(),
            width: 600,
            height: 500,
            min_width: 100,
            min_height: 100,
            resizable: true,
            fullscreen: false,
            dialog: false,
        }
    }
}

/// Backend-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Prefix for the registered window class names.
    pub class_prefix: String,
    /// Upper bound on the idle wait of the event loop when the queue is empty.
    pub idle_wait: std::time::Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            class_prefix: "Slotwin".to_string(),
            idle_wait: std::time::Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_orders_modifiers_control_shift_alt() {
        let press = KeyPress {
            key: Key::Named(NamedKey::F(1)),
            modifiers: Modifiers {
                control: true,
                shift: true,
                alt: true,
            },
        };
        assert_eq!(press.qualified_name(), "control_shift_alt_f1");
        assert!(press.is_symbol());
    }

    #[test]
    fn plain_text_is_not_a_symbol() {
        let press = KeyPress::text("a");
        assert!(!press.is_symbol());
        assert_eq!(press.qualified_name(), "a");
    }

    #[test]
    fn mouse_buttons_use_toolkit_numbering() {
        assert_eq!(MouseButton::Left.number(), 1);
        assert_eq!(MouseButton::Right.number(), 2);
        assert_eq!(MouseButton::Middle.number(), 3);
    }

    #[test]
    fn place_offsets_add_inner_and_computed_positions() {
        let place = Place {
            ix: 10,
            iy: 20,
            dx: 3,
            dy: 4,
            iw: 50,
            ih: 60,
        };
        assert_eq!(place.left(), 13);
        assert_eq!(place.top(), 24);
    }
}
