/*
 * The thin OS interface the message handlers depend on. The Windows layer
 * implements it with `Win32Native`; tests use a recording fake. Every call here
 * is a fast window-system operation, and failures of cosmetic calls are ignored
 * by the implementation rather than surfaced.
 */
use crate::types::{NativeHandle, Point, Rect};

/// Vertical scrollbar metrics of a window (`SCROLLINFO` range/page/pos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub min: i32,
    pub max: i32,
    pub page: i32,
    pub pos: i32,
}

pub trait NativeOps {
    fn vertical_scroll_metrics(&self, window: NativeHandle) -> ScrollMetrics;
    fn set_vertical_scroll_metrics(&self, window: NativeHandle, metrics: ScrollMetrics);

    /// Invalidates `window` and its children so they repaint.
    fn request_repaint(&self, window: NativeHandle);
    /// Marks the update region of `window` as painted without drawing.
    fn validate(&self, window: NativeHandle);

    /// Maps `point` from the client space of `from` into the client space of `to`.
    fn map_point(&self, from: NativeHandle, to: NativeHandle, point: Point) -> Point;

    fn client_rect(&self, window: NativeHandle) -> Rect;
    fn window_rect(&self, window: NativeHandle) -> Rect;
    /// Width of a vertical scrollbar in pixels.
    fn vertical_scrollbar_width(&self) -> i32;
    /// Lines scrolled per wheel notch; `u32::MAX` means one page per notch.
    fn wheel_scroll_lines(&self) -> u32;

    fn focused_window(&self) -> NativeHandle;
    /// Native child id of a control window (`GetDlgCtrlID`).
    fn control_id_of(&self, window: NativeHandle) -> i32;

    fn kill_timer(&self, window: NativeHandle, id: i32);
    fn post_quit(&self);

    /// Starts a paint cycle and returns its device context (null on failure).
    fn begin_paint(&self, window: NativeHandle) -> NativeHandle;
    fn end_paint(&self, window: NativeHandle);
    /// Fills the client area of `window` with the system window colour.
    fn fill_background(&self, window: NativeHandle, dc: NativeHandle);
}
