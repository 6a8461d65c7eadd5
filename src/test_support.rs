/*
 * Recording fake of `NativeOps` plus a collecting event handler, used by the
 * portable unit tests. Window origins stand in for screen positions so point
 * mapping behaves like ClientToScreen/ScreenToClient.
 */
use crate::native::{NativeOps, ScrollMetrics};
use crate::surface::{DrawingSurface, SurfaceProvider};
use crate::types::{AppEvent, AppId, CanvasId, NativeHandle, Point, PlatformEventHandler, Rect};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct FakeNative {
    scroll: RefCell<HashMap<NativeHandle, ScrollMetrics>>,
    origins: RefCell<HashMap<NativeHandle, Point>>,
    client_rects: RefCell<HashMap<NativeHandle, Rect>>,
    window_rects: RefCell<HashMap<NativeHandle, Rect>>,
    control_ids: RefCell<HashMap<NativeHandle, i32>>,
    repaints: RefCell<Vec<NativeHandle>>,
    validated: RefCell<Vec<NativeHandle>>,
    killed_timers: RefCell<Vec<(NativeHandle, i32)>>,
    calls: RefCell<Vec<String>>,
    focused: Cell<NativeHandle>,
    wheel_lines: Cell<u32>,
    scrollbar_width: Cell<i32>,
    quit_posted: Cell<bool>,
    paint_dc: Cell<NativeHandle>,
}

impl FakeNative {
    pub(crate) fn new() -> Self {
        let fake = Self::default();
        fake.wheel_lines.set(3);
        fake.scrollbar_width.set(17);
        fake.paint_dc.set(NativeHandle(0xDC));
        fake
    }

    pub(crate) fn set_scroll(&self, window: NativeHandle, metrics: ScrollMetrics) {
        self.scroll.borrow_mut().insert(window, metrics);
    }

    pub(crate) fn scroll(&self, window: NativeHandle) -> ScrollMetrics {
        self.scroll
            .borrow()
            .get(&window)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set_window_origin(&self, window: NativeHandle, origin: Point) {
        self.origins.borrow_mut().insert(window, origin);
    }

    pub(crate) fn set_rects(&self, window: NativeHandle, client: Rect, window_rect: Rect) {
        self.client_rects.borrow_mut().insert(window, client);
        self.window_rects.borrow_mut().insert(window, window_rect);
    }

    pub(crate) fn set_control_id(&self, window: NativeHandle, id: i32) {
        self.control_ids.borrow_mut().insert(window, id);
    }

    pub(crate) fn set_focused(&self, window: NativeHandle) {
        self.focused.set(window);
    }

    pub(crate) fn set_wheel_lines(&self, lines: u32) {
        self.wheel_lines.set(lines);
    }

    pub(crate) fn set_paint_dc(&self, dc: NativeHandle) {
        self.paint_dc.set(dc);
    }

    pub(crate) fn repaints(&self) -> Vec<NativeHandle> {
        self.repaints.borrow().clone()
    }

    pub(crate) fn validated(&self) -> Vec<NativeHandle> {
        self.validated.borrow().clone()
    }

    pub(crate) fn killed_timers(&self) -> Vec<(NativeHandle, i32)> {
        self.killed_timers.borrow().clone()
    }

    pub(crate) fn quit_posted(&self) -> bool {
        self.quit_posted.get()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl NativeOps for FakeNative {
    fn vertical_scroll_metrics(&self, window: NativeHandle) -> ScrollMetrics {
        self.scroll(window)
    }

    fn set_vertical_scroll_metrics(&self, window: NativeHandle, metrics: ScrollMetrics) {
        self.record(format!("set_scroll {}", metrics.pos));
        self.set_scroll(window, metrics);
    }

    fn request_repaint(&self, window: NativeHandle) {
        self.repaints.borrow_mut().push(window);
    }

    fn validate(&self, window: NativeHandle) {
        self.validated.borrow_mut().push(window);
    }

    fn map_point(&self, from: NativeHandle, to: NativeHandle, point: Point) -> Point {
        let origins = self.origins.borrow();
        let from_origin = origins.get(&from).copied().unwrap_or_default();
        let to_origin = origins.get(&to).copied().unwrap_or_default();
        Point::new(
            point.x + from_origin.x - to_origin.x,
            point.y + from_origin.y - to_origin.y,
        )
    }

    fn client_rect(&self, window: NativeHandle) -> Rect {
        self.client_rects
            .borrow()
            .get(&window)
            .copied()
            .unwrap_or_default()
    }

    fn window_rect(&self, window: NativeHandle) -> Rect {
        self.window_rects
            .borrow()
            .get(&window)
            .copied()
            .unwrap_or_default()
    }

    fn vertical_scrollbar_width(&self) -> i32 {
        self.scrollbar_width.get()
    }

    fn wheel_scroll_lines(&self) -> u32 {
        self.wheel_lines.get()
    }

    fn focused_window(&self) -> NativeHandle {
        self.focused.get()
    }

    fn control_id_of(&self, window: NativeHandle) -> i32 {
        self.control_ids.borrow().get(&window).copied().unwrap_or(0)
    }

    fn kill_timer(&self, window: NativeHandle, id: i32) {
        self.record(format!("kill_timer {id}"));
        self.killed_timers.borrow_mut().push((window, id));
    }

    fn post_quit(&self) {
        self.quit_posted.set(true);
    }

    fn begin_paint(&self, window: NativeHandle) -> NativeHandle {
        self.record(format!("begin_paint {:#x}", window.0));
        self.paint_dc.get()
    }

    fn end_paint(&self, window: NativeHandle) {
        self.record(format!("end_paint {:#x}", window.0));
    }

    fn fill_background(&self, window: NativeHandle, _dc: NativeHandle) {
        self.record(format!("fill_background {:#x}", window.0));
    }
}

/// Surface that records the translations applied to it.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub(crate) translations: Vec<(f64, f64)>,
}

impl DrawingSurface for RecordingSurface {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.translations.push((dx, dy));
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSurfaceProvider {
    pub(crate) created: Vec<NativeHandle>,
    pub(crate) destroyed: usize,
    pub(crate) fail: bool,
}

impl SurfaceProvider for FakeSurfaceProvider {
    fn create_surface(&mut self, dc: NativeHandle) -> Option<Box<dyn DrawingSurface>> {
        if self.fail {
            return None;
        }
        self.created.push(dc);
        Some(Box::new(RecordingSurface::default()))
    }

    fn destroy_surface(&mut self, _surface: Box<dyn DrawingSurface>) {
        self.destroyed += 1;
    }
}

/// Event handler that stores everything it receives.
#[derive(Debug, Default)]
pub(crate) struct CollectingHandler {
    pub(crate) events: Vec<AppEvent>,
    /// Canvas painted and the translations seen on its surface.
    pub(crate) painted: Vec<(CanvasId, Vec<(f64, f64)>)>,
    pub(crate) removed_apps: Vec<AppId>,
    pub(crate) apps_remaining: usize,
}

impl PlatformEventHandler for CollectingHandler {
    fn handle_event(&mut self, event: AppEvent) {
        self.events.push(event);
    }

    fn paint_canvas(&mut self, canvas: CanvasId, surface: &mut dyn DrawingSurface) {
        let translations = surface
            .as_any_mut()
            .downcast_mut::<RecordingSurface>()
            .map(|s| s.translations.clone())
            .unwrap_or_default();
        self.painted.push((canvas, translations));
    }

    fn remove_application(&mut self, app: AppId) -> bool {
        self.removed_apps.push(app);
        self.apps_remaining = self.apps_remaining.saturating_sub(1);
        self.apps_remaining == 0
    }
}
