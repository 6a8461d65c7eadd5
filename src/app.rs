/*
 * The public entry point of the backend on Windows. `PlatformInterface` owns
 * the thread's runtime: the dispatcher with the backend state, the
 * `Win32Native` the message handlers run against, the registered window
 * classes and the hidden message-sink window. Window procedures reach the
 * runtime through a thread-local, so there is at most one interface per
 * thread.
 *
 * Calls that make Windows send messages synchronously (creating, moving,
 * showing or destroying windows) run without a state borrow held, since those
 * messages re-enter the window procedures.
 */
use crate::controls::{
    self, button_handler, checkbox_handler, combobox_handler, edit_handler, progress_handler,
    radiobutton_handler, slider_handler, surface_handler,
};
use crate::dispatcher::Dispatcher;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::event_loop::{duration_to_timeout_ms, run_message_loop};
use crate::message::{HOST_MESSAGE_LIMIT, MessageResult, WM_APP_HOST_MESSAGE, WindowMessage};
use crate::native::{NativeOps, ScrollMetrics};
use crate::scroll::{scrolled_bounds, slot_scroll_range};
use crate::state::{BackendState, ExtraEntry, SlotKind};
use crate::surface::SurfaceProvider;
use crate::types::{
    AppEvent, AppId, BackendConfig, CanvasId, ControlId, CursorKind, ExtraKind, NativeHandle,
    ObjectRef, Place, PlatformEventHandler, Rect, SlotId, TimerId, WindowConfig,
};
use crate::window_common::{
    WindowClasses, Win32Native, center_window, hwnd, init_common_controls, native_handle,
    raise_without_redraw, register_window_classes, to_rect,
};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, POINT, RECT, WPARAM},
    Graphics::Gdi::MapWindowPoints,
    System::LibraryLoader::GetModuleHandleW,
    UI::WindowsAndMessaging::{
        AdjustWindowRect, AdjustWindowRectEx, CW_USEDEFAULT, CreateWindowExW, DestroyWindow,
        FindWindowW, GWL_STYLE, GetWindowRect, IDC_ARROW, IDC_HAND, IDC_IBEAM, LoadCursorW,
        MoveWindow, SW_HIDE, SW_SHOW, SW_SHOWMAXIMIZED, SW_SHOWNORMAL, SendMessageW, SetCursor,
        SetTimer, SetWindowLongW, SetWindowTextW, ShowWindow, UnregisterClassW, WINDOW_EX_STYLE,
        WINDOW_STYLE, WM_CLOSE, WS_CAPTION, WS_CHILD, WS_DLGFRAME, WS_EX_CLIENTEDGE,
        WS_EX_COMPOSITED, WS_EX_TRANSPARENT, WS_EX_WINDOWEDGE, WS_MAXIMIZEBOX, WS_MINIMIZEBOX,
        WS_OVERLAPPED, WS_OVERLAPPEDWINDOW, WS_POPUP, WS_SYSMENU, WS_TABSTOP, WS_THICKFRAME,
        WS_VISIBLE, WS_VSCROLL,
    },
};
use windows::core::{HSTRING, PCWSTR, w};

const BASE_WINDOW_STYLE: WINDOW_STYLE = WINDOW_STYLE(
    WS_OVERLAPPED.0 | WS_CAPTION.0 | WS_SYSMENU.0 | WS_MINIMIZEBOX.0,
);
const FULLSCREEN_WINDOW_STYLE: WINDOW_STYLE = WINDOW_STYLE(WS_POPUP.0 | WS_VSCROLL.0);

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

/// The runtime of the calling thread, if a `PlatformInterface` is alive on it.
pub(crate) fn current_runtime() -> Option<Rc<Runtime>> {
    RUNTIME.with(|runtime| runtime.borrow().clone())
}

pub(crate) struct Runtime {
    dispatcher: Dispatcher,
    native: Win32Native,
    h_instance: HINSTANCE,
    classes: WindowClasses,
    config: BackendConfig,
    hidden: HWND,
}

impl Runtime {
    pub(crate) fn dispatch(&self, window: NativeHandle, message: WindowMessage) -> MessageResult {
        self.dispatcher.dispatch(&self.native, window, message)
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<BackendState>> {
        self.dispatcher.state()
    }

    pub(crate) fn h_instance(&self) -> HINSTANCE {
        self.h_instance
    }

    pub(crate) fn classes(&self) -> &WindowClasses {
        &self.classes
    }
}

fn app_window_style(resizable: bool) -> WINDOW_STYLE {
    let frame = if resizable {
        WS_THICKFRAME | WS_MAXIMIZEBOX
    } else {
        WS_DLGFRAME
    };
    BASE_WINDOW_STYLE | frame | WS_VSCROLL
}

/*
 * Public API of the backend. Every method must be called on the thread that
 * created the interface. Toolkit callbacks may call back into it while an
 * event is being delivered.
 */
pub struct PlatformInterface {
    runtime: Rc<Runtime>,
}

impl PlatformInterface {
    /*
     * Initialises common controls, registers the window classes and creates
     * the hidden message sink. Class registration failure is fatal.
     */
    pub fn new(
        config: BackendConfig,
        handler: Rc<RefCell<dyn PlatformEventHandler>>,
        provider: Rc<RefCell<dyn SurfaceProvider>>,
    ) -> PlatformResult<Self> {
        if current_runtime().is_some() {
            return Err(PlatformError::InitializationFailed(
                "A PlatformInterface already exists on this thread".to_string(),
            ));
        }
        log::debug!("Platform: initializing with class prefix '{}'", config.class_prefix);

        let h_instance: HINSTANCE = unsafe { GetModuleHandleW(None) }
            .map_err(|err| {
                PlatformError::InitializationFailed(format!("GetModuleHandleW failed: {err:?}"))
            })?
            .into();
        init_common_controls();
        let classes = register_window_classes(h_instance, &config.class_prefix)?;

        let hidden = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                &classes.hidden,
                &classes.hidden,
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                0,
                CW_USEDEFAULT,
                0,
                None,
                None,
                Some(h_instance),
                None,
            )
        }
        .map_err(|err| {
            PlatformError::InitializationFailed(format!("Hidden window creation failed: {err:?}"))
        })?;

        let state = Rc::new(RefCell::new(BackendState::new()));
        let runtime = Rc::new(Runtime {
            dispatcher: Dispatcher::new(state, handler, provider),
            native: Win32Native::new(),
            h_instance,
            classes,
            config,
            hidden,
        });
        RUNTIME.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&runtime)));
        Ok(Self { runtime })
    }

    fn state(&self) -> &Rc<RefCell<BackendState>> {
        self.runtime.state()
    }

    fn native(&self) -> &Win32Native {
        &self.runtime.native
    }

    fn app_window(&self, app: AppId) -> PlatformResult<HWND> {
        Ok(hwnd(self.state().borrow().app(app)?.window))
    }

    fn slot_window(&self, slot: SlotId) -> PlatformResult<NativeHandle> {
        Ok(self.state().borrow().slot(slot)?.window)
    }

    /// Pumps messages until the last application closes.
    pub fn run(&self) {
        let state = Rc::clone(self.state());
        run_message_loop(&self.runtime.config, self.runtime.classes.app_atom, |window| {
            state
                .try_borrow()
                .map(|state| state.app_window_has_controls(window))
                .unwrap_or(false)
        });
    }

    /// Sends `name` to the hidden sink window and returns the toolkit's answer.
    pub fn send_host_message(&self, name: u32, wparam: usize, lparam: isize) -> PlatformResult<isize> {
        if name == 0 || name >= HOST_MESSAGE_LIMIT {
            return Err(PlatformError::OperationFailed(format!(
                "Host message {name} is outside 1..{HOST_MESSAGE_LIMIT}"
            )));
        }
        let result = unsafe {
            SendMessageW(
                self.runtime.hidden,
                WM_APP_HOST_MESSAGE + name,
                Some(WPARAM(wparam)),
                Some(LPARAM(lparam)),
            )
        };
        Ok(result.0)
    }

    /*
     * Creates the application window (hidden until `show_app`), centred on the
     * screen, with an empty vertical scroll range.
     */
    pub fn open_app(&self, config: &WindowConfig, canvas: CanvasId) -> PlatformResult<AppId> {
        let app = self.state().borrow_mut().create_application(config, canvas);

        let edge = if config.dialog {
            WS_EX_WINDOWEDGE
        } else {
            WS_EX_CLIENTEDGE
        };
        let mut bounds = RECT {
            left: 0,
            top: 0,
            right: config.width,
            bottom: config.height,
        };
        if let Err(err) = unsafe { AdjustWindowRectEx(&mut bounds, BASE_WINDOW_STYLE, false, edge) } {
            log::warn!("Platform: AdjustWindowRectEx failed for {app:?}: {err:?}");
        }
        let normal_style = app_window_style(config.resizable);
        let style = if config.fullscreen {
            FULLSCREEN_WINDOW_STYLE
        } else {
            normal_style
        };

        let created = unsafe {
            CreateWindowExW(
                edge | WS_EX_COMPOSITED,
                &self.runtime.classes.app,
                &HSTRING::from(config.title.as_str()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                bounds.right - bounds.left,
                bounds.bottom - bounds.top,
                None,
                None,
                Some(self.runtime.h_instance),
                None,
            )
        };
        let window = match created {
            Ok(window) => window,
            Err(err) => {
                log::error!("Platform: CreateWindowExW failed for {app:?}: {err:?}");
                self.state().borrow_mut().remove_application(app);
                return Err(err.into());
            }
        };

        {
            let mut state = self.state().borrow_mut();
            state.attach_app_window(app, native_handle(window))?;
            let app_state = state.app_mut(app)?;
            app_state.normal_bounds = to_rect(bounds);
            app_state.window_style = normal_style.0;
        }
        center_window(window);
        self.native()
            .set_vertical_scroll_metrics(native_handle(window), ScrollMetrics::default());
        log::debug!("Platform: opened {app:?} as {window:?}");
        Ok(app)
    }

    pub fn show_app(&self, app: AppId) -> PlatformResult<()> {
        let window = self.app_window(app)?;
        unsafe {
            let _ = ShowWindow(window, SW_SHOWNORMAL);
        }
        Ok(())
    }

    pub fn set_title(&self, app: AppId, title: &str) -> PlatformResult<()> {
        let window = self.app_window(app)?;
        self.state().borrow_mut().app_mut(app)?.title = title.to_string();
        unsafe { SetWindowTextW(window, &HSTRING::from(title)) }?;
        Ok(())
    }

    /// Resizes the window so its client area becomes `width` x `height`.
    pub fn resize_app(&self, app: AppId, width: i32, height: i32) -> PlatformResult<()> {
        let window = {
            let mut state = self.state().borrow_mut();
            let app_state = state.app_mut(app)?;
            app_state.width = width;
            app_state.height = height;
            hwnd(app_state.window)
        };
        let mut rect = RECT::default();
        unsafe {
            GetWindowRect(window, &mut rect)?;
            rect.right = rect.left + width;
            rect.bottom = rect.top + height;
            let _ = AdjustWindowRect(&mut rect, BASE_WINDOW_STYLE, false);
            let _ = MoveWindow(
                window,
                rect.left,
                rect.top,
                rect.right - rect.left,
                rect.bottom - rect.top,
                true,
            );
        }
        Ok(())
    }

    /*
     * Switches between a borderless maximised popup (taskbar hidden) and the
     * normal window, restoring the bounds saved when fullscreen was entered.
     */
    pub fn set_fullscreen(&self, app: AppId, fullscreen: bool) -> PlatformResult<()> {
        let (window, normal_style) = {
            let state = self.state().borrow();
            let app_state = state.app(app)?;
            (hwnd(app_state.window), app_state.window_style)
        };
        if fullscreen {
            let mut rect = RECT::default();
            if unsafe { GetWindowRect(window, &mut rect) }.is_ok() {
                self.state().borrow_mut().app_mut(app)?.normal_bounds = to_rect(rect);
            }
        }
        let style = if fullscreen {
            FULLSCREEN_WINDOW_STYLE.0
        } else {
            normal_style
        };
        unsafe {
            SetWindowLongW(window, GWL_STYLE, style as i32);
            if let Ok(taskbar) = FindWindowW(w!("Shell_TrayWnd"), PCWSTR::null()) {
                let _ = ShowWindow(taskbar, if fullscreen { SW_HIDE } else { SW_SHOW });
            }
        }
        if !fullscreen {
            let normal = self.state().borrow().app(app)?.normal_bounds;
            let _ = unsafe {
                MoveWindow(
                    window,
                    normal.left,
                    normal.top,
                    normal.width(),
                    normal.height(),
                    true,
                )
            };
        }
        unsafe {
            let _ = ShowWindow(
                window,
                if fullscreen {
                    SW_SHOWMAXIMIZED
                } else {
                    SW_SHOWNORMAL
                },
            );
        }
        self.state().borrow_mut().app_mut(app)?.fullscreen = fullscreen;
        log::debug!("Platform: {app:?} fullscreen set to {fullscreen}");
        Ok(())
    }

    /// Asks the window to close; teardown follows through `WM_DESTROY`.
    pub fn close_app(&self, app: AppId) -> PlatformResult<()> {
        let window = self.app_window(app)?;
        log::debug!("Platform: closing {app:?}");
        unsafe {
            SendMessageW(window, WM_CLOSE, None, None);
        }
        Ok(())
    }

    /// Sets the pointer shape; does nothing when `kind` is already current.
    pub fn set_cursor(&self, app: AppId, kind: CursorKind) -> PlatformResult<()> {
        {
            let state = self.state().borrow();
            let app_state = state.app(app)?;
            if app_state.window.is_null() || !app_state.needs_cursor(kind) {
                return Ok(());
            }
        }
        let shape = match kind {
            CursorKind::Arrow => IDC_ARROW,
            CursorKind::Hand => IDC_HAND,
            CursorKind::Text => IDC_IBEAM,
        };
        let cursor = unsafe { LoadCursorW(None, shape) }?;
        unsafe { SetCursor(Some(cursor)) };
        self.state().borrow_mut().app_mut(app)?.record_cursor(kind);
        Ok(())
    }

    /// The application's primary slot.
    pub fn app_slot(&self, app: AppId) -> PlatformResult<SlotId> {
        Ok(self.state().borrow().app(app)?.slot)
    }

    /*
     * Creates a slot under `parent`. A toplevel slot shares the application
     * window; its canvas is sized to `place` right away. A nested slot gets a
     * child window of its own at `place`.
     */
    pub fn create_slot(
        &self,
        parent: SlotId,
        canvas: CanvasId,
        place: Place,
        scrolls: bool,
        toplevel: bool,
    ) -> PlatformResult<SlotId> {
        let (slot, parent_window) = {
            let mut state = self.state().borrow_mut();
            let slot = state.create_slot(parent, canvas, scrolls, toplevel)?;
            (slot, state.slot(parent)?.window)
        };
        if toplevel {
            self.runtime.dispatcher.post_event(
                self.native(),
                AppEvent::CanvasResized {
                    canvas,
                    width: place.iw,
                    height: place.ih,
                },
            );
            return Ok(slot);
        }

        let created = unsafe {
            CreateWindowExW(
                WS_EX_TRANSPARENT,
                &self.runtime.classes.slot,
                w!("Slot"),
                WS_CHILD | WS_TABSTOP | WS_VISIBLE,
                place.left(),
                place.top(),
                place.iw,
                place.ih,
                Some(hwnd(parent_window)),
                None,
                Some(self.runtime.h_instance),
                None,
            )
        };
        let window = match created {
            Ok(window) => window,
            Err(err) => {
                self.state().borrow_mut().remove_slot(slot);
                return Err(err.into());
            }
        };
        raise_without_redraw(window);
        self.state()
            .borrow_mut()
            .attach_slot_window(slot, native_handle(window))?;
        Ok(slot)
    }

    /// Forgets the slot and destroys its window if it has one of its own.
    pub fn destroy_slot(&self, slot: SlotId) -> PlatformResult<()> {
        let removed = self.state().borrow_mut().remove_slot(slot).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("Slot {slot:?} not found"))
        })?;
        if removed.kind == SlotKind::Nested && !removed.window.is_null() {
            unsafe { DestroyWindow(hwnd(removed.window)) }?;
        }
        Ok(())
    }

    pub fn repaint_slot(&self, slot: SlotId) -> PlatformResult<()> {
        let window = self.slot_window(slot)?;
        self.native().request_repaint(window);
        Ok(())
    }

    /// Sets the slot's scroll range for content ending at `endy` in a view
    /// `height` pixels tall.
    pub fn lengthen_slot(&self, slot: SlotId, height: i32, endy: i32) -> PlatformResult<()> {
        let (window, scrolly) = {
            let state = self.state().borrow();
            let slot_state = state.slot(slot)?;
            (slot_state.window, slot_state.scrolly)
        };
        let metrics = slot_scroll_range(endy, height, scrolly);
        log::trace!("Scroll: lengthening slot {slot:?} to {metrics:?}");
        self.native().set_vertical_scroll_metrics(window, metrics);
        Ok(())
    }

    pub fn scroll_slot_to_top(&self, slot: SlotId) -> PlatformResult<()> {
        let window = {
            let mut state = self.state().borrow_mut();
            let slot_state = state.slot_mut(slot)?;
            slot_state.scrolly = 0;
            slot_state.window
        };
        let metrics = self.native().vertical_scroll_metrics(window);
        self.native()
            .set_vertical_scroll_metrics(window, ScrollMetrics { pos: 0, ..metrics });
        Ok(())
    }

    /// Width reserved for the vertical scrollbar.
    pub fn slot_gutter(&self, slot: SlotId) -> PlatformResult<i32> {
        self.state().borrow().slot(slot)?;
        Ok(self.native().vertical_scrollbar_width())
    }

    /// Empties the slot's control registry; ids start from the base again.
    pub fn clear_slot(&self, slot: SlotId) -> PlatformResult<()> {
        self.state().borrow_mut().clear_controls(slot)
    }

    /// Tombstones `object` in the slot's registry; the ids of the other
    /// controls do not change.
    pub fn remove_item(&self, slot: SlotId, object: ObjectRef) -> Option<ControlId> {
        self.state().borrow_mut().remove_item(slot, object)
    }

    /// Moves a nested slot's window to `place` inside `parent`, unless it is
    /// already there.
    pub fn place_canvas(&self, slot: SlotId, parent: SlotId, place: Place) -> PlatformResult<()> {
        let (window, parent_window, parent_scrolly) = {
            let state = self.state().borrow();
            let parent_state = state.slot(parent)?;
            (state.slot(slot)?.window, parent_state.window, parent_state.scrolly)
        };
        let target = scrolled_bounds(place, parent_scrolly);

        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect) }?;
        let mut corners = [
            POINT {
                x: rect.left,
                y: rect.top,
            },
            POINT {
                x: rect.right,
                y: rect.bottom,
            },
        ];
        unsafe { MapWindowPoints(None, Some(hwnd(parent_window)), &mut corners) };
        let current = Rect {
            left: corners[0].x,
            top: corners[0].y,
            right: corners[1].x,
            bottom: corners[1].y,
        };
        if current != target {
            let _ = unsafe {
                MoveWindow(
                    hwnd(window),
                    target.left,
                    target.top,
                    target.width(),
                    target.height(),
                    true,
                )
            };
        }
        Ok(())
    }

    /*
     * Registers a timer in the application's extras and starts it on the
     * application window. The extras id doubles as the native timer id.
     */
    pub fn start_timer(
        &self,
        app: AppId,
        object: ObjectRef,
        interval: Duration,
        repeating: bool,
    ) -> PlatformResult<TimerId> {
        let kind = if repeating {
            ExtraKind::RepeatingTimer
        } else {
            ExtraKind::OneShotTimer
        };
        let (window, id) = {
            let mut state = self.state().borrow_mut();
            let app_state = state.app_mut(app)?;
            let id = app_state.extras.register(ExtraEntry { object, kind });
            (app_state.window, id)
        };
        let started = unsafe {
            SetTimer(
                Some(hwnd(window)),
                id.raw() as usize,
                duration_to_timeout_ms(interval),
                None,
            )
        };
        if started == 0 {
            let code = unsafe { GetLastError() }.0;
            self.state().borrow_mut().app_mut(app)?.extras.remove_id(id);
            return Err(PlatformError::Win32 {
                function: "SetTimer",
                code,
            });
        }
        log::debug!("Platform: started {kind:?} {} for {object:?} on {app:?}", id.raw());
        Ok(id)
    }

    pub fn remove_timer(&self, app: AppId, timer: TimerId) -> PlatformResult<()> {
        let window = {
            let mut state = self.state().borrow_mut();
            let app_state = state.app_mut(app)?;
            app_state.extras.remove_id(timer);
            app_state.window
        };
        self.native().kill_timer(window, timer.raw());
        Ok(())
    }

    pub fn create_button(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
        text: &str,
    ) -> PlatformResult<NativeHandle> {
        button_handler::create_button(&self.runtime, slot, object, place, text).map(native_handle)
    }

    pub fn create_edit_line(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
        text: &str,
        secret: bool,
    ) -> PlatformResult<NativeHandle> {
        edit_handler::create_edit_line(&self.runtime, slot, object, place, text, secret)
            .map(native_handle)
    }

    pub fn create_edit_box(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
        text: &str,
    ) -> PlatformResult<NativeHandle> {
        edit_handler::create_edit_box(&self.runtime, slot, object, place, text).map(native_handle)
    }

    pub fn create_list_box(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
        items: &[String],
    ) -> PlatformResult<NativeHandle> {
        combobox_handler::create_list_box(&self.runtime, slot, object, place, items)
            .map(native_handle)
    }

    /// Progress bars are not registered and carry no control id.
    pub fn create_progress(&self, slot: SlotId, place: Place) -> PlatformResult<NativeHandle> {
        progress_handler::create_progress(&self.runtime, slot, place).map(native_handle)
    }

    pub fn create_slider(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
    ) -> PlatformResult<NativeHandle> {
        slider_handler::create_slider(&self.runtime, slot, object, place).map(native_handle)
    }

    pub fn create_check(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
    ) -> PlatformResult<NativeHandle> {
        checkbox_handler::create_check(&self.runtime, slot, object, place).map(native_handle)
    }

    pub fn create_radio(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
    ) -> PlatformResult<NativeHandle> {
        radiobutton_handler::create_radio(&self.runtime, slot, object, place).map(native_handle)
    }

    pub fn create_surface(
        &self,
        slot: SlotId,
        object: ObjectRef,
        place: Place,
    ) -> PlatformResult<NativeHandle> {
        surface_handler::create_surface(&self.runtime, slot, object, place).map(native_handle)
    }

    pub fn hide_control(&self, control: NativeHandle) {
        controls::hide(control);
    }

    pub fn show_control(&self, control: NativeHandle) {
        controls::show(control);
    }

    pub fn position_control(&self, control: NativeHandle, place: Place) {
        controls::position(control, place);
    }

    /// Keeps a control in step with its slot's scroll offset.
    pub fn repaint_control(
        &self,
        slot: SlotId,
        control: NativeHandle,
        shown: Place,
        place: Place,
    ) -> PlatformResult<()> {
        let scrolly = self.state().borrow().slot(slot)?.scrolly;
        controls::repaint(control, shown, place, scrolly);
        Ok(())
    }

    pub fn set_control_state(&self, control: NativeHandle, enabled: bool, editable: bool) {
        controls::set_state(control, enabled, editable);
    }

    pub fn focus_control(&self, control: NativeHandle) {
        controls::focus(control);
    }

    /// Tombstones the control in its slot and destroys its window.
    pub fn remove_control(
        &self,
        slot: SlotId,
        object: ObjectRef,
        control: NativeHandle,
    ) -> PlatformResult<()> {
        let app_window = {
            let mut state = self.state().borrow_mut();
            let app = state.slot(slot)?.app;
            state.remove_item(slot, object);
            state.app(app)?.window
        };
        controls::destroy(control, app_window);
        Ok(())
    }

    pub fn edit_text(&self, control: NativeHandle) -> String {
        edit_handler::text(control)
    }

    pub fn set_edit_text(&self, control: NativeHandle, text: &str) -> PlatformResult<()> {
        edit_handler::set_text(control, text)
    }

    pub fn update_list_items(&self, control: NativeHandle, items: &[String]) {
        combobox_handler::update_items(control, items);
    }

    pub fn list_active_index(&self, control: NativeHandle) -> Option<usize> {
        combobox_handler::active_index(control)
    }

    pub fn set_list_active_index(&self, control: NativeHandle, index: usize) {
        combobox_handler::set_active_index(control, index);
    }

    pub fn progress_fraction(&self, control: NativeHandle) -> f64 {
        progress_handler::fraction(control)
    }

    pub fn set_progress_fraction(&self, control: NativeHandle, fraction: f64) {
        progress_handler::set_fraction(control, fraction);
    }

    pub fn slider_fraction(&self, control: NativeHandle) -> f64 {
        slider_handler::fraction(control)
    }

    pub fn set_slider_fraction(&self, control: NativeHandle, fraction: f64) {
        slider_handler::set_fraction(control, fraction);
    }

    pub fn is_checked(&self, control: NativeHandle) -> bool {
        checkbox_handler::is_checked(control)
    }

    pub fn set_checked(&self, control: NativeHandle, checked: bool) {
        checkbox_handler::set_checked(control, checked);
    }

    pub fn is_radio_selected(&self, control: NativeHandle) -> bool {
        radiobutton_handler::is_selected(control)
    }

    pub fn set_radio_selected(&self, control: NativeHandle, selected: bool) {
        radiobutton_handler::set_selected(control, selected);
    }
}

impl Drop for PlatformInterface {
    fn drop(&mut self) {
        log::debug!("Platform: shutting down");
        RUNTIME.with(|slot| slot.borrow_mut().take());
        let runtime = &self.runtime;
        unsafe {
            let _ = DestroyWindow(runtime.hidden);
            for class in [
                &runtime.classes.app,
                &runtime.classes.slot,
                &runtime.classes.hidden,
                &runtime.classes.surface,
            ] {
                if let Err(err) = UnregisterClassW(class, Some(runtime.h_instance)) {
                    log::trace!("Platform: UnregisterClassW('{class}') failed: {err:?}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizable_windows_get_a_thick_frame() {
        let style = app_window_style(true);
        assert!(style.0 & WS_THICKFRAME.0 != 0);
        assert!(style.0 & WS_MAXIMIZEBOX.0 != 0);
        assert!(style.0 & WS_VSCROLL.0 != 0);
    }

    #[test]
    fn fixed_windows_get_a_dialog_frame() {
        let style = app_window_style(false);
        assert!(style.0 & WS_THICKFRAME.0 == 0);
        assert!(style.0 & WS_DLGFRAME.0 != 0);
    }
}
