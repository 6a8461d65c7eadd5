/*
 * Win32 plumbing shared by the backend: window class registration, the window
 * procedures, handle conversions and `Win32Native`, the `NativeOps`
 * implementation the message handlers run against.
 *
 * The window procedures decode each message and hand it to the dispatcher of
 * the thread's runtime, which looks the window up in the backend's
 * handle-to-owner map. Windows unknown to the backend (including windows that
 * are still being created) get default processing.
 */
use crate::app::current_runtime;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::message::{self, MessageResult, WindowMessage};
use crate::native::{NativeOps, ScrollMetrics};
use crate::types::{NativeHandle, Point, Rect};

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;

use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
    Graphics::Gdi::{
        BeginPaint, COLOR_WINDOW, DEFAULT_GUI_FONT, EndPaint, FillRect, GetStockObject,
        GetSysColorBrush, HBRUSH, HDC, MapWindowPoints, PAINTSTRUCT, RDW_ALLCHILDREN,
        RDW_INVALIDATE, RedrawWindow, ValidateRect, WHITE_BRUSH,
    },
    UI::{
        Controls::{
            ICC_BAR_CLASSES, ICC_PROGRESS_CLASS, INITCOMMONCONTROLSEX, InitCommonControlsEx,
            SetScrollInfo,
        },
        Input::KeyboardAndMouse::GetFocus,
        WindowsAndMessaging::*,
    },
};
use windows::core::{HSTRING, PCWSTR};

/// Converts a backend handle into a window handle.
pub(crate) fn hwnd(handle: NativeHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

/// Converts a window handle into the backend's opaque handle.
pub(crate) fn native_handle(hwnd: HWND) -> NativeHandle {
    NativeHandle(hwnd.0 as isize)
}

pub(crate) fn to_rect(rect: RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

/// Names of the four window classes registered at startup, plus the atom of
/// the application class the event loop compares foreground windows against.
pub(crate) struct WindowClasses {
    pub(crate) app: HSTRING,
    pub(crate) slot: HSTRING,
    pub(crate) hidden: HSTRING,
    pub(crate) surface: HSTRING,
    pub(crate) app_atom: u16,
}

/*
 * Enables the progress bar and trackbar common controls. Failure only affects
 * those two control kinds, so it is logged and startup continues.
 */
pub(crate) fn init_common_controls() {
    let icc = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_PROGRESS_CLASS | ICC_BAR_CLASSES,
    };
    if !unsafe { InitCommonControlsEx(&icc) }.as_bool() {
        log::warn!("Platform: InitCommonControlsEx failed, progress bars and sliders may not work");
    }
}

struct ClassSpec<'a> {
    name: &'a HSTRING,
    style: WNDCLASS_STYLES,
    wnd_proc: WNDPROC,
    icon: bool,
    cursor: bool,
    background: HBRUSH,
}

fn register_class(h_instance: HINSTANCE, spec: ClassSpec<'_>) -> PlatformResult<u16> {
    unsafe {
        let icon = if spec.icon {
            LoadIconW(None, IDI_APPLICATION)?
        } else {
            HICON::default()
        };
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: spec.style,
            lpfnWndProc: spec.wnd_proc,
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: h_instance,
            hIcon: icon,
            hCursor: if spec.cursor {
                LoadCursorW(None, IDC_ARROW)?
            } else {
                HCURSOR::default()
            },
            hbrBackground: spec.background,
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR(spec.name.as_ptr()),
            hIconSm: icon,
        };

        let atom = RegisterClassExW(&wc);
        if atom == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed for '{}': {error:?}", spec.name);
            return Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed for '{}': {error:?}",
                spec.name
            )));
        }
        log::debug!("Platform: window class '{}' registered (atom {atom})", spec.name);
        Ok(atom)
    }
}

/*
 * Registers the application, slot, hidden sink and child surface classes.
 * Any failure aborts startup: without these classes no window can exist.
 */
pub(crate) fn register_window_classes(
    h_instance: HINSTANCE,
    prefix: &str,
) -> PlatformResult<WindowClasses> {
    let classes = WindowClasses {
        app: HSTRING::from(format!("{prefix}App")),
        slot: HSTRING::from(format!("{prefix}Slot")),
        hidden: HSTRING::from(format!("{prefix}Hidden")),
        surface: HSTRING::from(format!("{prefix}Surface")),
        app_atom: 0,
    };
    let white = HBRUSH(unsafe { GetStockObject(WHITE_BRUSH) }.0);

    register_class(
        h_instance,
        ClassSpec {
            name: &classes.hidden,
            style: WNDCLASS_STYLES(0),
            wnd_proc: Some(hidden_wnd_proc),
            icon: false,
            cursor: false,
            background: HBRUSH::default(),
        },
    )?;
    let app_atom = register_class(
        h_instance,
        ClassSpec {
            name: &classes.app,
            style: CS_HREDRAW | CS_VREDRAW,
            wnd_proc: Some(app_wnd_proc),
            icon: true,
            cursor: true,
            background: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
        },
    )?;
    register_class(
        h_instance,
        ClassSpec {
            name: &classes.slot,
            style: CS_NOCLOSE,
            wnd_proc: Some(slot_wnd_proc),
            icon: false,
            cursor: true,
            background: white,
        },
    )?;
    register_class(
        h_instance,
        ClassSpec {
            name: &classes.surface,
            style: CS_NOCLOSE,
            wnd_proc: Some(surface_wnd_proc),
            icon: false,
            cursor: true,
            background: white,
        },
    )?;

    Ok(WindowClasses { app_atom, ..classes })
}

/*
 * Shared body of the application and slot procedures. The dispatcher decides
 * from the owner map which handler runs; the result is mapped back onto the
 * Win32 return conventions.
 */
fn route_window_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let message = message::decode(msg, wparam.0, lparam.0);
    if message == WindowMessage::Other {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }
    let Some(runtime) = current_runtime() else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    match runtime.dispatch(native_handle(hwnd), message) {
        MessageResult::Handled(value) => LRESULT(value),
        MessageResult::MinTrackSize { width, height } => {
            if lparam.0 != 0 {
                let mmi = unsafe { &mut *(lparam.0 as *mut MINMAXINFO) };
                mmi.ptMinTrackSize.x = width;
                mmi.ptMinTrackSize.y = height;
            }
            LRESULT(0)
        }
        MessageResult::Default => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

pub(crate) unsafe extern "system" fn app_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    route_window_message(hwnd, msg, wparam, lparam)
}

pub(crate) unsafe extern "system" fn slot_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    route_window_message(hwnd, msg, wparam, lparam)
}

/*
 * The hidden sink only understands messages in the host message range; they
 * are forwarded to the toolkit with the name made relative to the base.
 */
pub(crate) unsafe extern "system" fn hidden_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if let Some(name) = message::host_message_name(msg)
        && let Some(runtime) = current_runtime()
    {
        log::trace!("Platform: host message {name} reached the sink window");
        return LRESULT(runtime.dispatcher().dispatch_host_message(name, wparam.0, lparam.0));
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

unsafe extern "system" fn surface_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// `NativeOps` over the real window system. Paint structures of the paint
/// cycles in progress are kept per window between `begin_paint` and `end_paint`.
#[derive(Default)]
pub(crate) struct Win32Native {
    paints: RefCell<HashMap<NativeHandle, PAINTSTRUCT>>,
}

impl Win32Native {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl NativeOps for Win32Native {
    fn vertical_scroll_metrics(&self, window: NativeHandle) -> ScrollMetrics {
        let mut info = SCROLLINFO {
            cbSize: std::mem::size_of::<SCROLLINFO>() as u32,
            fMask: SIF_RANGE | SIF_PAGE | SIF_POS,
            ..Default::default()
        };
        if let Err(err) = unsafe { GetScrollInfo(hwnd(window), SB_VERT, &mut info) } {
            log::trace!("Scroll: GetScrollInfo failed on {window:?}: {err:?}");
            return ScrollMetrics::default();
        }
        ScrollMetrics {
            min: info.nMin,
            max: info.nMax,
            page: i32::try_from(info.nPage).unwrap_or(i32::MAX),
            pos: info.nPos,
        }
    }

    fn set_vertical_scroll_metrics(&self, window: NativeHandle, metrics: ScrollMetrics) {
        let info = SCROLLINFO {
            cbSize: std::mem::size_of::<SCROLLINFO>() as u32,
            fMask: SIF_RANGE | SIF_PAGE | SIF_POS,
            nMin: metrics.min,
            nMax: metrics.max,
            nPage: metrics.page.max(0) as u32,
            nPos: metrics.pos,
            nTrackPos: 0,
        };
        log::trace!("Scroll: SetScrollInfo {metrics:?} on {window:?}");
        unsafe { SetScrollInfo(hwnd(window), SB_VERT, &info, true) };
    }

    fn request_repaint(&self, window: NativeHandle) {
        let _ = unsafe {
            RedrawWindow(
                Some(hwnd(window)),
                None,
                None,
                RDW_INVALIDATE | RDW_ALLCHILDREN,
            )
        };
    }

    fn validate(&self, window: NativeHandle) {
        let _ = unsafe { ValidateRect(Some(hwnd(window)), None) };
    }

    fn map_point(&self, from: NativeHandle, to: NativeHandle, point: Point) -> Point {
        let mut points = [POINT {
            x: point.x,
            y: point.y,
        }];
        unsafe { MapWindowPoints(Some(hwnd(from)), Some(hwnd(to)), &mut points) };
        Point::new(points[0].x, points[0].y)
    }

    fn client_rect(&self, window: NativeHandle) -> Rect {
        let mut rect = RECT::default();
        if let Err(err) = unsafe { GetClientRect(hwnd(window), &mut rect) } {
            log::trace!("Platform: GetClientRect failed on {window:?}: {err:?}");
        }
        to_rect(rect)
    }

    fn window_rect(&self, window: NativeHandle) -> Rect {
        let mut rect = RECT::default();
        if let Err(err) = unsafe { GetWindowRect(hwnd(window), &mut rect) } {
            log::trace!("Platform: GetWindowRect failed on {window:?}: {err:?}");
        }
        to_rect(rect)
    }

    fn vertical_scrollbar_width(&self) -> i32 {
        unsafe { GetSystemMetrics(SM_CXVSCROLL) }
    }

    fn wheel_scroll_lines(&self) -> u32 {
        let mut lines: u32 = 3;
        let queried = unsafe {
            SystemParametersInfoW(
                SPI_GETWHEELSCROLLLINES,
                0,
                Some(&mut lines as *mut u32 as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        };
        if let Err(err) = queried {
            log::trace!("Scroll: SPI_GETWHEELSCROLLLINES failed, assuming 3 lines: {err:?}");
            return 3;
        }
        lines
    }

    fn focused_window(&self) -> NativeHandle {
        native_handle(unsafe { GetFocus() })
    }

    fn control_id_of(&self, window: NativeHandle) -> i32 {
        unsafe { GetDlgCtrlID(hwnd(window)) }
    }

    fn kill_timer(&self, window: NativeHandle, id: i32) {
        if let Err(err) = unsafe { KillTimer(Some(hwnd(window)), id as usize) } {
            log::trace!("Platform: KillTimer({id}) failed on {window:?}: {err:?}");
        }
    }

    fn post_quit(&self) {
        unsafe { PostQuitMessage(0) };
    }

    fn begin_paint(&self, window: NativeHandle) -> NativeHandle {
        let mut ps = PAINTSTRUCT::default();
        let hdc = unsafe { BeginPaint(hwnd(window), &mut ps) };
        if hdc.is_invalid() {
            log::warn!("Surface: BeginPaint returned no device context for {window:?}");
            return NativeHandle::NULL;
        }
        self.paints.borrow_mut().insert(window, ps);
        NativeHandle(hdc.0 as isize)
    }

    fn end_paint(&self, window: NativeHandle) {
        let ps = self.paints.borrow_mut().remove(&window);
        match ps {
            Some(ps) => {
                let _ = unsafe { EndPaint(hwnd(window), &ps) };
            }
            None => log::warn!("Surface: end_paint for {window:?} without a paint cycle"),
        }
    }

    fn fill_background(&self, window: NativeHandle, dc: NativeHandle) {
        let mut rect = RECT::default();
        unsafe {
            if GetClientRect(hwnd(window), &mut rect).is_err() {
                return;
            }
            FillRect(
                HDC(dc.0 as *mut c_void),
                &rect,
                GetSysColorBrush(COLOR_WINDOW),
            );
        }
    }
}

/// Reads the full text of a window, returning an empty string on failure.
pub(crate) fn read_window_text(window: HWND) -> String {
    let length = unsafe { GetWindowTextLengthW(window) };
    if length <= 0 {
        return String::new();
    }
    let mut buffer = vec![0u16; length as usize + 1];
    let copied = unsafe { GetWindowTextW(window, &mut buffer) };
    let copied = usize::try_from(copied).unwrap_or(0).min(buffer.len());
    String::from_utf16_lossy(&buffer[..copied])
}

pub(crate) fn set_window_text(window: HWND, text: &str) -> PlatformResult<()> {
    unsafe { SetWindowTextW(window, &HSTRING::from(text)) }?;
    Ok(())
}

/// Gives a control the stock GUI font.
pub(crate) fn apply_default_font(window: HWND) {
    unsafe {
        let font = GetStockObject(DEFAULT_GUI_FONT);
        SendMessageW(
            window,
            WM_SETFONT,
            Some(WPARAM(font.0 as usize)),
            Some(LPARAM(1)),
        );
    }
}

/// Puts a freshly created child at the top of the z-order without redrawing.
pub(crate) fn raise_without_redraw(window: HWND) {
    let _ = unsafe {
        SetWindowPos(
            window,
            Some(HWND_TOP),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOREDRAW,
        )
    };
}

/// Centers a top-level window on the primary screen.
pub(crate) fn center_window(window: HWND) {
    let mut rect = RECT::default();
    unsafe {
        if GetWindowRect(window, &mut rect).is_err() {
            return;
        }
        let _ = SetWindowPos(
            window,
            None,
            (GetSystemMetrics(SM_CXSCREEN) - rect.right) / 2,
            (GetSystemMetrics(SM_CYSCREEN) - rect.bottom) / 2,
            0,
            0,
            SWP_NOZORDER | SWP_NOSIZE,
        );
    }
}
