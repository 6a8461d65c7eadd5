/*
 * The message pump. Each iteration polls the queue without blocking. Key
 * messages only reach dialog navigation (`IsDialogMessageW`) when the
 * foreground window is an application window hosting controls and the key is
 * a navigation key; everything else goes through translate and dispatch so the
 * application handler sees it. When the queue is empty the loop waits on the
 * queue for at most the configured idle interval instead of spinning.
 */
use crate::keyboard::{VK_DOWN, VK_LEFT, VK_NEXT, VK_PRIOR, VK_RIGHT, VK_TAB, VK_UP};

use std::time::Duration;

pub const NAVIGATION_KEYS: [u16; 7] = [VK_TAB, VK_UP, VK_LEFT, VK_DOWN, VK_RIGHT, VK_PRIOR, VK_NEXT];

/// The parts of a queued message the dialog filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuedInput {
    /// `WM_KEYDOWN` or `WM_KEYUP`.
    Key { vk: u16 },
    /// `WM_CHAR` or `WM_SYSCHAR`.
    Character,
    Other,
}

/// Whether a queued message may be offered to dialog navigation.
/// `focus_hosts_controls`: the foreground window is an application window
/// whose primary slot has at least one live control.
pub fn allows_dialog_processing(input: QueuedInput, focus_hosts_controls: bool) -> bool {
    match input {
        QueuedInput::Key { vk } => focus_hosts_controls && NAVIGATION_KEYS.contains(&vk),
        QueuedInput::Character => false,
        QueuedInput::Other => true,
    }
}

/// Milliseconds for a queue wait, rounding partial milliseconds up.
pub fn duration_to_timeout_ms(duration: Duration) -> u32 {
    let mut ms = duration.as_millis();
    if duration.subsec_nanos() % 1_000_000 > 0 {
        ms += 1;
    }
    u32::try_from(ms).unwrap_or(u32::MAX - 1)
}

#[cfg(target_os = "windows")]
pub(crate) use pump::run_message_loop;

#[cfg(target_os = "windows")]
mod pump {
    use super::{QueuedInput, allows_dialog_processing, duration_to_timeout_ms};
    use crate::types::{BackendConfig, NativeHandle};

    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GCW_ATOM, GetClassLongW, GetForegroundWindow, IsDialogMessageW, MSG,
        MsgWaitForMultipleObjects, PM_REMOVE, PeekMessageW, QS_ALLINPUT, TranslateMessage,
        WM_CHAR, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSCHAR,
    };

    fn classify(msg: &MSG) -> QueuedInput {
        match msg.message {
            WM_KEYDOWN | WM_KEYUP => QueuedInput::Key {
                vk: (msg.wParam.0 & 0xFFFF) as u16,
            },
            WM_CHAR | WM_SYSCHAR => QueuedInput::Character,
            _ => QueuedInput::Other,
        }
    }

    /*
     * Pumps messages until `WM_QUIT`. `hosts_controls` reports whether an
     * application window's primary slot has live controls; it is only asked
     * about windows of the application class.
     */
    pub(crate) fn run_message_loop(
        config: &BackendConfig,
        app_class_atom: u16,
        hosts_controls: impl Fn(NativeHandle) -> bool,
    ) {
        let idle_timeout = duration_to_timeout_ms(config.idle_wait);
        log::debug!("EventLoop: running (idle wait {idle_timeout} ms)");
        let mut msg = MSG::default();
        loop {
            let has_message = unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE) }.as_bool();
            if !has_message {
                unsafe {
                    MsgWaitForMultipleObjects(None, false, idle_timeout, QS_ALLINPUT);
                }
                continue;
            }
            if msg.message == WM_QUIT {
                log::debug!("EventLoop: WM_QUIT received, leaving loop");
                break;
            }

            let focused: HWND = unsafe { GetForegroundWindow() };
            let input = classify(&msg);
            let focus_hosts_controls = matches!(input, QueuedInput::Key { .. })
                && !focused.is_invalid()
                && unsafe { GetClassLongW(focused, GCW_ATOM) } == u32::from(app_class_atom)
                && hosts_controls(NativeHandle(focused.0 as isize));

            let mut handled = false;
            if allows_dialog_processing(input, focus_hosts_controls) && !focused.is_invalid() {
                handled = unsafe { IsDialogMessageW(focused, &msg) }.as_bool();
            }
            if !handled {
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
    }
}
