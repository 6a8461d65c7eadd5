/*
 * Message handling for top-level application windows. Covers the application
 * lifecycle (destroy, paint and resize, minimum size), keyboard translation,
 * the mouse wheel and timers; pointer, focus and control notifications are
 * shared with slot windows and run against the application's primary slot.
 */
use crate::keyboard;
use crate::message::{MessageOutcome, MessageResult, WindowMessage};
use crate::native::NativeOps;
use crate::scroll::{apply_vertical_scroll, wheel_scroll_plan};
use crate::slot_handler::{pointer_message, shared_message};
use crate::state::BackendState;
use crate::types::{AppEvent, AppId, ControlId, ExtraKind, NativeHandle};

/// Non-client decoration size of `window` as (width, height).
pub fn decoration_size(native: &dyn NativeOps, window: NativeHandle) -> (i32, i32) {
    let client = native.client_rect(window);
    let outer = native.window_rect(window);
    (
        (outer.width() - client.width()) - 2,
        (outer.height() - client.height()) - 2,
    )
}

pub fn handle_app_message(
    state: &mut BackendState,
    native: &dyn NativeOps,
    app_id: AppId,
    window: NativeHandle,
    message: WindowMessage,
) -> MessageOutcome {
    let primary = match state.app(app_id) {
        Ok(app) => app.slot,
        Err(err) => {
            log::trace!("AppHandler: {err}; using default processing");
            return MessageOutcome::default_processing();
        }
    };

    match message {
        WindowMessage::Destroy => {
            log::debug!("AppHandler: WM_DESTROY for app {app_id:?}");
            let mut outcome = MessageOutcome::handled(0);
            outcome.destroyed = Some(app_id);
            outcome
        }
        WindowMessage::EraseBackground => MessageOutcome::handled(1),
        WindowMessage::Paint => paint(state, native, app_id, window),
        WindowMessage::GetMinMaxInfo => {
            let Ok(app) = state.app(app_id) else {
                return MessageOutcome::default_processing();
            };
            let (mut edge_w, edge_h) = decoration_size(native, window);
            let scrollbar = native.vertical_scrollbar_width();
            if edge_w > scrollbar {
                edge_w -= scrollbar;
            }
            MessageOutcome::with_result(MessageResult::MinTrackSize {
                width: app.min_width + edge_w,
                height: app.min_height + edge_h,
            })
        }
        WindowMessage::ButtonDown { .. }
        | WindowMessage::ButtonUp { .. }
        | WindowMessage::MouseMove { .. } => {
            pointer_message(state, native, app_id, window, window, message)
        }
        WindowMessage::Char(unit) => {
            let outcome = MessageOutcome::default_processing();
            let Ok(app) = state.app_mut(app_id) else {
                return outcome;
            };
            match keyboard::character(&mut app.pending_surrogate, unit) {
                Some(key) => outcome.event(AppEvent::Keypress { app: app_id, key }),
                None => outcome,
            }
        }
        WindowMessage::KeyDown { vk, system } => {
            let outcome = MessageOutcome::default_processing();
            let Ok(app) = state.app_mut(app_id) else {
                return outcome;
            };
            match keyboard::key_down(&mut app.modifiers, vk, system) {
                Some(key) => outcome.event(AppEvent::Keypress { app: app_id, key }),
                None => outcome,
            }
        }
        WindowMessage::KeyUp { vk } => {
            if let Ok(app) = state.app_mut(app_id) {
                keyboard::key_up(&mut app.modifiers, vk);
            }
            MessageOutcome::default_processing()
        }
        WindowMessage::MouseWheel { delta } => {
            let lines = native.wheel_scroll_lines();
            if let Some((action, count)) = wheel_scroll_plan(delta, lines) {
                log::trace!("AppHandler: wheel {delta} -> {action:?} x{count} (lines {lines})");
                for _ in 0..count {
                    apply_vertical_scroll(state, native, primary, action);
                }
            }
            MessageOutcome::default_processing()
        }
        WindowMessage::VScroll(action) => {
            apply_vertical_scroll(state, native, primary, action);
            MessageOutcome::default_processing()
        }
        WindowMessage::Timer { id } => timer(state, native, app_id, window, id),
        _ => shared_message(state, native, primary, window, message),
    }
}

/*
 * Recomputes the client size, widening it by the scrollbar when the window
 * has a frame wider than the scrollbar, so content is laid out as if the
 * scrollbar were absent. The canvas is resized before it is painted.
 */
fn paint(
    state: &mut BackendState,
    native: &dyn NativeOps,
    app_id: AppId,
    window: NativeHandle,
) -> MessageOutcome {
    let client = native.client_rect(window);
    let scrollbar = native.vertical_scrollbar_width();
    let (edge_w, _) = decoration_size(native, window);
    let mut width = client.right;
    if edge_w > scrollbar {
        width += scrollbar;
    }
    let height = client.bottom;

    let Ok(app) = state.app_mut(app_id) else {
        return MessageOutcome::default_processing();
    };
    app.width = width;
    app.height = height;
    log::trace!("AppHandler: WM_PAINT for app {app_id:?} at {width}x{height}");

    let mut outcome = MessageOutcome::default_processing().event(AppEvent::CanvasResized {
        canvas: app.canvas,
        width,
        height,
    });
    outcome.paint = Some(app.slot);
    outcome
}

fn timer(
    state: &mut BackendState,
    native: &dyn NativeOps,
    app_id: AppId,
    window: NativeHandle,
    id: usize,
) -> MessageOutcome {
    let outcome = MessageOutcome::default_processing();
    let Ok(raw) = i32::try_from(id) else {
        return outcome;
    };
    let Ok(app) = state.app_mut(app_id) else {
        return outcome;
    };
    let id = ControlId::new(raw);
    let Some(entry) = app.extras.resolve(id).copied() else {
        log::trace!("AppHandler: WM_TIMER for unknown ID {raw}");
        return outcome;
    };
    // A WM_TIMER already queued survives KillTimer; the tombstone drops it.
    if entry.kind == ExtraKind::OneShotTimer {
        app.extras.remove_id(id);
        native.kill_timer(window, raw);
    }
    outcome.event(AppEvent::TimerFired {
        app: app_id,
        timer: entry.object,
    })
}
