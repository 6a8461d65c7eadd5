/*
 * Message handling for nested slot windows, plus the pieces the application
 * handler shares with it: pointer translation, focus bookkeeping and control
 * notifications.
 *
 * Pointer coordinates are always reported in the application's logical space:
 * the point is remapped into the client area of the application window and the
 * primary slot's scroll offset is added.
 */
use crate::message::{BN_CLICKED, CBN_SELCHANGE, EN_CHANGE, MessageOutcome, WindowMessage};
use crate::native::NativeOps;
use crate::registry;
use crate::scroll::{self, apply_vertical_scroll};
use crate::state::BackendState;
use crate::types::{AppEvent, AppId, ControlId, MouseButton, NativeHandle, Point, SlotId};

pub fn handle_slot_message(
    state: &mut BackendState,
    native: &dyn NativeOps,
    slot_id: SlotId,
    window: NativeHandle,
    message: WindowMessage,
) -> MessageOutcome {
    let (app_id, canvas) = match state.slot(slot_id) {
        Ok(slot) => (slot.app, slot.canvas),
        Err(err) => {
            log::trace!("SlotHandler: {err}; using default processing");
            return MessageOutcome::default_processing();
        }
    };

    match message {
        WindowMessage::EraseBackground => MessageOutcome::handled(1),
        WindowMessage::Paint => {
            let app_canvas = state.app(app_id).map(|app| app.canvas).ok();
            let mut outcome = MessageOutcome::handled(1);
            if app_canvas == Some(canvas) {
                // The application window paints this canvas; drop the update region here.
                native.validate(window);
            } else {
                outcome.paint = Some(slot_id);
            }
            outcome
        }
        WindowMessage::VScroll(action) => {
            apply_vertical_scroll(state, native, slot_id, action);
            MessageOutcome::default_processing()
        }
        WindowMessage::ButtonDown { .. }
        | WindowMessage::ButtonUp { .. }
        | WindowMessage::MouseMove { .. } => {
            let app_window = state.app(app_id).map(|app| app.window).unwrap_or(window);
            pointer_message(state, native, app_id, window, app_window, message)
        }
        _ => shared_message(state, native, slot_id, window, message),
    }
}

/*
 * Translates a pointer message arriving on `source` into a click, release or
 * motion event. Motion is reported as handled; button messages fall through to
 * default processing.
 */
pub(crate) fn pointer_message(
    state: &BackendState,
    native: &dyn NativeOps,
    app_id: AppId,
    source: NativeHandle,
    app_window: NativeHandle,
    message: WindowMessage,
) -> MessageOutcome {
    let scrolly = state
        .primary_slot(app_id)
        .map(|slot| slot.scrolly)
        .unwrap_or(0);
    let to_app = |point: Point| scroll::to_slot_point(native, point, source, app_window, scrolly);

    match message {
        WindowMessage::ButtonDown { button, point } => {
            let p = to_app(point);
            MessageOutcome::default_processing().event(click(app_id, button, p))
        }
        WindowMessage::ButtonUp { button, point } => {
            let p = to_app(point);
            MessageOutcome::default_processing().event(AppEvent::Release {
                app: app_id,
                button,
                x: p.x,
                y: p.y,
            })
        }
        WindowMessage::MouseMove { point } => {
            let p = to_app(point);
            MessageOutcome::handled(1).event(AppEvent::Motion {
                app: app_id,
                x: p.x,
                y: p.y,
            })
        }
        _ => MessageOutcome::default_processing(),
    }
}

fn click(app: AppId, button: MouseButton, p: Point) -> AppEvent {
    AppEvent::Click {
        app,
        button,
        x: p.x,
        y: p.y,
    }
}

/*
 * Focus and control notifications, handled the same way for slot windows and
 * for the application window (against its primary slot). Unresolvable control
 * ids are dropped.
 */
pub(crate) fn shared_message(
    state: &mut BackendState,
    native: &dyn NativeOps,
    slot_id: SlotId,
    window: NativeHandle,
    message: WindowMessage,
) -> MessageOutcome {
    let outcome = MessageOutcome::default_processing();
    match message {
        WindowMessage::Activate { inactive: true } => {
            let focused = native.focused_window();
            if let Some(object) = state.record_focus(slot_id, focused) {
                log::trace!("SlotHandler: remembered focus {object:?} for slot {slot_id:?}");
            }
            outcome
        }
        WindowMessage::SetFocus => match state.focus_of(slot_id) {
            Some(control) => outcome.event(AppEvent::FocusRequested { control }),
            None => outcome,
        },
        WindowMessage::HScroll {
            thumb_track: true,
            control,
        } => {
            let id = ControlId::new(native.control_id_of(control));
            match state.resolve_control(slot_id, id) {
                Some(entry) => outcome.event(AppEvent::ControlChanged {
                    control: entry.object,
                }),
                None => {
                    log::trace!("SlotHandler: no control for trackbar ID {}", id.raw());
                    outcome
                }
            }
        }
        WindowMessage::Command {
            notification,
            id,
            control,
        } if !control.is_null() => {
            let Some(entry) = state.resolve_control(slot_id, ControlId::new(id)) else {
                log::trace!(
                    "SlotHandler: WM_COMMAND {notification:#x} for unknown ID {id} (base {})",
                    registry::CONTROL_ID_BASE
                );
                return outcome;
            };
            match notification {
                BN_CLICKED => outcome.event(AppEvent::ControlClicked {
                    control: entry.object,
                }),
                CBN_SELCHANGE | EN_CHANGE => outcome.event(AppEvent::ControlChanged {
                    control: entry.object,
                }),
                _ => outcome,
            }
        }
        _ => {
            log::trace!("SlotHandler: {message:?} on {window:?} left to default processing");
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageResult;
    use crate::native::ScrollMetrics;
    use crate::scroll::ScrollAction;
    use crate::state::ControlEntry;
    use crate::test_support::FakeNative;
    use crate::types::{CanvasId, ControlKind, ObjectRef, WindowConfig};

    const APP_WINDOW: NativeHandle = NativeHandle(0x100);
    const SLOT_WINDOW: NativeHandle = NativeHandle(0x200);

    struct Fixture {
        state: BackendState,
        native: FakeNative,
        app: AppId,
        slot: SlotId,
    }

    fn fixture() -> Fixture {
        let mut state = BackendState::new();
        let app = state.create_application(&WindowConfig::default(), CanvasId(1));
        state.attach_app_window(app, APP_WINDOW).unwrap();
        let primary = state.app(app).unwrap().slot;
        let slot = state.create_slot(primary, CanvasId(2), true, false).unwrap();
        state.attach_slot_window(slot, SLOT_WINDOW).unwrap();
        Fixture {
            state,
            native: FakeNative::new(),
            app,
            slot,
        }
    }

    fn register(f: &mut Fixture, object: u64, handle: isize) -> ControlId {
        f.state
            .register_control(
                f.slot,
                ControlEntry {
                    object: ObjectRef(object),
                    handle: NativeHandle(handle),
                    kind: ControlKind::Button,
                },
            )
            .unwrap()
    }

    fn send(f: &mut Fixture, message: WindowMessage) -> MessageOutcome {
        handle_slot_message(&mut f.state, &f.native, f.slot, SLOT_WINDOW, message)
    }

    #[test]
    fn erase_background_is_suppressed() {
        let mut f = fixture();
        assert_eq!(
            send(&mut f, WindowMessage::EraseBackground).result,
            MessageResult::Handled(1)
        );
    }

    #[test]
    fn paint_of_nested_canvas_requests_paint_cycle() {
        let mut f = fixture();
        let outcome = send(&mut f, WindowMessage::Paint);
        assert_eq!(outcome.paint, Some(f.slot));
        assert_eq!(outcome.result, MessageResult::Handled(1));
    }

    #[test]
    fn paint_of_application_canvas_only_validates() {
        // Arrange
        let mut f = fixture();
        let primary = f.state.app(f.app).unwrap().slot;
        f.state.slot_mut(f.slot).unwrap().canvas = f.state.slot(primary).unwrap().canvas;
        // Act
        let outcome = send(&mut f, WindowMessage::Paint);
        // Assert
        assert_eq!(outcome.paint, None);
        assert_eq!(f.native.validated(), vec![SLOT_WINDOW]);
    }

    #[test]
    fn pointer_is_mapped_into_app_space_plus_primary_scroll() {
        // Arrange
        let mut f = fixture();
        f.native.set_window_origin(SLOT_WINDOW, Point::new(50, 80));
        f.native.set_window_origin(APP_WINDOW, Point::new(10, 20));
        let primary = f.state.app(f.app).unwrap().slot;
        f.state.slot_mut(primary).unwrap().scrolly = 100;
        // Act
        let outcome = send(
            &mut f,
            WindowMessage::ButtonDown {
                button: MouseButton::Right,
                point: Point::new(3, 4),
            },
        );
        // Assert
        assert_eq!(
            outcome.events,
            vec![AppEvent::Click {
                app: f.app,
                button: MouseButton::Right,
                x: 43,
                y: 164,
            }]
        );
        assert_eq!(outcome.result, MessageResult::Default);
    }

    #[test]
    fn mouse_move_is_handled() {
        let mut f = fixture();
        let outcome = send(
            &mut f,
            WindowMessage::MouseMove {
                point: Point::new(1, 2),
            },
        );
        assert_eq!(outcome.result, MessageResult::Handled(1));
        assert!(matches!(outcome.events[0], AppEvent::Motion { .. }));
    }

    #[test]
    fn vertical_scroll_moves_the_slot() {
        let mut f = fixture();
        f.native.set_scroll(
            SLOT_WINDOW,
            ScrollMetrics {
                min: 0,
                max: 999,
                page: 200,
                pos: 0,
            },
        );
        send(&mut f, WindowMessage::VScroll(ScrollAction::LineDown));
        assert_eq!(f.state.slot(f.slot).unwrap().scrolly, 16);
        assert_eq!(f.native.repaints(), vec![SLOT_WINDOW]);
    }

    #[test]
    fn deactivate_then_focus_restores_the_focused_control() {
        // Arrange
        let mut f = fixture();
        register(&mut f, 1, 0x301);
        register(&mut f, 2, 0x302);
        f.native.set_focused(NativeHandle(0x302));
        // Act
        send(&mut f, WindowMessage::Activate { inactive: true });
        let outcome = send(&mut f, WindowMessage::SetFocus);
        // Assert
        assert_eq!(
            outcome.events,
            vec![AppEvent::FocusRequested {
                control: ObjectRef(2)
            }]
        );
    }

    #[test]
    fn set_focus_without_recorded_control_emits_nothing() {
        let mut f = fixture();
        assert!(send(&mut f, WindowMessage::SetFocus).events.is_empty());
    }

    #[test]
    fn command_click_and_change_resolve_by_id() {
        let mut f = fixture();
        let button = register(&mut f, 5, 0x305);
        let edit = register(&mut f, 6, 0x306);

        let clicked = send(
            &mut f,
            WindowMessage::Command {
                notification: BN_CLICKED,
                id: button.raw(),
                control: NativeHandle(0x305),
            },
        );
        let changed = send(
            &mut f,
            WindowMessage::Command {
                notification: EN_CHANGE,
                id: edit.raw(),
                control: NativeHandle(0x306),
            },
        );

        assert_eq!(
            clicked.events,
            vec![AppEvent::ControlClicked {
                control: ObjectRef(5)
            }]
        );
        assert_eq!(
            changed.events,
            vec![AppEvent::ControlChanged {
                control: ObjectRef(6)
            }]
        );
    }

    #[test]
    fn menu_commands_and_unknown_ids_are_ignored() {
        let mut f = fixture();
        let id = register(&mut f, 5, 0x305);
        let from_menu = send(
            &mut f,
            WindowMessage::Command {
                notification: BN_CLICKED,
                id: id.raw(),
                control: NativeHandle::NULL,
            },
        );
        let unknown = send(
            &mut f,
            WindowMessage::Command {
                notification: BN_CLICKED,
                id: 42,
                control: NativeHandle(0x305),
            },
        );
        assert!(from_menu.events.is_empty());
        assert!(unknown.events.is_empty());
    }

    #[test]
    fn trackbar_thumb_track_emits_change() {
        let mut f = fixture();
        let id = register(&mut f, 9, 0x309);
        f.native.set_control_id(NativeHandle(0x309), id.raw());

        let outcome = send(
            &mut f,
            WindowMessage::HScroll {
                thumb_track: true,
                control: NativeHandle(0x309),
            },
        );

        assert_eq!(
            outcome.events,
            vec![AppEvent::ControlChanged {
                control: ObjectRef(9)
            }]
        );
    }
}
