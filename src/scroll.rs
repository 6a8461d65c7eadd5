/*
 * Coordinate transforms and the vertical scrolling state machine shared by the
 * application and slot window procedures.
 *
 * Scroll positions are clamped to `[0, max(0, max - page)]`. Line steps move 16
 * units, page steps move one page minus 32 so a strip of the previous page stays
 * visible.
 */
use crate::native::{NativeOps, ScrollMetrics};
use crate::state::BackendState;
use crate::types::{NativeHandle, Place, Point, Rect, SlotId};

pub const LINE_STEP: i32 = 16;
pub const PAGE_MARGIN: i32 = 32;
/// Wheel delta reported for one notch.
pub const WHEEL_DELTA: i32 = 120;
/// `wheel_scroll_lines` value meaning "scroll a whole page per notch".
pub const WHEEL_PAGESCROLL: u32 = u32::MAX;

/// Discrete scroll requests, decoded from scrollbar notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    ThumbTrack(i32),
    /// Any other scrollbar code; ignored.
    Other(u32),
}

pub fn clamp_scroll(pos: i32, max: i32, page: i32) -> i32 {
    let upper = max.saturating_sub(page).max(0);
    pos.clamp(0, upper)
}

/// New scroll position for `action`, or `None` when the action is not a move.
pub fn next_scroll_position(metrics: ScrollMetrics, action: ScrollAction) -> Option<i32> {
    let raw = match action {
        ScrollAction::LineUp => metrics.pos - LINE_STEP,
        ScrollAction::LineDown => metrics.pos + LINE_STEP,
        ScrollAction::PageUp => metrics.pos - (metrics.page - PAGE_MARGIN),
        ScrollAction::PageDown => metrics.pos + (metrics.page - PAGE_MARGIN),
        ScrollAction::ThumbTrack(pos) => pos,
        ScrollAction::Other(_) => return None,
    };
    Some(clamp_scroll(raw, metrics.max, metrics.page))
}

/*
 * Applies `action` to the slot's scrollbar, stores the resulting offset on the
 * slot (and on the application's primary slot when both draw on the same
 * window), then asks the slot window to repaint. Returns the new offset.
 */
pub fn apply_vertical_scroll(
    state: &mut BackendState,
    native: &dyn NativeOps,
    slot_id: SlotId,
    action: ScrollAction,
) -> Option<i32> {
    let (window, app_id) = match state.slot(slot_id) {
        Ok(slot) => (slot.window, slot.app),
        Err(err) => {
            log::warn!("Scroll: {err}");
            return None;
        }
    };

    let mut metrics = native.vertical_scroll_metrics(window);
    let new_pos = match next_scroll_position(metrics, action) {
        Some(pos) => pos,
        None => {
            log::trace!("Scroll: ignoring {action:?} for slot {slot_id:?}");
            return None;
        }
    };
    metrics.pos = new_pos;
    native.set_vertical_scroll_metrics(window, metrics);

    if let Ok(slot) = state.slot_mut(slot_id) {
        slot.scrolly = new_pos;
    }
    if let Ok(primary_id) = state.app(app_id).map(|app| app.slot)
        && primary_id != slot_id
        && let Ok(primary) = state.slot_mut(primary_id)
        && primary.window == window
    {
        primary.scrolly = new_pos;
    }

    log::trace!("Scroll: slot {slot_id:?} {action:?} -> {new_pos}");
    native.request_repaint(window);
    Some(new_pos)
}

/// Maps a point from `source` client space into `slot_window` client space and
/// adds the slot's scroll offset to y.
pub fn to_slot_point(
    native: &dyn NativeOps,
    point: Point,
    source: NativeHandle,
    slot_window: NativeHandle,
    scrolly: i32,
) -> Point {
    let mapped = if source == slot_window {
        point
    } else {
        native.map_point(source, slot_window, point)
    };
    Point::new(mapped.x, mapped.y + scrolly)
}

/*
 * Converts a wheel delta into the action to repeat and how many times.
 * Notches truncate toward zero; a negative delta scrolls down.
 */
pub fn wheel_scroll_plan(delta: i32, lines_per_notch: u32) -> Option<(ScrollAction, u32)> {
    let notches = delta / WHEEL_DELTA;
    let down = delta < 0;
    let (action, count) = if lines_per_notch == WHEEL_PAGESCROLL {
        let action = if down {
            ScrollAction::PageDown
        } else {
            ScrollAction::PageUp
        };
        (action, notches.unsigned_abs())
    } else {
        let action = if down {
            ScrollAction::LineDown
        } else {
            ScrollAction::LineUp
        };
        let lines = i64::from(notches) * i64::from(lines_per_notch);
        (action, u32::try_from(lines.unsigned_abs()).unwrap_or(u32::MAX))
    };
    (count > 0).then_some((action, count))
}

/// Scrollbar metrics for a slot whose content ends at `content_end` and whose
/// visible height is `view_height`.
pub fn slot_scroll_range(content_end: i32, view_height: i32, pos: i32) -> ScrollMetrics {
    ScrollMetrics {
        min: 0,
        max: content_end - 1,
        page: view_height,
        pos,
    }
}

/// Native bounds of an element placed at `place` inside a parent scrolled by `scrolly`.
pub fn scrolled_bounds(place: Place, scrolly: i32) -> Rect {
    let top = place.top() - scrolly;
    Rect {
        left: place.left(),
        top,
        right: place.left() + place.iw,
        bottom: top + place.ih,
    }
}

/*
 * Where a control must move after its slot scrolled. `shown` is the place the
 * control was last positioned at, `place` its layout place; the control only
 * moves when the scroll-adjusted place differs from what is shown.
 */
pub fn control_reposition(shown: Place, place: Place, scrolly: i32) -> Option<Rect> {
    let target = Place {
        iy: place.iy - scrolly,
        ..place
    };
    let changed = shown.ix != target.ix
        || shown.iy != target.iy
        || shown.iw != target.iw
        || shown.ih != target.ih;
    changed.then(|| scrolled_bounds(target, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeNative;
    use crate::types::{CanvasId, WindowConfig};

    fn metrics(pos: i32, max: i32, page: i32) -> ScrollMetrics {
        ScrollMetrics {
            min: 0,
            max,
            page,
            pos,
        }
    }

    #[test]
    fn clamp_stays_within_range_for_all_inputs() {
        for max in [-50, 0, 10, 100, 1000] {
            for page in [0, 5, 50, 200, 2000] {
                for pos in [-500, -1, 0, 1, 49, 50, 51, 999, 5000] {
                    let clamped = clamp_scroll(pos, max, page);
                    let upper = (max - page).max(0);
                    assert!(
                        (0..=upper).contains(&clamped),
                        "pos {pos} max {max} page {page} -> {clamped}"
                    );
                }
            }
        }
    }

    #[test]
    fn line_steps_move_sixteen_units() {
        let m = metrics(100, 1000, 200);
        assert_eq!(next_scroll_position(m, ScrollAction::LineDown), Some(116));
        assert_eq!(next_scroll_position(m, ScrollAction::LineUp), Some(84));
    }

    #[test]
    fn page_steps_keep_a_strip_of_the_previous_page() {
        let m = metrics(100, 1000, 200);
        assert_eq!(next_scroll_position(m, ScrollAction::PageDown), Some(268));
        assert_eq!(next_scroll_position(m, ScrollAction::PageUp), Some(0));
    }

    #[test]
    fn thumb_track_is_clamped() {
        let m = metrics(0, 500, 100);
        assert_eq!(next_scroll_position(m, ScrollAction::ThumbTrack(450)), Some(400));
        assert_eq!(next_scroll_position(m, ScrollAction::ThumbTrack(-3)), Some(0));
    }

    #[test]
    fn unrecognized_actions_are_ignored() {
        assert_eq!(
            next_scroll_position(metrics(0, 100, 10), ScrollAction::Other(8)),
            None
        );
    }

    #[test]
    fn repeated_line_down_is_monotonic_and_clamped() {
        let (range, page) = (300, 100);
        for n in 0..30 {
            let mut m = metrics(0, range, page);
            let mut previous = 0;
            for _ in 0..n {
                m.pos = next_scroll_position(m, ScrollAction::LineDown).unwrap();
                assert!(m.pos >= previous);
                previous = m.pos;
            }
            assert_eq!(m.pos, (range - page).min(LINE_STEP * n));
        }
    }

    #[test]
    fn apply_vertical_scroll_updates_slot_and_requests_repaint() {
        // Arrange
        let native = FakeNative::new();
        let mut state = BackendState::new();
        let app = state.create_application(&WindowConfig::default(), CanvasId(1));
        state.attach_app_window(app, NativeHandle(0x10)).unwrap();
        let slot = state.app(app).unwrap().slot;
        native.set_scroll(NativeHandle(0x10), metrics(0, 1000, 300));
        // Act
        let pos = apply_vertical_scroll(&mut state, &native, slot, ScrollAction::PageDown);
        // Assert
        assert_eq!(pos, Some(268));
        assert_eq!(state.slot(slot).unwrap().scrolly, 268);
        assert_eq!(native.scroll(NativeHandle(0x10)).pos, 268);
        assert_eq!(native.repaints(), vec![NativeHandle(0x10)]);
    }

    #[test]
    fn toplevel_scroll_is_mirrored_onto_primary_slot() {
        let native = FakeNative::new();
        let mut state = BackendState::new();
        let app = state.create_application(&WindowConfig::default(), CanvasId(1));
        state.attach_app_window(app, NativeHandle(0x10)).unwrap();
        let primary = state.app(app).unwrap().slot;
        let toplevel = state.create_slot(primary, CanvasId(2), true, true).unwrap();
        native.set_scroll(NativeHandle(0x10), metrics(0, 1000, 300));

        apply_vertical_scroll(&mut state, &native, toplevel, ScrollAction::LineDown);

        assert_eq!(state.slot(toplevel).unwrap().scrolly, 16);
        assert_eq!(state.slot(primary).unwrap().scrolly, 16);
    }

    #[test]
    fn nested_scroll_does_not_touch_primary_slot() {
        let native = FakeNative::new();
        let mut state = BackendState::new();
        let app = state.create_application(&WindowConfig::default(), CanvasId(1));
        state.attach_app_window(app, NativeHandle(0x10)).unwrap();
        let primary = state.app(app).unwrap().slot;
        let nested = state.create_slot(primary, CanvasId(2), true, false).unwrap();
        state.attach_slot_window(nested, NativeHandle(0x20)).unwrap();
        native.set_scroll(NativeHandle(0x20), metrics(0, 1000, 300));

        apply_vertical_scroll(&mut state, &native, nested, ScrollAction::LineDown);

        assert_eq!(state.slot(nested).unwrap().scrolly, 16);
        assert_eq!(state.slot(primary).unwrap().scrolly, 0);
    }

    #[test]
    fn slot_point_adds_scroll_offset_after_mapping() {
        let native = FakeNative::new();
        native.set_window_origin(NativeHandle(0x20), Point::new(30, 40));
        native.set_window_origin(NativeHandle(0x10), Point::new(0, 0));

        let p = to_slot_point(
            &native,
            Point::new(5, 6),
            NativeHandle(0x20),
            NativeHandle(0x10),
            100,
        );

        assert_eq!(p, Point::new(35, 146));
    }

    #[test]
    fn slot_point_on_same_window_only_adds_offset() {
        let native = FakeNative::new();
        let p = to_slot_point(&native, Point::new(7, 8), NativeHandle(1), NativeHandle(1), 9);
        assert_eq!(p, Point::new(7, 17));
    }

    #[test]
    fn wheel_plan_multiplies_notches_by_lines() {
        assert_eq!(
            wheel_scroll_plan(-3 * WHEEL_DELTA, 1),
            Some((ScrollAction::LineDown, 3))
        );
        assert_eq!(
            wheel_scroll_plan(2 * WHEEL_DELTA, 3),
            Some((ScrollAction::LineUp, 6))
        );
    }

    #[test]
    fn wheel_plan_uses_pages_when_configured() {
        assert_eq!(
            wheel_scroll_plan(-2 * WHEEL_DELTA, WHEEL_PAGESCROLL),
            Some((ScrollAction::PageDown, 2))
        );
    }

    #[test]
    fn partial_notches_do_nothing() {
        assert_eq!(wheel_scroll_plan(60, 3), None);
        assert_eq!(wheel_scroll_plan(-119, 3), None);
    }

    #[test]
    fn slot_range_uses_last_content_row_as_max() {
        assert_eq!(
            slot_scroll_range(800, 300, 12),
            ScrollMetrics {
                min: 0,
                max: 799,
                page: 300,
                pos: 12
            }
        );
    }

    #[test]
    fn scrolled_bounds_shift_up_by_parent_scroll() {
        let place = Place {
            ix: 10,
            iy: 100,
            dx: 5,
            dy: 20,
            iw: 200,
            ih: 50,
        };

        let bounds = scrolled_bounds(place, 40);

        assert_eq!(
            bounds,
            Rect {
                left: 15,
                top: 80,
                right: 215,
                bottom: 130
            }
        );
    }

    #[test]
    fn control_only_moves_when_scrolled_place_differs() {
        let place = Place {
            ix: 0,
            iy: 60,
            dx: 0,
            dy: 0,
            iw: 80,
            ih: 20,
        };
        let shown = Place { iy: 30, ..place };

        assert_eq!(control_reposition(shown, place, 30), None);
        assert_eq!(
            control_reposition(shown, place, 45),
            Some(Rect {
                left: 0,
                top: 15,
                right: 80,
                bottom: 35
            })
        );
    }
}
