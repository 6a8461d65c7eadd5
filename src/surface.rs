/*
 * Surface lifecycle for a paint cycle. A drawing surface is bound to the device
 * context returned by BeginPaint, translated by the slot's scroll offset, handed
 * to the toolkit for drawing and destroyed before EndPaint, all inside one
 * WM_PAINT.
 *
 * Rendering itself belongs to the external graphics library behind
 * `SurfaceProvider`.
 */
use crate::native::NativeOps;
use crate::state::{BackendState, SlotKind};
use crate::types::{NativeHandle, SlotId};

use std::any::Any;

/// A vector drawing context produced by the graphics library.
pub trait DrawingSurface {
    fn translate(&mut self, dx: f64, dy: f64);

    /// Gives the toolkit access to the concrete surface type it draws with.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Creates and destroys drawing surfaces over a device context.
pub trait SurfaceProvider {
    /// `None` when the surface cannot be created.
    fn create_surface(&mut self, dc: NativeHandle) -> Option<Box<dyn DrawingSurface>>;
    fn destroy_surface(&mut self, surface: Box<dyn DrawingSurface>);
}

/// Provider used when the embedding toolkit does not supply one: paint cycles
/// still begin and end, but nothing is drawn.
#[derive(Debug, Default)]
pub struct NullSurfaceProvider;

#[derive(Debug, Default)]
struct NullSurface;

impl DrawingSurface for NullSurface {
    fn translate(&mut self, _dx: f64, _dy: f64) {}

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SurfaceProvider for NullSurfaceProvider {
    fn create_surface(&mut self, _dc: NativeHandle) -> Option<Box<dyn DrawingSurface>> {
        Some(Box::new(NullSurface))
    }

    fn destroy_surface(&mut self, _surface: Box<dyn DrawingSurface>) {}
}

/// A surface acquired for one paint cycle of a slot.
pub struct ActiveSurface {
    pub slot: SlotId,
    pub window: NativeHandle,
    pub surface: Box<dyn DrawingSurface>,
}

/*
 * Begins painting the slot and creates its surface. Returns `None`, without
 * touching the paint cycle, when the slot already has an active surface.
 * When the slot draws on the application window the client area is cleared first.
 */
pub fn acquire_surface(
    state: &mut BackendState,
    native: &dyn NativeOps,
    provider: &mut dyn SurfaceProvider,
    slot_id: SlotId,
) -> Option<ActiveSurface> {
    let slot = state.slot_mut(slot_id).ok()?;
    if slot.surface_active {
        log::warn!("Surface: slot {slot_id:?} already has an active surface");
        return None;
    }
    let window = slot.window;
    let scrolly = slot.scrolly;
    let draws_on_app_window = !matches!(slot.kind, SlotKind::Nested);

    let dc = native.begin_paint(window);
    if dc.is_null() {
        log::warn!("Surface: BeginPaint returned no DC for slot {slot_id:?}");
        native.end_paint(window);
        return None;
    }
    if draws_on_app_window {
        native.fill_background(window, dc);
    }

    let Some(mut surface) = provider.create_surface(dc) else {
        log::warn!("Surface: provider could not create a surface for slot {slot_id:?}");
        native.end_paint(window);
        return None;
    };
    surface.translate(0.0, -f64::from(scrolly));

    slot.dc = dc;
    slot.surface_active = true;
    Some(ActiveSurface {
        slot: slot_id,
        window,
        surface,
    })
}

pub fn release_surface(
    state: &mut BackendState,
    native: &dyn NativeOps,
    provider: &mut dyn SurfaceProvider,
    active: ActiveSurface,
) {
    provider.destroy_surface(active.surface);
    if let Ok(slot) = state.slot_mut(active.slot) {
        slot.surface_active = false;
        slot.dc = NativeHandle::NULL;
    }
    native.end_paint(active.window);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeNative, FakeSurfaceProvider, RecordingSurface};
    use crate::types::{CanvasId, WindowConfig};

    fn setup() -> (BackendState, SlotId) {
        let mut state = BackendState::new();
        let app = state.create_application(&WindowConfig::default(), CanvasId(1));
        state.attach_app_window(app, NativeHandle(0x10)).unwrap();
        let slot = state.app(app).unwrap().slot;
        state.slot_mut(slot).unwrap().scrolly = 40;
        (state, slot)
    }

    #[test]
    fn acquire_translates_by_negative_scroll_and_release_ends_paint() {
        // Arrange
        let (mut state, slot) = setup();
        let native = FakeNative::new();
        let mut provider = FakeSurfaceProvider::default();
        // Act
        let mut active =
            acquire_surface(&mut state, &native, &mut provider, slot).expect("surface");
        let translations = active
            .surface
            .as_any_mut()
            .downcast_mut::<RecordingSurface>()
            .unwrap()
            .translations
            .clone();
        assert!(state.slot(slot).unwrap().surface_active);
        release_surface(&mut state, &native, &mut provider, active);
        // Assert
        assert_eq!(translations, vec![(0.0, -40.0)]);
        assert!(!state.slot(slot).unwrap().surface_active);
        assert_eq!(provider.destroyed, 1);
        assert_eq!(
            native.calls(),
            vec!["begin_paint 0x10", "fill_background 0x10", "end_paint 0x10"]
        );
    }

    #[test]
    fn second_acquire_on_active_slot_is_a_no_op() {
        let (mut state, slot) = setup();
        let native = FakeNative::new();
        let mut provider = FakeSurfaceProvider::default();
        let first = acquire_surface(&mut state, &native, &mut provider, slot);
        assert!(first.is_some());

        let second = acquire_surface(&mut state, &native, &mut provider, slot);

        assert!(second.is_none());
        assert_eq!(provider.created.len(), 1);
    }

    #[test]
    fn provider_failure_ends_paint_and_leaves_slot_inactive() {
        let (mut state, slot) = setup();
        let native = FakeNative::new();
        let mut provider = FakeSurfaceProvider {
            fail: true,
            ..Default::default()
        };

        assert!(acquire_surface(&mut state, &native, &mut provider, slot).is_none());
        assert!(!state.slot(slot).unwrap().surface_active);
        assert_eq!(native.calls().last().map(String::as_str), Some("end_paint 0x10"));
    }

    #[test]
    fn nested_slot_is_not_cleared_before_drawing() {
        let (mut state, primary) = setup();
        let nested = state.create_slot(primary, CanvasId(2), true, false).unwrap();
        state.attach_slot_window(nested, NativeHandle(0x20)).unwrap();
        let native = FakeNative::new();
        let mut provider = FakeSurfaceProvider::default();

        let active = acquire_surface(&mut state, &native, &mut provider, nested).unwrap();
        release_surface(&mut state, &native, &mut provider, active);

        assert!(!native.calls().iter().any(|c| c.starts_with("fill_background")));
    }
}
