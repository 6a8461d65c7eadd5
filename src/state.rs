/*
 * Backend state: applications, slots and the registry mapping native window
 * handles back to the object that owns them. Window procedures look the owner
 * up here on every message instead of reading an untyped pointer stored in the
 * window's user data.
 *
 * All mutation happens on the event-loop thread, one message at a time.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::registry::IdRegistry;
use crate::types::{
    AppId, CanvasId, ControlId, ControlKind, CursorKind, ExtraKind, Modifiers, NativeHandle,
    ObjectRef, Rect, SlotId, WindowConfig,
};

use std::collections::HashMap;

/// A native control hosted by a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEntry {
    pub object: ObjectRef,
    pub handle: NativeHandle,
    pub kind: ControlKind,
}

/// An auxiliary per-application object addressed by id (timers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraEntry {
    pub object: ObjectRef,
    pub kind: ExtraKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// The application's root region, drawn on the application window.
    Primary,
    /// A child window of its own.
    Nested,
    /// Shares window, dc and controls with the application's primary slot.
    Toplevel { primary: SlotId },
}

#[derive(Debug)]
pub struct Slot {
    pub app: AppId,
    pub canvas: CanvasId,
    pub kind: SlotKind,
    pub window: NativeHandle,
    /// Device context of the paint cycle in progress, null otherwise.
    pub dc: NativeHandle,
    pub scrolly: i32,
    pub vscroll: bool,
    pub controls: IdRegistry<ControlEntry>,
    pub focus: Option<ObjectRef>,
    pub surface_active: bool,
}

impl Slot {
    fn new(app: AppId, canvas: CanvasId, kind: SlotKind, window: NativeHandle) -> Self {
        Self {
            app,
            canvas,
            kind,
            window,
            dc: NativeHandle::NULL,
            scrolly: 0,
            vscroll: false,
            controls: IdRegistry::new(),
            focus: None,
            surface_active: false,
        }
    }
}

#[derive(Debug)]
pub struct Application {
    pub id: AppId,
    pub window: NativeHandle,
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub fullscreen: bool,
    pub resizable: bool,
    pub dialog: bool,
    /// Window bounds saved before entering fullscreen.
    pub normal_bounds: Rect,
    /// Window style restored when leaving fullscreen.
    pub window_style: u32,
    pub modifiers: Modifiers,
    pub cursor: Option<CursorKind>,
    pub slot: SlotId,
    pub canvas: CanvasId,
    pub extras: IdRegistry<ExtraEntry>,
    /// High surrogate of a character split across two input messages.
    pub pending_surrogate: Option<u16>,
}

impl Application {
    /// Whether the pointer still has to be switched to `kind`.
    pub fn needs_cursor(&self, kind: CursorKind) -> bool {
        self.cursor != Some(kind)
    }

    /// Call only once the native cursor has actually been set.
    pub fn record_cursor(&mut self, kind: CursorKind) {
        self.cursor = Some(kind);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOwner {
    Application(AppId),
    Slot(SlotId),
}

#[derive(Debug, Default)]
pub struct BackendState {
    apps: HashMap<AppId, Application>,
    slots: HashMap<SlotId, Slot>,
    window_owners: HashMap<NativeHandle, WindowOwner>,
    next_app_id: u64,
    next_slot_id: u64,
}

impl BackendState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an application and its primary slot. The native window is
    /// attached separately once it exists.
    pub fn create_application(&mut self, config: &WindowConfig, canvas: CanvasId) -> AppId {
        self.next_app_id += 1;
        let app_id = AppId(self.next_app_id);
        let slot_id = self.allocate_slot_id();
        self.slots.insert(
            slot_id,
            Slot::new(app_id, canvas, SlotKind::Primary, NativeHandle::NULL),
        );
        self.apps.insert(
            app_id,
            Application {
                id: app_id,
                window: NativeHandle::NULL,
                title: config.title.clone(),
                width: config.width,
                height: config.height,
                min_width: config.min_width,
                min_height: config.min_height,
                fullscreen: config.fullscreen,
                resizable: config.resizable,
                dialog: config.dialog,
                normal_bounds: Rect {
                    left: 0,
                    top: 0,
                    right: config.width,
                    bottom: config.height,
                },
                window_style: 0,
                modifiers: Modifiers::default(),
                cursor: None,
                slot: slot_id,
                canvas,
                extras: IdRegistry::new(),
                pending_surrogate: None,
            },
        );
        log::debug!("BackendState: created app {app_id:?} with primary slot {slot_id:?}");
        app_id
    }

    pub fn attach_app_window(&mut self, app_id: AppId, window: NativeHandle) -> PlatformResult<()> {
        let app = self.app_mut(app_id)?;
        app.window = window;
        let slot_id = app.slot;
        self.slot_mut(slot_id)?.window = window;
        self.window_owners
            .insert(window, WindowOwner::Application(app_id));
        Ok(())
    }

    /// Creates a slot under `parent`. A toplevel slot reuses the window of the
    /// application's primary slot; a nested slot gets its window attached later.
    pub fn create_slot(
        &mut self,
        parent: SlotId,
        canvas: CanvasId,
        scrolls: bool,
        toplevel: bool,
    ) -> PlatformResult<SlotId> {
        let (app_id, parent_window) = {
            let parent_slot = self.slot(parent)?;
            (parent_slot.app, parent_slot.window)
        };
        let kind = if toplevel {
            SlotKind::Toplevel {
                primary: self.storage_slot_id(parent),
            }
        } else {
            SlotKind::Nested
        };
        let window = if toplevel {
            parent_window
        } else {
            NativeHandle::NULL
        };
        let slot_id = self.allocate_slot_id();
        let mut slot = Slot::new(app_id, canvas, kind, window);
        slot.vscroll = scrolls;
        self.slots.insert(slot_id, slot);
        log::debug!("BackendState: created {kind:?} slot {slot_id:?} under {parent:?}");
        Ok(slot_id)
    }

    pub fn attach_slot_window(&mut self, slot_id: SlotId, window: NativeHandle) -> PlatformResult<()> {
        self.slot_mut(slot_id)?.window = window;
        self.window_owners.insert(window, WindowOwner::Slot(slot_id));
        Ok(())
    }

    pub fn remove_slot(&mut self, slot_id: SlotId) -> Option<Slot> {
        let slot = self.slots.remove(&slot_id)?;
        if slot.kind == SlotKind::Nested {
            self.window_owners.remove(&slot.window);
        }
        Some(slot)
    }

    /// Forgets an application, every slot it owns and their window handles.
    pub fn remove_application(&mut self, app_id: AppId) -> Option<Application> {
        let app = self.apps.remove(&app_id)?;
        self.slots.retain(|_, slot| slot.app != app_id);
        self.window_owners.retain(|_, owner| match owner {
            WindowOwner::Application(id) => *id != app_id,
            WindowOwner::Slot(_) => true,
        });
        let slots = &self.slots;
        self.window_owners.retain(|_, owner| match owner {
            WindowOwner::Slot(id) => slots.contains_key(id),
            WindowOwner::Application(_) => true,
        });
        log::debug!("BackendState: removed app {app_id:?}");
        Some(app)
    }

    pub fn owner_of(&self, window: NativeHandle) -> Option<WindowOwner> {
        self.window_owners.get(&window).copied()
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    pub fn app(&self, app_id: AppId) -> PlatformResult<&Application> {
        self.apps.get(&app_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("Application {app_id:?} not found"))
        })
    }

    pub fn app_mut(&mut self, app_id: AppId) -> PlatformResult<&mut Application> {
        self.apps.get_mut(&app_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("Application {app_id:?} not found"))
        })
    }

    pub fn slot(&self, slot_id: SlotId) -> PlatformResult<&Slot> {
        self.slots
            .get(&slot_id)
            .ok_or_else(|| PlatformError::InvalidHandle(format!("Slot {slot_id:?} not found")))
    }

    pub fn slot_mut(&mut self, slot_id: SlotId) -> PlatformResult<&mut Slot> {
        self.slots
            .get_mut(&slot_id)
            .ok_or_else(|| PlatformError::InvalidHandle(format!("Slot {slot_id:?} not found")))
    }

    /// The slot whose registry backs `slot_id` (the primary slot for toplevel slots).
    pub fn storage_slot_id(&self, slot_id: SlotId) -> SlotId {
        match self.slots.get(&slot_id).map(|slot| slot.kind) {
            Some(SlotKind::Toplevel { primary }) => primary,
            _ => slot_id,
        }
    }

    pub fn controls(&self, slot_id: SlotId) -> PlatformResult<&IdRegistry<ControlEntry>> {
        let storage = self.storage_slot_id(slot_id);
        Ok(&self.slot(storage)?.controls)
    }

    /// Registers a control in the slot and returns its native id.
    pub fn register_control(
        &mut self,
        slot_id: SlotId,
        entry: ControlEntry,
    ) -> PlatformResult<ControlId> {
        let storage = self.storage_slot_id(slot_id);
        let id = self.slot_mut(storage)?.controls.register(entry);
        log::debug!(
            "BackendState: registered {:?} {:?} as ID {} in slot {storage:?}",
            entry.kind,
            entry.object,
            id.raw()
        );
        Ok(id)
    }

    /// Id the next registered control of the slot will receive.
    pub fn next_control_id(&self, slot_id: SlotId) -> PlatformResult<ControlId> {
        Ok(self.controls(slot_id)?.next_id())
    }

    pub fn resolve_control(&self, slot_id: SlotId, id: ControlId) -> Option<ControlEntry> {
        self.controls(slot_id).ok()?.resolve(id).copied()
    }

    pub fn find_control(&self, slot_id: SlotId, object: ObjectRef) -> Option<(ControlId, ControlEntry)> {
        self.controls(slot_id)
            .ok()?
            .find(|entry| entry.object == object)
            .map(|(id, entry)| (id, *entry))
    }

    /// Tombstones `object` in the slot's registry and clears it as focus.
    pub fn remove_item(&mut self, slot_id: SlotId, object: ObjectRef) -> Option<ControlId> {
        let storage = self.storage_slot_id(slot_id);
        let slot = self.slots.get_mut(&storage)?;
        let removed = slot.controls.remove_where(|entry| entry.object == object);
        if slot.focus == Some(object) {
            slot.focus = None;
        }
        removed
    }

    pub fn clear_controls(&mut self, slot_id: SlotId) -> PlatformResult<()> {
        let storage = self.storage_slot_id(slot_id);
        let slot = self.slot_mut(storage)?;
        slot.controls.clear();
        slot.focus = None;
        Ok(())
    }

    /// Remembers the control whose native window now holds focus, if it
    /// belongs to the slot. Returns the recorded control.
    pub fn record_focus(&mut self, slot_id: SlotId, focused: NativeHandle) -> Option<ObjectRef> {
        if focused.is_null() {
            return None;
        }
        let storage = self.storage_slot_id(slot_id);
        let slot = self.slots.get_mut(&storage)?;
        let (_, entry) = slot.controls.find(|entry| entry.handle == focused)?;
        let object = entry.object;
        slot.focus = Some(object);
        Some(object)
    }

    pub fn focus_of(&self, slot_id: SlotId) -> Option<ObjectRef> {
        let storage = self.storage_slot_id(slot_id);
        self.slots.get(&storage)?.focus
    }

    /// The application's primary slot, which carries the scroll offset that
    /// pointer coordinates are expressed against.
    pub fn primary_slot(&self, app_id: AppId) -> PlatformResult<&Slot> {
        let slot_id = self.app(app_id)?.slot;
        self.slot(slot_id)
    }

    /// Whether `window` is an application window whose primary slot hosts at
    /// least one live control.
    pub fn app_window_has_controls(&self, window: NativeHandle) -> bool {
        match self.owner_of(window) {
            Some(WindowOwner::Application(app_id)) => self
                .primary_slot(app_id)
                .map(|slot| slot.controls.live_count() > 0)
                .unwrap_or(false),
            _ => false,
        }
    }

    fn allocate_slot_id(&mut self) -> SlotId {
        self.next_slot_id += 1;
        SlotId(self.next_slot_id)
    }
}
