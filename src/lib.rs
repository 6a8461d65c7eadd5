/*
 * Win32 backend for a slot/canvas GUI toolkit. Native windows are translated
 * into toolkit events, slots scroll and paint through surfaces bound to the
 * native device context, and native controls are addressed by per-slot ids.
 *
 * The message handlers, scroll arithmetic and id registries are portable and
 * run against the `NativeOps` seam, so they build and test on every platform.
 * Everything that touches Win32 directly is compiled on Windows only and sits
 * behind `PlatformInterface`.
 */
#[cfg(target_os = "windows")]
pub mod app;
pub mod app_handler;
#[cfg(target_os = "windows")]
pub(crate) mod controls;
pub mod dispatcher;
pub mod error;
pub mod event_loop;
pub mod keyboard;
pub mod message;
pub mod native;
pub mod registry;
pub mod scroll;
pub mod slot_handler;
pub mod state;
pub mod surface;
#[cfg(test)]
mod test_support;
pub mod types;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

#[cfg(target_os = "windows")]
pub use app::PlatformInterface;
pub use error::{PlatformError, Result as PlatformResult};
pub use surface::{DrawingSurface, NullSurfaceProvider, SurfaceProvider};
pub use types::{
    AppEvent, AppId, BackendConfig, CanvasId, ControlId, CursorKind, Key, KeyPress, Modifiers,
    MouseButton, NamedKey, NativeHandle, ObjectRef, Place, PlatformEventHandler, Point, Rect,
    SlotId, TimerId, WindowConfig,
};
