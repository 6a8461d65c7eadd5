/*
 * Routes decoded window messages to the application or slot handler of the
 * window that received them, then performs the work the handler deferred:
 * delivering events to the toolkit, running the paint cycle and finishing an
 * application's teardown.
 *
 * Backend state is only borrowed while a handler runs. Events are queued and
 * delivered after that borrow ends, so toolkit callbacks may call back into the
 * backend. Messages that arrive while the toolkit is still busy with an earlier
 * event (a window sent a message synchronously from inside a callback) have
 * their events queued and delivered in order once the outer callback returns.
 */
use crate::app_handler::handle_app_message;
use crate::message::{MessageOutcome, MessageResult, WindowMessage};
use crate::native::NativeOps;
use crate::slot_handler::handle_slot_message;
use crate::state::{BackendState, WindowOwner};
use crate::surface::{SurfaceProvider, acquire_surface, release_surface};
use crate::types::{AppEvent, AppId, NativeHandle, PlatformEventHandler, SlotId};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Work waiting for the toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Event(AppEvent),
    RemoveApplication(AppId),
}

pub struct Dispatcher {
    state: Rc<RefCell<BackendState>>,
    handler: Rc<RefCell<dyn PlatformEventHandler>>,
    provider: Rc<RefCell<dyn SurfaceProvider>>,
    pending: RefCell<VecDeque<Pending>>,
}

impl Dispatcher {
    pub fn new(
        state: Rc<RefCell<BackendState>>,
        handler: Rc<RefCell<dyn PlatformEventHandler>>,
        provider: Rc<RefCell<dyn SurfaceProvider>>,
    ) -> Self {
        Self {
            state,
            handler,
            provider,
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn state(&self) -> &Rc<RefCell<BackendState>> {
        &self.state
    }

    /*
     * Handles one message for `window`. Windows without a registered owner, and
     * messages arriving while the state is borrowed by the backend itself, get
     * default processing.
     */
    pub fn dispatch(
        &self,
        native: &dyn NativeOps,
        window: NativeHandle,
        message: WindowMessage,
    ) -> MessageResult {
        let outcome = {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                log::warn!("Dispatcher: state busy, {message:?} for {window:?} gets default processing");
                return MessageResult::Default;
            };
            match state.owner_of(window) {
                Some(WindowOwner::Application(app)) => {
                    handle_app_message(&mut state, native, app, window, message)
                }
                Some(WindowOwner::Slot(slot)) => {
                    handle_slot_message(&mut state, native, slot, window, message)
                }
                None => return MessageResult::Default,
            }
        };

        let MessageOutcome {
            events,
            paint,
            destroyed,
            result,
        } = outcome;

        {
            let mut pending = self.pending.borrow_mut();
            pending.extend(events.into_iter().map(Pending::Event));
            if let Some(app) = destroyed {
                pending.push_back(Pending::RemoveApplication(app));
            }
        }
        if let Some(app) = destroyed
            && let Ok(mut state) = self.state.try_borrow_mut()
        {
            state.remove_application(app);
        }

        self.deliver(native);
        if let Some(slot) = paint {
            self.paint_slot(native, slot, window);
        }
        result
    }

    /// Forwards a message posted to the hidden sink window.
    pub fn dispatch_host_message(&self, name: u32, wparam: usize, lparam: isize) -> isize {
        match self.handler.try_borrow_mut() {
            Ok(mut handler) => handler.handle_host_message(name, wparam, lparam),
            Err(_) => {
                log::warn!("Dispatcher: toolkit busy, dropping host message {name}");
                0
            }
        }
    }

    /// Queues an event raised by a backend call rather than a window message
    /// and delivers it as soon as the toolkit is free.
    pub fn post_event(&self, native: &dyn NativeOps, event: AppEvent) {
        self.pending.borrow_mut().push_back(Pending::Event(event));
        self.deliver(native);
    }

    fn deliver(&self, native: &dyn NativeOps) {
        let Ok(mut handler) = self.handler.try_borrow_mut() else {
            log::trace!(
                "Dispatcher: toolkit busy, {} item(s) queued",
                self.pending.borrow().len()
            );
            return;
        };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(Pending::Event(event)) => handler.handle_event(event),
                Some(Pending::RemoveApplication(app)) => {
                    if handler.remove_application(app) {
                        log::debug!("Dispatcher: last application {app:?} closed, posting quit");
                        native.post_quit();
                    }
                }
                None => break,
            }
        }
    }

    /*
     * Runs one paint cycle on the slot: acquire the surface, let the toolkit
     * draw its canvas, release. When the toolkit or the state is busy, or the
     * slot is gone, the update region is validated instead.
     */
    fn paint_slot(&self, native: &dyn NativeOps, slot_id: SlotId, window: NativeHandle) {
        let Ok(mut handler) = self.handler.try_borrow_mut() else {
            log::warn!("Dispatcher: toolkit busy, skipping paint of slot {slot_id:?}");
            native.validate(window);
            return;
        };

        let acquired = {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                log::warn!("Dispatcher: state busy, skipping paint of slot {slot_id:?}");
                native.validate(window);
                return;
            };
            let Ok(canvas) = state.slot(slot_id).map(|slot| slot.canvas) else {
                log::trace!("Dispatcher: slot {slot_id:?} is gone, validating {window:?}");
                native.validate(window);
                return;
            };
            let mut provider = self.provider.borrow_mut();
            acquire_surface(&mut state, native, &mut *provider, slot_id)
                .map(|active| (active, canvas))
        };
        let Some((mut active, canvas)) = acquired else {
            return;
        };

        handler.paint_canvas(canvas, active.surface.as_mut());
        drop(handler);

        let mut state = self.state.borrow_mut();
        let mut provider = self.provider.borrow_mut();
        release_surface(&mut state, native, &mut *provider, active);
    }
}
