//! Scoped global listeners
//!
//! A drag or a scrollbar-thumb drag must still finish when the pointer is
//! released outside the grid, so hosts route every pointer release and move
//! through a [`ListenerRegistry`]. Subscribing returns a [`ListenerGuard`];
//! dropping the guard unsubscribes, however the owning view is torn down.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

/// Pointer events that matter regardless of where they happen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalPointerEvent {
    Move { x: f64, y: f64 },
    /// Button released; `ctrl` is the add-to-selection modifier
    Release { ctrl: bool },
}

type Handler<Ev> = Rc<dyn Fn(&Ev)>;

struct Slots<Ev> {
    next_id: u64,
    handlers: Vec<(u64, Handler<Ev>)>,
}

/// Single-threaded registry of event handlers
pub struct ListenerRegistry<Ev = GlobalPointerEvent> {
    slots: Rc<RefCell<Slots<Ev>>>,
}

impl<Ev: 'static> ListenerRegistry<Ev> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register `handler` until the returned guard is dropped
    #[must_use = "dropping the guard unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> ListenerGuard<Ev>
    where
        F: Fn(&Ev) + 'static,
    {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.handlers.push((id, Rc::new(handler)));
        trace!("LISTENER: subscribed #{} ({} active)", id, slots.handlers.len());

        ListenerGuard {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    /// Deliver `event` to every subscriber. Returns how many were called.
    ///
    /// Handlers run on a snapshot, so they may subscribe or drop guards
    /// without deadlocking the registry.
    pub fn dispatch(&self, event: &Ev) -> usize {
        let snapshot: Vec<Handler<Ev>> = self
            .slots
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in &snapshot {
            handler(event);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<Ev: 'static> Default for ListenerRegistry<Ev> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ev> fmt::Debug for ListenerRegistry<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("active", &self.slots.borrow().handlers.len())
            .finish()
    }
}

/// Subscription handle; unsubscribes on drop
pub struct ListenerGuard<Ev> {
    id: u64,
    slots: Weak<RefCell<Slots<Ev>>>,
}

impl<Ev> ListenerGuard<Ev> {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<Ev> Drop for ListenerGuard<Ev> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.handlers.retain(|(id, _)| *id != self.id);
                trace!("LISTENER: released #{}", self.id);
            }
        }
    }
}

impl<Ev> fmt::Debug for ListenerGuard<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
