//! Scoped input subscriptions.
//!
//! Elements acquire their input listeners when they are created and hand
//! them back when dropped: [`InputBus::subscribe`] returns a
//! [`Subscription`] guard whose `Drop` removes the listener. Everything is
//! single-threaded and lives on the frame thread.
//!
//! Listeners are expected to do nothing but store the raw sample in a
//! [`Mailbox`]; the element's frame callback picks it up.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_input_model::event::InputEvent;

type Listener = Rc<RefCell<dyn FnMut(&InputEvent)>>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    dispatched: u64,
}

impl BusInner {
    fn is_registered(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Fan-out of raw input events to element listeners. Cloning shares the
/// same listener list.
#[derive(Clone, Default)]
pub struct InputBus {
    inner: Rc<RefCell<BusInner>>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&InputEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        inner.listeners.push((id, listener));
        tracing::trace!(id, listeners = inner.listeners.len(), "Input listener added");
        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current listener in subscription order.
    ///
    /// Listeners may subscribe or unsubscribe while the event is being
    /// delivered. New listeners see the next event; removed ones are not
    /// called again, even for this one.
    pub fn dispatch(&self, event: &InputEvent) {
        let snapshot: Vec<(u64, Listener)> = {
            let mut inner = self.inner.borrow_mut();
            inner.dispatched += 1;
            inner.listeners.clone()
        };
        for (id, listener) in snapshot {
            if !self.inner.borrow().is_registered(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut call) => (*call)(event),
                Err(_) => {
                    tracing::warn!(id, "Re-entrant input dispatch skipped for listener");
                }
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Events dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.inner.borrow().dispatched
    }
}

impl std::fmt::Debug for InputBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("InputBus")
            .field("listeners", &inner.listeners.len())
            .field("dispatched", &inner.dispatched)
            .finish()
    }
}

/// Guard for one registered listener.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// Whether the listener is still registered on a live bus.
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|bus| bus.borrow().is_registered(self.id))
    }

    /// Unsubscribe now. Same as dropping the guard.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            let mut inner = bus.borrow_mut();
            inner.listeners.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, listeners = inner.listeners.len(), "Input listener removed");
        }
    }
}

/// Single-slot inbox shared between a listener and its element. Writing
/// overwrites; the frame callback takes whatever is newest.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn post(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }

    pub fn take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }

    pub fn has_mail(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Edit the pending value in place, inserting the default first.
    pub fn update(&self, edit: impl FnOnce(&mut T))
    where
        T: Default,
    {
        let mut slot = self.slot.borrow_mut();
        edit(slot.get_or_insert_with(T::default));
    }
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
