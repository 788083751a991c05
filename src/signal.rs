//! Single-threaded listener registry.
//!
//! `Listeners<T>` fans a value out to every registered callback. Registering
//! returns a `Subscription`; dropping it unregisters the callback, so a listener
//! can never outlive the component that owns the guard.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

impl<T> Slots<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(i, _)| *i == id)
    }
}

/// A list of callbacks interested in values of type `T`.
pub struct Listeners<T> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> Listeners<T> {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays registered until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots
                .entries
                .push((id, Rc::new(RefCell::new(Box::new(callback)))));
            id
        };

        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().entries.retain(|(i, _)| *i != id);
            }
        })
    }

    /// Call every registered listener with `value`, in registration order.
    pub fn emit(&self, value: &T) {
        // Snapshot so callbacks may subscribe or unsubscribe while we iterate.
        let snapshot: Vec<(u64, Callback<T>)> = self
            .slots
            .borrow()
            .entries
            .iter()
            .map(|(id, cb)| (*id, cb.clone()))
            .collect();

        for (id, cb) in snapshot {
            if !self.slots.borrow().contains(id) {
                continue;
            }
            if let Ok(mut f) = cb.try_borrow_mut() {
                (*f)(value);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard for a registered callback. Dropping it releases the registration.
#[must_use = "dropping a Subscription unregisters it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
