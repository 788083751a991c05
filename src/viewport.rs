//! Viewport intersection observation.
//!
//! A `Viewport` reports, per observed target, whether the target is
//! intersecting the visible area at a given threshold ratio. `ScrollViewport`
//! is the terminal implementation: targets are row spans of the scrolled page
//! content and the visible area is a window of rows starting at the scroll
//! offset.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::signal::Subscription;

/// Index of an observed element in the page (the card index).
pub type TargetId = usize;

pub trait Viewport {
    /// Watch `target`; `callback` receives `true` on entering past `threshold`
    /// and `false` on leaving. Observation ends when the guard is dropped.
    fn observe(
        &self,
        target: TargetId,
        threshold: f64,
        callback: Box<dyn FnMut(bool)>,
    ) -> Subscription;
}

/// Vertical extent of a target in content rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub top: usize,
    pub height: usize,
}

/// Fraction of `span` that lies within rows `[view_top, view_top + view_height)`.
pub fn intersection_ratio(span: Span, view_top: usize, view_height: usize) -> f64 {
    if span.height == 0 {
        return 0.0;
    }
    let start = span.top.max(view_top);
    let end = (span.top + span.height).min(view_top + view_height);
    if end <= start {
        0.0
    } else {
        (end - start) as f64 / span.height as f64
    }
}

/// A zero threshold still requires some overlap.
pub fn is_intersecting(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}

struct Watch {
    id: u64,
    target: TargetId,
    threshold: f64,
    last: Option<bool>,
    callback: Rc<RefCell<Box<dyn FnMut(bool)>>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    watches: Vec<Watch>,
}

/// Viewport over a vertically scrolled list of spans.
#[derive(Default)]
pub struct ScrollViewport {
    spans: Vec<Span>,
    scroll: usize,
    height: usize,
    registry: Rc<RefCell<Registry>>,
}

impl ScrollViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the layout. Nothing is reported until `refresh`.
    pub fn set_geometry(&mut self, spans: Vec<Span>, scroll: usize, height: usize) {
        self.spans = spans;
        self.scroll = scroll;
        self.height = height;
    }

    pub fn ratio_of(&self, target: TargetId) -> f64 {
        self.spans
            .get(target)
            .map_or(0.0, |s| intersection_ratio(*s, self.scroll, self.height))
    }

    /// Notify watchers whose intersection state changed since the last report.
    /// A watcher that has never been reported always gets its current state.
    pub fn refresh(&self) {
        let mut pending = Vec::new();
        {
            let mut registry = self.registry.borrow_mut();
            for w in registry.watches.iter_mut() {
                let now = is_intersecting(self.ratio_of(w.target), w.threshold);
                if w.last != Some(now) {
                    w.last = Some(now);
                    pending.push((w.id, now, w.callback.clone()));
                }
            }
        }

        for (id, intersecting, callback) in pending {
            let still_watching = self.registry.borrow().watches.iter().any(|w| w.id == id);
            if !still_watching {
                continue;
            }
            if let Ok(mut f) = callback.try_borrow_mut() {
                (*f)(intersecting);
            }
        }
    }

    #[cfg(test)]
    pub fn watch_count(&self) -> usize {
        self.registry.borrow().watches.len()
    }
}

impl Viewport for ScrollViewport {
    fn observe(
        &self,
        target: TargetId,
        threshold: f64,
        callback: Box<dyn FnMut(bool)>,
    ) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.watches.push(Watch {
                id,
                target,
                threshold,
                last: None,
                callback: Rc::new(RefCell::new(callback)),
            });
            id
        };

        let weak: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().watches.retain(|w| w.id != id);
            }
        })
    }
}
