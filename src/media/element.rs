use crate::signal::{Listeners, Subscription};

use super::types::MediaEvent;

/// The playable resource behind a card.
///
/// All calls are synchronous and never fail from the caller's point of view:
/// an element that cannot play simply does nothing. Out-of-range positions are
/// clamped by the element itself.
pub trait MediaElement {
    fn play(&self);
    fn pause(&self);
    fn set_muted(&self, muted: bool);
    /// Current position in seconds.
    fn current_time(&self) -> f64;
    /// Move to `seconds`, clamped to `[0, duration]`.
    fn set_current_time(&self, seconds: f64);
    /// Total length in seconds, `0` until metadata is known.
    fn duration(&self) -> f64;
    /// Where the element publishes its notifications.
    fn notifier(&self) -> &MediaNotifier;
}

/// Notification hub for one media element.
#[derive(Default)]
pub struct MediaNotifier {
    time_update: Listeners<f64>,
    loaded_metadata: Listeners<f64>,
}

impl MediaNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new position every time playback time advances.
    pub fn on_time_update(&self, callback: impl FnMut(f64) + 'static) -> Subscription {
        let mut callback = callback;
        self.time_update.subscribe(move |t| callback(*t))
    }

    /// Called with the duration once metadata is ready.
    pub fn on_loaded_metadata(&self, callback: impl FnMut(f64) + 'static) -> Subscription {
        let mut callback = callback;
        self.loaded_metadata.subscribe(move |d| callback(*d))
    }

    pub fn emit(&self, event: &MediaEvent) {
        match *event {
            MediaEvent::TimeUpdate(t) => self.time_update.emit(&t),
            MediaEvent::LoadedMetadata(d) => {
                // Streams and broken headers report NaN or infinity; keep the
                // duration unknown rather than publishing garbage.
                if d.is_finite() && d >= 0.0 {
                    self.loaded_metadata.emit(&d);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.time_update.len() + self.loaded_metadata.len()
    }
}
