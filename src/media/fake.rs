//! In-memory media element for tests.

use std::cell::RefCell;

use super::element::{MediaElement, MediaNotifier};
use super::types::{MediaEvent, clamp_position};

#[derive(Debug, Default, Clone)]
pub struct FakeState {
    pub playing: bool,
    pub muted: bool,
    pub position: f64,
    pub duration: f64,
    pub play_calls: usize,
    pub pause_calls: usize,
}

/// Records every call and clamps seeks like a real element would.
#[derive(Default)]
pub struct FakeMedia {
    pub state: RefCell<FakeState>,
    notifier: MediaNotifier,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration: f64) -> Self {
        let media = Self::new();
        media.state.borrow_mut().duration = duration;
        media
    }

    pub fn snapshot(&self) -> FakeState {
        self.state.borrow().clone()
    }

    /// Advance playback to `position` and fire a time update.
    pub fn advance_to(&self, position: f64) {
        let p = {
            let mut s = self.state.borrow_mut();
            s.position = clamp_position(position, s.duration);
            s.position
        };
        self.notifier.emit(&MediaEvent::TimeUpdate(p));
    }

    /// Fire the current position as a time update.
    pub fn tick(&self) {
        let p = self.state.borrow().position;
        self.notifier.emit(&MediaEvent::TimeUpdate(p));
    }

    pub fn muted(&self) -> bool {
        self.state.borrow().muted
    }

    /// Set the duration and fire a metadata notification.
    pub fn load_metadata(&self, duration: f64) {
        self.state.borrow_mut().duration = duration;
        self.notifier.emit(&MediaEvent::LoadedMetadata(duration));
    }
}

impl MediaElement for FakeMedia {
    fn play(&self) {
        let mut s = self.state.borrow_mut();
        s.playing = true;
        s.play_calls += 1;
    }

    fn pause(&self) {
        let mut s = self.state.borrow_mut();
        s.playing = false;
        s.pause_calls += 1;
    }

    fn set_muted(&self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().position
    }

    fn set_current_time(&self, seconds: f64) {
        let mut s = self.state.borrow_mut();
        s.position = clamp_position(seconds, s.duration);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn notifier(&self) -> &MediaNotifier {
        &self.notifier
    }
}
