//! Commands, notifications and shared handles of the media subsystem.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Identifies one media element inside the runtime. The app uses the card index.
pub type ElementId = usize;

#[derive(Debug)]
pub enum MediaCmd {
    /// Open `path` for element `id` and prepare a paused sink at position 0.
    Load {
        id: ElementId,
        path: PathBuf,
        info: ElementHandle,
        autoplay: bool,
        muted: bool,
        looping: bool,
    },
    /// Start or resume playback.
    Play(ElementId),
    /// Pause playback, keeping the position.
    Pause(ElementId),
    /// Silence or restore the element's audio.
    SetMuted(ElementId, bool),
    /// Move to an absolute position in seconds (clamped by the runtime).
    Seek(ElementId, f64),
    /// Stop every element, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// A native notification emitted by a media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback time advanced; carries the current position in seconds.
    TimeUpdate(f64),
    /// Metadata is available; carries the total duration in seconds.
    LoadedMetadata(f64),
}

/// A `MediaEvent` tagged with the element that emitted it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaNotice {
    pub id: ElementId,
    pub event: MediaEvent,
}

/// Runtime-side truth about an element, readable from the UI thread.
#[derive(Debug, Clone, Default)]
pub struct ElementInfo {
    /// Current position in seconds.
    pub position: f64,
    /// Total duration in seconds, `0` until known.
    pub duration: f64,
}

pub type ElementHandle = Arc<Mutex<ElementInfo>>;

/// Clamp a requested position into the element's valid range.
///
/// Non-finite targets land at 0. With an unknown duration (`<= 0`) only the
/// lower bound applies.
pub fn clamp_position(target: f64, duration: f64) -> f64 {
    if !target.is_finite() {
        return 0.0;
    }
    let lower = target.max(0.0);
    if duration > 0.0 { lower.min(duration) } else { lower }
}
