/// Observable playback mirror of one card.
///
/// `is_playing` and `is_muted` cache the user's intent; they are not read back
/// from the media element and can drift if something else drives it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// The card is past the viewport threshold.
    pub is_visible: bool,
    pub is_playing: bool,
    pub is_muted: bool,
    /// Last known position in seconds.
    pub position: f64,
    /// Total length in seconds; `0` until metadata is known.
    pub duration: f64,
}

impl PlaybackState {
    pub fn new(is_playing: bool, is_muted: bool) -> Self {
        Self {
            is_playing,
            is_muted,
            ..Self::default()
        }
    }

    /// Position as a fraction of the duration, `0` while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Initial settings for a card.
#[derive(Debug, Clone, Copy)]
pub struct CardOptions {
    /// Intersection ratio needed to count as visible.
    pub threshold: f64,
    /// Initial value of `is_playing` (the element autoplays).
    pub autoplay: bool,
    /// Initial value of `is_muted`.
    pub start_muted: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            autoplay: true,
            start_muted: true,
        }
    }
}
