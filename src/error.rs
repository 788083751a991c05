//! Media runtime errors.

use std::path::PathBuf;

/// Errors raised while preparing or driving audio output for a media element.
///
/// These stay inside the media runtime: they are logged and the affected element
/// is left inert, they are never surfaced to a card.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("unknown media element {0}")]
    UnknownElement(usize),
}
