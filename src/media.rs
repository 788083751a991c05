//! Media elements and the runtime that plays them.
//!
//! A card talks to its video through the `MediaElement` trait: play, pause,
//! mute, seek and time queries, plus two notifications (time advanced and
//! metadata ready) delivered through a `MediaNotifier`. `RodioElement` is the
//! implementation used by the app; it forwards commands to a background audio
//! thread owned by `MediaRuntime`, which reports notifications back as
//! `MediaNotice` values for the UI thread to dispatch.

mod element;
mod player;
mod sink;
mod thread;
mod types;

pub use element::*;
pub use player::*;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
