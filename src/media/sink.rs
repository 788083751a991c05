//! Opening video assets as `rodio` sinks.
//!
//! Only the audio track of a video is played. Decoding goes through rodio's
//! symphonia backend; durations come from container metadata via `lofty`, with
//! the decoder's own estimate as a fallback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::MediaError;

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, MediaError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Best-effort total duration of the asset at `path`.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    if let Ok(tagged) = lofty::read_from_path(path) {
        let d = tagged.properties().duration();
        if !d.is_zero() {
            return Some(d);
        }
    }

    open_decoder(path).ok().and_then(|d| d.total_duration())
}
