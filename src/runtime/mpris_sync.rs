use crate::media::MediaElement;
use crate::mpris::{MprisHandle, PlaybackStatus, TrackInfo};
use crate::page::Page;

/// MPRIS view of the focused card.
pub fn focused_snapshot<M: MediaElement>(page: &Page<M>) -> (PlaybackStatus, Option<TrackInfo>) {
    let Some(rc) = page.focused_card() else {
        return (PlaybackStatus::Stopped, None);
    };

    let state = rc.card.state();
    let status = if !rc.card.has_media() {
        PlaybackStatus::Stopped
    } else if state.is_playing {
        PlaybackStatus::Playing
    } else {
        PlaybackStatus::Paused
    };

    let track = TrackInfo {
        index: rc.card.index(),
        title: rc.item.reason.clone(),
        url: rc.path.as_ref().map(|p| format!("file://{}", p.display())),
        length_micros: (state.duration > 0.0).then(|| (state.duration * 1_000_000.0) as i64),
    };
    (status, Some(track))
}

pub fn update_mpris(mpris: &MprisHandle, snapshot: &(PlaybackStatus, Option<TrackInfo>)) {
    mpris.set_track(snapshot.1.clone());
    mpris.set_status(snapshot.0);
}
