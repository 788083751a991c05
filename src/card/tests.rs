use super::*;
use crate::media::fake::FakeMedia;
use crate::viewport::{ScrollViewport, Span};

fn card(media: Option<FakeMedia>) -> MediaCard<FakeMedia> {
    MediaCard::new(0, media, CardOptions::default())
}

fn mounted(duration: f64) -> (MediaCard<FakeMedia>, ScrollViewport) {
    let vp = ScrollViewport::new();
    let mut c = card(Some(FakeMedia::with_duration(duration)));
    c.mount(&vp);
    (c, vp)
}

#[test]
fn initial_state_follows_options() {
    let c = card(Some(FakeMedia::new()));
    let s = c.state();
    assert!(s.is_playing);
    assert!(s.is_muted);
    assert!(!s.is_visible);
    assert_eq!(s.position, 0.0);
    assert_eq!(s.duration, 0.0);

    let paused = MediaCard::new(
        0,
        Some(FakeMedia::new()),
        CardOptions {
            autoplay: false,
            start_muted: false,
            ..CardOptions::default()
        },
    );
    assert!(!paused.state().is_playing);
    assert!(!paused.state().is_muted);
}

#[test]
fn toggle_play_alternates_and_drives_the_element() {
    let (mut c, _vp) = mounted(30.0);
    let mut expected = c.state().is_playing;

    for _ in 0..5 {
        c.toggle_play();
        expected = !expected;
        assert_eq!(c.state().is_playing, expected);
        assert_eq!(c.media().unwrap().snapshot().playing, expected);
    }

    let calls = c.media().unwrap().snapshot();
    assert_eq!(calls.pause_calls, 3);
    assert_eq!(calls.play_calls, 2);
}

#[test]
fn toggle_mute_twice_restores_original_value() {
    let (mut c, _vp) = mounted(30.0);
    let original = c.state().is_muted;

    c.toggle_mute();
    assert_eq!(c.state().is_muted, !original);
    assert_eq!(c.media().unwrap().muted(), !original);

    c.toggle_mute();
    assert_eq!(c.state().is_muted, original);
    assert_eq!(c.media().unwrap().muted(), original);
}

#[test]
fn seek_updates_position_without_waiting_for_notification() {
    let (mut c, _vp) = mounted(120.0);
    for t in [0.0, 42.5, 120.0] {
        c.seek(t);
        assert_eq!(c.state().position, t);
        assert_eq!(c.media().unwrap().current_time(), t);
    }
}

#[test]
fn seek_past_the_end_stays_within_duration() {
    let (mut c, _vp) = mounted(120.0);
    c.seek(150.0);
    assert_eq!(c.state().position, 120.0);
    c.seek(-4.0);
    assert_eq!(c.state().position, 0.0);
    assert!(c.state().position <= c.state().duration);
}

#[test]
fn skip_lands_inside_the_clamped_range() {
    let cases = [(10.0, 10.0), (10.0, -10.0), (5.0, -10.0), (115.0, 10.0), (0.0, 0.0)];
    for (p, d) in cases {
        let (mut c, _vp) = mounted(120.0);
        c.media().unwrap().advance_to(p);
        assert_eq!(c.state().position, p);

        c.skip(d);
        c.media().unwrap().tick();

        let pos = c.state().position;
        let lo = (p + d).max(0.0).min(120.0);
        let hi = (p + d).min(120.0).max(0.0);
        assert!(pos >= lo && pos <= hi, "p={p} d={d} pos={pos}");
    }
}

#[test]
fn skip_does_not_touch_position_until_time_update() {
    let (mut c, _vp) = mounted(120.0);
    c.media().unwrap().advance_to(20.0);
    c.skip(10.0);
    assert_eq!(c.state().position, 20.0);
    c.media().unwrap().tick();
    assert_eq!(c.state().position, 30.0);
}

#[test]
fn duration_is_zero_until_metadata_arrives() {
    let (c, _vp) = mounted(0.0);
    assert_eq!(c.state().duration, 0.0);

    c.media().unwrap().load_metadata(120.0);
    assert_eq!(c.state().duration, 120.0);
}

#[test]
fn mount_picks_up_metadata_that_arrived_earlier() {
    let vp = ScrollViewport::new();
    let mut c = card(Some(FakeMedia::with_duration(64.0)));
    assert_eq!(c.state().duration, 0.0);
    c.mount(&vp);
    assert_eq!(c.state().duration, 64.0);
}

#[test]
fn visibility_follows_threshold_crossings_only() {
    let spans = vec![Span { top: 20, height: 10 }];
    let (c, mut vp) = mounted(10.0);

    vp.set_geometry(spans.clone(), 0, 21); // ratio 0.1
    vp.refresh();
    assert!(!c.state().is_visible);
    assert!(c.visible_since().is_none());

    vp.set_geometry(spans.clone(), 0, 22); // ratio 0.2
    vp.refresh();
    assert!(c.state().is_visible);
    let since = c.visible_since();
    assert!(since.is_some());

    // No exit notification, no revert; the entry time is kept.
    vp.refresh();
    vp.set_geometry(spans.clone(), 0, 30);
    vp.refresh();
    assert!(c.state().is_visible);
    assert_eq!(c.visible_since(), since);

    vp.set_geometry(spans, 40, 10);
    vp.refresh();
    assert!(!c.state().is_visible);
    assert!(c.visible_since().is_none());
}

#[test]
fn unmount_releases_every_listener() {
    let (mut c, vp) = mounted(10.0);
    assert!(c.is_mounted());
    assert_eq!(vp.watch_count(), 1);
    assert_eq!(c.media().unwrap().notifier().listener_count(), 2);

    c.unmount();
    assert!(!c.is_mounted());
    assert_eq!(vp.watch_count(), 0);
    assert_eq!(c.media().unwrap().notifier().listener_count(), 0);
}

#[test]
fn notifications_after_unmount_have_no_effect() {
    let mut vp = ScrollViewport::new();
    let mut c = card(Some(FakeMedia::new()));
    c.mount(&vp);
    c.unmount();
    let before = c.state();

    c.media().unwrap().load_metadata(120.0);
    c.media().unwrap().advance_to(50.0);
    vp.set_geometry(vec![Span { top: 0, height: 5 }], 0, 10);
    vp.refresh();

    assert_eq!(c.state(), before);
}

#[test]
fn mounting_twice_registers_once() {
    let (mut c, vp) = mounted(10.0);
    c.mount(&vp);
    assert_eq!(vp.watch_count(), 1);
    assert_eq!(c.media().unwrap().notifier().listener_count(), 2);
}

#[test]
fn controls_without_media_are_noops() {
    let vp = ScrollViewport::new();
    let mut c = card(None);
    c.mount(&vp);
    let before = c.state();

    c.toggle_play();
    c.toggle_mute();
    c.skip(10.0);
    c.seek(33.0);

    assert_eq!(c.state(), before);
    assert!(!c.has_media());
    assert!(c.is_mounted());
}

#[test]
fn progress_is_zero_without_duration() {
    let mut s = PlaybackState::new(true, true);
    s.position = 10.0;
    assert_eq!(s.progress(), 0.0);
    s.duration = 40.0;
    assert_eq!(s.progress(), 0.25);
}
