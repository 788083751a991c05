use super::*;
use std::sync::mpsc;

fn iface() -> (PlayerIface, mpsc::Receiver<ControlCmd>, MprisHandle) {
    let handle = MprisHandle::detached();
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: handle.state.clone(),
    };
    (iface, rx, handle)
}

#[test]
fn playback_status_follows_handle() {
    let (iface, _rx, handle) = iface();
    assert_eq!(iface.playback_status(), "Stopped");

    handle.set_status(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    assert_eq!(handle.status(), PlaybackStatus::Playing);

    handle.set_status(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn player_methods_forward_control_commands() {
    let (iface, rx, _handle) = iface();
    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
        ]
    );
}

#[test]
fn metadata_describes_the_focused_card() {
    let (iface, _rx, handle) = iface();
    assert!(iface.metadata().is_empty());

    handle.set_track(Some(TrackInfo {
        index: 2,
        title: "Because I can't imagine my future without you".to_string(),
        url: Some("file:///tmp/chatruamu.mov".to_string()),
        length_micros: Some(42_000_000),
    }));

    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:url", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }

    handle.set_track(Some(TrackInfo {
        index: 0,
        title: "t".to_string(),
        ..TrackInfo::default()
    }));
    let map = iface.metadata();
    assert!(map.contains_key("xesam:title"));
    assert!(!map.contains_key("mpris:length"));
    assert!(!map.contains_key("xesam:url"));

    handle.set_track(None);
    assert!(iface.metadata().is_empty());
}
