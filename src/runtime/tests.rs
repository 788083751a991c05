use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tempfile::tempdir;

use super::event_loop::{
    EventLoopState, Flow, handle_control_cmd, handle_key_event, handle_mouse_event,
};
use super::mpris_sync::focused_snapshot;
use super::settings::load_settings;
use super::startup::{build_cards, card_options};
use crate::assets::AssetIndex;
use crate::card::{CardOptions, MediaCard};
use crate::config::{AssetSettings, Settings};
use crate::media::MediaElement;
use crate::media::fake::FakeMedia;
use crate::mpris::{ControlCmd, PlaybackStatus};
use crate::page::{Page, ReasonCard, default_reasons};
use crate::test_support::{EnvGuard, env_lock};

fn page(n: usize) -> Page<FakeMedia> {
    let reasons = default_reasons();
    let cards = (0..n)
        .map(|i| ReasonCard {
            item: reasons[i % reasons.len()].clone(),
            path: None,
            card: MediaCard::new(i, Some(FakeMedia::with_duration(100.0)), CardOptions::default()),
        })
        .collect();
    let mut p = Page::new(cards);
    p.mount_all();
    p.refresh_viewport(20);
    p
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(p: &mut Page<FakeMedia>, state: &mut EventLoopState, code: KeyCode) -> Flow {
    handle_key_event(key(code), &Settings::default(), p, state)
}

fn focused_position(p: &Page<FakeMedia>) -> f64 {
    p.focused_card().unwrap().card.media().unwrap().current_time()
}

#[test]
fn keys_drive_the_focused_card() {
    let mut p = page(2);
    let mut st = EventLoopState::default();

    assert!(p.focused_card().unwrap().card.state().is_playing);
    press(&mut p, &mut st, KeyCode::Char(' '));
    assert!(!p.focused_card().unwrap().card.state().is_playing);
    press(&mut p, &mut st, KeyCode::Char('p'));
    assert!(p.focused_card().unwrap().card.state().is_playing);

    press(&mut p, &mut st, KeyCode::Char('m'));
    assert!(!p.focused_card().unwrap().card.state().is_muted);

    press(&mut p, &mut st, KeyCode::Char('L'));
    assert_eq!(focused_position(&p), 10.0);
    press(&mut p, &mut st, KeyCode::Char('H'));
    press(&mut p, &mut st, KeyCode::Char('H'));
    assert_eq!(focused_position(&p), 0.0);

    press(&mut p, &mut st, KeyCode::Char('5'));
    assert_eq!(p.focused_card().unwrap().card.state().position, 50.0);

    // The second card was never touched.
    let other = p.cards[1].card.state();
    assert!(other.is_playing && other.is_muted);
}

#[test]
fn focus_keys_and_gg_prefix() {
    let mut p = page(3);
    let mut st = EventLoopState::default();

    press(&mut p, &mut st, KeyCode::Char('j'));
    press(&mut p, &mut st, KeyCode::Down);
    assert_eq!(p.focused, 2);
    press(&mut p, &mut st, KeyCode::Char('k'));
    assert_eq!(p.focused, 1);

    press(&mut p, &mut st, KeyCode::Char('G'));
    assert_eq!(p.focused, 2);

    press(&mut p, &mut st, KeyCode::Char('g'));
    assert!(st.pending_gg);
    press(&mut p, &mut st, KeyCode::Char('x'));
    assert!(!st.pending_gg);
    assert_eq!(p.focused, 2);

    press(&mut p, &mut st, KeyCode::Char('g'));
    press(&mut p, &mut st, KeyCode::Char('g'));
    assert_eq!(p.focused, 0);

    assert_eq!(press(&mut p, &mut st, KeyCode::Char('q')), Flow::Quit);
}

#[test]
fn control_commands_map_onto_the_focused_card() {
    let mut p = page(2);

    handle_control_cmd(ControlCmd::Play, &mut p);
    assert!(p.focused_card().unwrap().card.state().is_playing);

    handle_control_cmd(ControlCmd::Pause, &mut p);
    handle_control_cmd(ControlCmd::Pause, &mut p);
    assert!(!p.focused_card().unwrap().card.state().is_playing);

    handle_control_cmd(ControlCmd::PlayPause, &mut p);
    assert!(p.focused_card().unwrap().card.state().is_playing);

    p.focused_card().unwrap().card.media().unwrap().advance_to(30.0);
    handle_control_cmd(ControlCmd::Stop, &mut p);
    let s = p.focused_card().unwrap().card.state();
    assert!(!s.is_playing);
    assert_eq!(s.position, 0.0);

    handle_control_cmd(ControlCmd::Next, &mut p);
    assert_eq!(p.focused, 1);
    handle_control_cmd(ControlCmd::Prev, &mut p);
    assert_eq!(p.focused, 0);

    assert_eq!(handle_control_cmd(ControlCmd::Quit, &mut p), Flow::Quit);
}

#[test]
fn wheel_scrolls_and_click_focuses_card_rows() {
    let mut p = page(3);
    let mut st = EventLoopState::default();
    st.hits.content = Rect::new(0, 3, 80, 20);

    let mouse = |kind, row| MouseEvent {
        kind,
        column: 10,
        row,
        modifiers: KeyModifiers::NONE,
    };

    handle_mouse_event(mouse(MouseEventKind::ScrollDown, 5), &Settings::default(), &mut p, &mut st);
    assert_eq!(p.scroll, 3);
    handle_mouse_event(mouse(MouseEventKind::ScrollUp, 5), &Settings::default(), &mut p, &mut st);
    assert_eq!(p.scroll, 0);

    // Content row 14 is the first row of card 1.
    let row = 3 + p.layout.card_span(1).top as u16;
    handle_mouse_event(
        mouse(MouseEventKind::Down(MouseButton::Left), row),
        &Settings::default(),
        &mut p,
        &mut st,
    );
    assert_eq!(p.focused, 1);
}

#[test]
fn mpris_snapshot_reflects_focused_card() {
    let mut p = page(2);
    let (status, track) = focused_snapshot(&p);
    assert_eq!(status, PlaybackStatus::Playing);
    let track = track.unwrap();
    assert_eq!(track.index, 0);
    assert_eq!(track.length_micros, Some(100_000_000));

    p.focused_card_mut().unwrap().card.toggle_play();
    assert_eq!(focused_snapshot(&p).0, PlaybackStatus::Paused);

    let empty: Page<FakeMedia> = Page::new(Vec::new());
    assert_eq!(focused_snapshot(&empty), (PlaybackStatus::Stopped, None));
}

#[test]
fn build_cards_resolves_assets_and_leaves_missing_ones_inert() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("anni.mp4"), b"x").unwrap();
    let assets = AssetIndex::scan(dir.path(), &AssetSettings::default());

    let mut opened = Vec::new();
    let cards = build_cards(
        default_reasons(),
        &assets,
        CardOptions::default(),
        |i, path| {
            opened.push((i, path.to_path_buf()));
            FakeMedia::new()
        },
    );

    assert_eq!(cards.len(), 4);
    assert_eq!(opened, vec![(0, dir.path().join("anni.mp4"))]);
    assert!(cards[0].card.has_media());
    assert_eq!(cards[0].path, Some(dir.path().join("anni.mp4")));
    assert!(cards[1..].iter().all(|rc| !rc.card.has_media() && rc.path.is_none()));
    assert_eq!(cards[2].card.index(), 2);
}

#[test]
fn card_options_follow_settings() {
    let mut s = Settings::default();
    s.viewport.threshold = 0.6;
    s.media.autoplay = false;
    let o = card_options(&s);
    assert_eq!(o.threshold, 0.6);
    assert!(!o.autoplay);
    assert!(o.start_muted);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    fs::write(&cfg_path, "[viewport]\nthreshold = 3.0\n").unwrap();
    let _g = EnvGuard::set("REASONS_CONFIG_PATH", cfg_path.to_str().unwrap());

    let (s, problem) = load_settings();
    assert_eq!(s.viewport.threshold, 0.2);
    assert!(problem.unwrap().contains("invalid config"));
}
