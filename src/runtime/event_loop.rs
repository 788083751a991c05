use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::card::MediaCard;
use crate::config;
use crate::media::{MediaElement, MediaRuntime};
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus, TrackInfo};
use crate::page::Page;
use crate::runtime::mpris_sync::{focused_snapshot, update_mpris};
use crate::runtime::startup;
use crate::ui::{self, HitAction, HitMap};

const WHEEL_ROWS: isize = 3;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last snapshot published to MPRIS.
    pub last_mpris: Option<(PlaybackStatus, Option<TrackInfo>)>,
    /// Clickable regions of the last frame.
    pub hits: HitMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: pumps media notices into the cards, draws, and
/// handles input and MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    page: &mut Page<M>,
    media: &MediaRuntime,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let reveal = startup::reveal(settings);

    loop {
        for notice in media.notices() {
            page.deliver(&notice);
        }

        // Keep MPRIS in sync with whatever changed the focused card.
        let snapshot = focused_snapshot(page);
        if state.last_mpris.as_ref() != Some(&snapshot) {
            update_mpris(mpris, &snapshot);
            state.last_mpris = Some(snapshot);
        }

        terminal.draw(|f| {
            let area = ui::content_area(f.area());
            page.refresh_viewport(area.height as usize);
            state.hits = ui::draw(f, page, settings, &reveal, Instant::now());
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, page) == Flow::Quit {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, page, state) == Flow::Quit {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, settings, page, state),
                _ => {}
            }
        }
    }

    Ok(())
}

fn with_focused<M: MediaElement>(page: &mut Page<M>, f: impl FnOnce(&mut MediaCard<M>)) {
    if let Some(rc) = page.focused_card_mut() {
        f(&mut rc.card);
    }
}

/// Jump to `fraction` of the card's length; nothing happens until it is known.
fn seek_fraction<M: MediaElement>(card: &mut MediaCard<M>, fraction: f64) {
    let duration = card.state().duration;
    if duration > 0.0 {
        card.seek(duration * fraction.clamp(0.0, 1.0));
    }
}

pub fn handle_control_cmd<M: MediaElement>(cmd: ControlCmd, page: &mut Page<M>) -> Flow {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play => with_focused(page, |c| {
            if !c.state().is_playing {
                c.toggle_play();
            }
        }),
        ControlCmd::Pause => with_focused(page, |c| {
            if c.state().is_playing {
                c.toggle_play();
            }
        }),
        ControlCmd::PlayPause => with_focused(page, |c| c.toggle_play()),
        ControlCmd::Stop => with_focused(page, |c| {
            if c.state().is_playing {
                c.toggle_play();
            }
            c.seek(0.0);
        }),
        ControlCmd::Next => page.focus_next(),
        ControlCmd::Prev => page.focus_prev(),
    }
    Flow::Continue
}

pub fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    settings: &config::Settings,
    page: &mut Page<M>,
    state: &mut EventLoopState,
) -> Flow {
    let skip = settings.controls.skip_seconds as f64;

    if key.code == KeyCode::Char('g') {
        if state.pending_gg {
            state.pending_gg = false;
            page.focus_first();
        } else {
            state.pending_gg = true;
        }
        return Flow::Continue;
    }
    // g pending should clear on any other key
    state.pending_gg = false;

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('j') | KeyCode::Down => page.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => page.focus_prev(),
        KeyCode::Char('G') => page.focus_last(),
        KeyCode::Char(' ') | KeyCode::Char('p') => with_focused(page, |c| c.toggle_play()),
        KeyCode::Char('m') => with_focused(page, |c| c.toggle_mute()),
        KeyCode::Char('L') => with_focused(page, |c| c.skip(skip)),
        KeyCode::Char('H') => with_focused(page, |c| c.skip(-skip)),
        KeyCode::Char(d @ '0'..='9') => {
            let n = d.to_digit(10).unwrap_or(0) as f64;
            with_focused(page, |c| seek_fraction(c, n / 10.0));
        }
        KeyCode::PageDown => page.scroll_by((page.view_height() / 2).max(1) as isize),
        KeyCode::PageUp => page.scroll_by(-((page.view_height() / 2).max(1) as isize)),
        _ => {}
    }
    Flow::Continue
}

pub fn handle_mouse_event<M: MediaElement>(
    mouse: MouseEvent,
    settings: &config::Settings,
    page: &mut Page<M>,
    state: &mut EventLoopState,
) {
    match mouse.kind {
        MouseEventKind::ScrollDown => page.scroll_by(WHEEL_ROWS),
        MouseEventKind::ScrollUp => page.scroll_by(-WHEEL_ROWS),
        MouseEventKind::Down(MouseButton::Left) => {
            state.pending_gg = false;
            if let Some(hit) = state.hits.at(mouse.column, mouse.row) {
                // Focus without scrolling so the click lands where it was aimed.
                page.focused = hit.card;
                let skip = settings.controls.skip_seconds as f64;
                let Some(rc) = page.cards.get_mut(hit.card) else {
                    return;
                };
                let card = &mut rc.card;
                match hit.action {
                    HitAction::TogglePlay => card.toggle_play(),
                    HitAction::SkipBack => card.skip(-skip),
                    HitAction::SkipForward => card.skip(skip),
                    HitAction::ToggleMute => card.toggle_mute(),
                    HitAction::Scrub => seek_fraction(card, hit.fraction_at(mouse.column)),
                }
                return;
            }

            let content = state.hits.content;
            if mouse.row >= content.y && mouse.row < content.y + content.height {
                let row = page.scroll + (mouse.row - content.y) as usize;
                if let Some(i) = page.layout.card_at_row(row) {
                    page.focused = i;
                }
            }
        }
        _ => {}
    }
}
