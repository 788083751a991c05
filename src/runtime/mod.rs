use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::assets::AssetIndex;
use crate::logging;
use crate::media::MediaRuntime;
use crate::mpris::{ControlCmd, MprisHandle};

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();

    let arg = env::args().nth(1);
    if arg.as_deref() == Some("--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    match logging::init(&settings.log) {
        Ok(path) => info!(log = %path.display(), "reasons starting"),
        Err(e) => eprintln!("reasons: logging disabled: {e}"),
    }
    if let Some(msg) = settings_problem {
        eprintln!("reasons: {msg}");
        warn!("{msg}");
    }

    let dir = arg
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let assets = AssetIndex::scan(&dir, &settings.assets);
    let media = MediaRuntime::new(settings.media.clone());
    let mut page = startup::build_page(&settings, &assets, &media);
    page.mount_all();
    if assets.is_empty() {
        warn!(dir = %assets.root().display(), "no media assets found");
    }
    info!(dir = %assets.root().display(), cards = page.cards.len(), assets = assets.len(), "page ready");

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = if settings.mpris.enabled {
        crate::mpris::spawn_mpris(control_tx.clone())
    } else {
        MprisHandle::detached()
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut page,
            &media,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    page.unmount_all();
    media.quit_softly(Duration::from_millis(settings.media.quit_fade_out_ms));
    drop(control_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!("event loop failed: {e}");
    }
    info!("reasons stopped");
    run_result
}

#[cfg(test)]
mod tests;
