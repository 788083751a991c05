//! File logging through `tracing`. The terminal belongs to the UI, so nothing is
//! ever written to stdout/stderr once the subscriber is installed.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// Overrides `log.level` when set.
pub const LOG_ENV: &str = "REASONS_LOG";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("no log file location (set log.file, XDG_STATE_HOME or HOME)")]
    NoPath,
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot install log subscriber: {0}")]
    Install(String),
}

/// `$XDG_STATE_HOME/reasons/reasons.log` or `~/.local/state/reasons/reasons.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("reasons").join("reasons.log"))
}

pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Filter from `REASONS_LOG`, else from `level`, else `info`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_append(path: &Path) -> Result<File, LogError> {
    let open_err = |source| LogError::Open {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(open_err)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)
}

/// Install the global subscriber. Returns the file being written.
pub fn init(settings: &LogSettings) -> Result<PathBuf, LogError> {
    let path = log_path(settings).ok_or(LogError::NoPath)?;
    let file = open_append(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(&settings.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LogError::Install(e.to_string()))?;

    Ok(path)
}
