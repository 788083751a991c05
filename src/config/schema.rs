use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::page::{ReasonItem, default_reasons};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/reasons/config.toml` or `~/.config/reasons/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `REASONS__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub page: PageSettings,
    pub controls: ControlsSettings,
    pub media: MediaSettings,
    pub viewport: ViewportSettings,
    pub reveal: RevealSettings,
    pub assets: AssetSettings,
    pub log: LogSettings,
    pub mpris: MprisSettings,
    /// Cards in page order.
    pub reasons: Vec<ReasonItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageSettings {
    /// Text inside the top header box.
    pub title: String,
    /// Page heading; a `*...*` run is rendered emphasized.
    pub heading: String,
    pub subheading: String,
    /// Line under the last card.
    pub closing: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: "requesting loves".to_string(),
            heading: "Why We Should *Stay Together*".to_string(),
            subheading: "Let me show you, one reason at a time...".to_string(),
            closing: "And there are countless more reasons...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to skip when pressing `H` / `L` or the skip buttons.
    pub skip_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { skip_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Start every card playing as soon as its asset loads.
    pub autoplay: bool,
    pub start_muted: bool,
    /// Restart an asset when it reaches its end.
    pub looping: bool,
    /// Interval between time updates (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            start_muted: true,
            looping: true,
            tick_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Visible fraction of a card, in `[0, 1]`, at which it counts as visible.
    pub threshold: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self { threshold: 0.2 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealSettings {
    /// Fade-in length (milliseconds).
    pub duration_ms: u64,
    /// Extra delay per card index (milliseconds).
    pub stagger_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            duration_ms: 700,
            stagger_ms: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetSettings {
    /// File extensions to treat as media (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            extensions: ["mp4", "mov", "m4a", "mp3", "wav", "ogg", "flac"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, e.g. `info` or `reasons=debug`.
    pub level: String,
    /// Log file; defaults to the XDG state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MprisSettings {
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Settings {
    /// Reasons to show: the configured list, or the built-in one when empty.
    pub fn effective_reasons(&self) -> Vec<ReasonItem> {
        if self.reasons.is_empty() {
            default_reasons()
        } else {
            self.reasons.clone()
        }
    }
}
