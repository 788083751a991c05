use std::collections::HashSet;
use std::{env, path::PathBuf};

use thiserror::Error;

use super::schema::Settings;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("viewport.threshold must be within [0, 1], got {0}")]
    Threshold(f64),
    #[error("controls.skip_seconds must be >= 1")]
    SkipSeconds,
    #[error("media.tick_ms must be >= 1")]
    TickMs,
    #[error("reasons contain duplicate id {0}")]
    DuplicateReason(u32),
}

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `REASONS__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("REASONS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let t = self.viewport.threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(ValidationError::Threshold(t));
        }
        if self.controls.skip_seconds == 0 {
            return Err(ValidationError::SkipSeconds);
        }
        if self.media.tick_ms == 0 {
            return Err(ValidationError::TickMs);
        }

        let mut seen = HashSet::new();
        for r in &self.reasons {
            if !seen.insert(r.id) {
                return Err(ValidationError::DuplicateReason(r.id));
            }
        }
        Ok(())
    }

    /// Render the settings as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        shown.reasons = self.effective_reasons();
        toml::to_string_pretty(&shown)
    }
}

/// Resolve the config path from `REASONS_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("REASONS_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/reasons/config.toml`
/// or `~/.config/reasons/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("reasons").join("config.toml"))
}
