use crate::config;

/// Load settings, falling back to defaults when the config cannot be read or is
/// invalid. The message explains the fallback; it is logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {e}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
