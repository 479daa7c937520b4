use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub visualization_path: PathBuf,
    pub processing_delay_ms: u64,
    /// Served by the mood endpoint until a reading is recorded.
    pub initial_mood: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            visualization_path: PathBuf::from("./data/visualization.png"),
            processing_delay_ms: 3000,
            initial_mood: 0.0,
        }
    }
}

impl Settings {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

/// Defaults, then `server.toml`, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("visualization_path") {
        settings.visualization_path = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("processing_delay_ms") {
        set_delay(settings, v);
    }
    if let Some(v) = file_cfg.get("initial_mood") {
        set_initial_mood(settings, v);
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__VISUALIZATION_PATH") {
        settings.visualization_path = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__PROCESSING_DELAY_MS") {
        set_delay(settings, &v);
    }
    if let Some(v) = lookup("APP__INITIAL_MOOD") {
        set_initial_mood(settings, &v);
    }
}

fn set_delay(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(parsed) => settings.processing_delay_ms = parsed,
        Err(_) => warn!(
            value = raw,
            kept = settings.processing_delay_ms,
            "processing delay is not a millisecond count"
        ),
    }
}

fn set_initial_mood(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<f64>() {
        Ok(parsed) if (0.0..=1.0).contains(&parsed) => settings.initial_mood = parsed,
        _ => warn!(
            value = raw,
            kept = settings.initial_mood,
            "initial mood must be a number between 0 and 1"
        ),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
