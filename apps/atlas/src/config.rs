use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "atlas.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub events_url: Option<String>,
    pub events_file: Option<String>,
    pub database_url: String,
    pub default_radius_meters: f64,
    pub log_filter: String,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events_url: None,
            events_file: None,
            database_url: "sqlite://./data/atlas.db".into(),
            default_radius_meters: 100_000.0,
            log_filter: "info".into(),
            viewport_width: 1024.0,
            viewport_height: 768.0,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// A missing or unreadable file contributes nothing.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let file = fs::read_to_string(path).ok();
    settings_from_sources(file.as_deref(), env)
}

/// Defaults, then flat `key = "value"` pairs from the settings file, then
/// environment variables. For each key the `APP__` alias wins over `ATLAS_`.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    let file_cfg = file
        .and_then(|raw| toml::from_str::<HashMap<String, String>>(raw).ok())
        .unwrap_or_default();

    let lookup = |key: &str| -> Option<String> {
        let upper = key.to_ascii_uppercase();
        env(&format!("APP__{upper}"))
            .or_else(|| env(&format!("ATLAS_{upper}")))
            .or_else(|| file_cfg.get(key).cloned())
    };

    if let Some(v) = lookup("events_url") {
        settings.events_url = non_empty(v);
    }
    if let Some(v) = lookup("events_file") {
        settings.events_file = non_empty(v);
    }
    if let Some(v) = lookup("database_url") {
        if !v.trim().is_empty() {
            settings.database_url = v;
        }
    }
    if let Some(v) = lookup("log_filter") {
        if !v.trim().is_empty() {
            settings.log_filter = v;
        }
    }
    if let Some(parsed) = lookup("default_radius_meters").and_then(|v| parse_positive(&v)) {
        settings.default_radius_meters = parsed;
    }
    if let Some(parsed) = lookup("viewport_width").and_then(|v| parse_positive(&v)) {
        settings.viewport_width = parsed;
    }
    if let Some(parsed) = lookup("viewport_height").and_then(|v| parse_positive(&v)) {
        settings.viewport_height = parsed;
    }

    settings
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
