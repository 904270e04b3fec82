use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use quill_config::Config;

/// Load a JSON profile when given, then apply `QUILL_*` overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    tracing::info!("Loading config from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config = Config::from_json_str(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config.apply_overrides(|key| env::var(key).ok());
    Ok(config)
}

/// Effective config as pretty JSON
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}
