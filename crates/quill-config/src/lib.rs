use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::dry_run::DryRunConfig;
use self::editor::EditorConfig;
use self::input::InputConfig;
use self::matcher::MatcherConfig;
use self::output::OutputConfig;
use self::recovery::RecoveryConfig;

pub mod api;
pub mod dry_run;
pub mod editor;
pub mod input;
pub mod matcher;
pub mod output;
pub mod recovery;

/// Which automation backend drives the editor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Real keyboard/mouse input against the live screen
    #[default]
    Desktop,
    /// Logs actions only, matches against a still screenshot
    DryRun,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Backend::Desktop),
            "dry-run" | "dryrun" | "dry_run" => Ok(Backend::DryRun),
            other => Err(format!("unknown backend `{other}`")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Desktop => f.write_str("desktop"),
            Backend::DryRun => f.write_str("dry-run"),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub api: ApiConfig,
    pub editor: EditorConfig,
    pub input: InputConfig,
    pub matcher: MatcherConfig,
    pub recovery: RecoveryConfig,
    pub output: OutputConfig,
    pub dry_run: DryRunConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Parse a JSON profile; missing fields keep their defaults
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Apply `QUILL_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("QUILL_BACKEND").and_then(|v| v.parse().ok()) {
            self.backend = backend;
        }

        if let Some(url) = lookup("QUILL_API_URL") {
            self.api.url = url;
        }

        if let Some(limit) = lookup("QUILL_POST_LIMIT").and_then(|v| v.parse().ok()) {
            self.api.limit = limit;
        }

        if let Some(program) = lookup("QUILL_EDITOR") {
            self.editor.program = program;
        }

        if let Some(dir) = lookup("QUILL_RESOURCES_DIR") {
            self.matcher.resources_dir = dir;
        }

        if let Some(dir) = lookup("QUILL_OUTPUT_DIR") {
            self.output.folder = Some(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use quill_types::{DialogChoice, Key};

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Desktop);
        assert_eq!(config.api.limit, 10);
        assert_eq!(config.matcher.confidence, 0.8);
        assert_eq!(config.recovery.badges, vec!["error-badge", "warning-badge"]);
        assert_eq!(config.recovery.max_retries, 3);
        assert_eq!(
            config.input.save_as_shortcut.keys(),
            &[Key::Control, Key::Shift, Key::Char('s')]
        );
        assert_eq!(config.dry_run.answer, DialogChoice::Ignore);
    }

    #[test]
    fn partial_profile_keeps_defaults() {
        let config = Config::from_json_str(
            r#"{
                "backend": "dry-run",
                "recovery": { "max_retries": 1 },
                "input": { "confirm_shortcut": "ctrl+enter" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::DryRun);
        assert_eq!(config.recovery.max_retries, 1);
        assert_eq!(config.recovery.dismiss_presses, 3);
        assert_eq!(
            config.input.confirm_shortcut.keys(),
            &[Key::Control, Key::Enter]
        );
        assert_eq!(config.api.url, "https://jsonplaceholder.typicode.com/posts");
    }

    #[test]
    fn overrides_replace_selected_fields() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("QUILL_BACKEND", "dry-run"),
            ("QUILL_POST_LIMIT", "2"),
            ("QUILL_OUTPUT_DIR", "/tmp/out"),
            ("QUILL_EDITOR", "kate"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.backend, Backend::DryRun);
        assert_eq!(config.api.limit, 2);
        assert_eq!(config.editor.program, "kate");
        assert_eq!(
            config.output.resolve_folder(),
            std::path::PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn bad_override_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "QUILL_POST_LIMIT" => Some("many".to_string()),
            "QUILL_BACKEND" => Some("robot".to_string()),
            _ => None,
        });
        assert_eq!(config.api.limit, 10);
        assert_eq!(config.backend, Backend::Desktop);
    }

    #[test]
    fn default_output_lives_on_the_desktop() {
        let folder = OutputConfig::default().resolve_folder();
        assert!(folder.ends_with("Desktop/tjm-project"));
    }
}
