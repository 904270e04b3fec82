use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_resources_dir() -> String {
    "resources".to_string()
}

fn default_extension() -> String {
    "jpg".to_string()
}

fn default_confidence() -> f32 {
    0.8
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MatcherConfig {
    /// Folder holding one reference image per label
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Minimum similarity (0..=1) for a template to count as found
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl MatcherConfig {
    pub fn resources_path(&self) -> PathBuf {
        PathBuf::from(&self.resources_dir)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            resources_dir: default_resources_dir(),
            extension: default_extension(),
            confidence: default_confidence(),
        }
    }
}
