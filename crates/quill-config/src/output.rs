use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_SUBFOLDER: &str = "tjm-project";

fn default_filename_template() -> String {
    "post {id}.txt".to_string()
}

fn default_content_template() -> String {
    "TITLE: {title}\n\nBODY:\n{body}".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination folder. Defaults to `~/Desktop/tjm-project`.
    pub folder: Option<String>,
    /// File name per post; `{id}`, `{title}` and `{body}` are substituted
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
    #[serde(default = "default_content_template")]
    pub content_template: String,
}

impl OutputConfig {
    pub fn resolve_folder(&self) -> PathBuf {
        match &self.folder {
            Some(folder) => PathBuf::from(folder),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Desktop")
                .join(DEFAULT_SUBFOLDER),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: None,
            filename_template: default_filename_template(),
            content_template: default_content_template(),
        }
    }
}
