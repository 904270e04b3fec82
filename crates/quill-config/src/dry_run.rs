use quill_types::DialogChoice;
use serde::{Deserialize, Serialize};

fn default_answer() -> DialogChoice {
    DialogChoice::Ignore
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DryRunConfig {
    /// Screenshot searched instead of the live screen
    pub screenshot: Option<String>,
    /// Answer given to every operator prompt
    #[serde(default = "default_answer")]
    pub answer: DialogChoice,
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            screenshot: None,
            answer: default_answer(),
        }
    }
}
