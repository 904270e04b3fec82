use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_limit() -> usize {
    10
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Posts endpoint, queried with `?_limit=`
    #[serde(default = "default_url")]
    pub url: String,
    /// Number of posts to fetch (one file each)
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            limit: default_limit(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
