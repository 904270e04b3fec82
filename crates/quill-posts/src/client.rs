use std::time::Duration;

use anyhow::{Context, Result};
use quill_types::Post;

/// Where the posts to type come from
#[async_trait::async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch up to `limit` posts. A non-success response yields no posts.
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>>;
}

/// Client for a JSONPlaceholder-style `/posts` endpoint
#[derive(Clone)]
pub struct PostsClient {
    url: String,
    client: reqwest::Client,
}

impl PostsClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait::async_trait]
impl PostSource for PostsClient {
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>> {
        tracing::info!("Fetching {limit} posts from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("_limit", limit)])
            .send()
            .await
            .context("Failed to send request to posts API")?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::info!("Failed to retrieve posts. Status code: {}", status.as_u16());
            return Ok(Vec::new());
        }

        let records = response
            .json::<Vec<serde_json::Value>>()
            .await
            .context("Failed to parse posts response")?;

        Ok(parse_posts(records))
    }
}

/// Keep the records that look like posts, log the rest
fn parse_posts(records: Vec<serde_json::Value>) -> Vec<Post> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Post>(record) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::error!("Error parsing post #{index}: {e}");
                None
            }
        })
        .collect()
}

/// A fixed list of posts
#[derive(Debug, Clone, Default)]
pub struct StaticPosts(pub Vec<Post>);

#[async_trait::async_trait]
impl PostSource for StaticPosts {
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}
