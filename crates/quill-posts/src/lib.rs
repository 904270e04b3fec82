mod client;
mod template;

pub use client::{PostSource, PostsClient, StaticPosts};
pub use template::DocumentTemplate;
