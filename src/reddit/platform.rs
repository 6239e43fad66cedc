use async_trait::async_trait;
use crate::error::Result;
use crate::models::{CommentNode, MorePlaceholder, Thread};

/// Read access to a discussion platform's comment trees.
#[async_trait]
pub trait DiscussionPlatform: Send + Sync {
    /// The submission behind `url` with whatever part of its comment tree the
    /// platform returns in one request.
    async fn fetch_thread(&self, url: &str) -> Result<Thread>;

    /// The nodes a placeholder stands for. They may themselves contain
    /// placeholders, and their parent ids point into the thread.
    async fn expand(&self, link_id: &str, placeholder: &MorePlaceholder)
        -> Result<Vec<CommentNode>>;
}
