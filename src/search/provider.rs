use async_trait::async_trait;
use crate::error::Result;

/// Finds candidate discussion threads for a research query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Result links in provider order. An upstream failure is an error,
    /// never an empty list.
    async fn discover(&self, query: &str) -> Result<Vec<String>>;
}
