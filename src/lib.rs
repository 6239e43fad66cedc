pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod reddit;
pub mod llm;
pub mod research;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use search::{SearchProvider, SerpApiClient};
pub use reddit::{DiscussionPlatform, RedditClient};
pub use llm::{Classifier, CompletionProvider, FixedDelay, OpenAIProvider, Throttle};
pub use research::ResearchPipeline;
pub use storage::CsvWriter;
