use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("Classification service error: {0}")]
    ClassificationService(String),

    #[error("Malformed thread: {0}")]
    MalformedThread(String),

    #[error("Classifier returned an invalid sentiment: {0:?}")]
    InvalidSentiment(String),

    #[error("Classifier returned an unknown tag: {0:?}")]
    InvalidTag(String),

    #[error("Reddit API error: {0}")]
    RedditApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;
