pub mod client;
pub(crate) mod listing;
pub mod platform;
pub mod rate_limiter;

pub use client::RedditClient;
pub use platform::DiscussionPlatform;
pub use rate_limiter::RateLimiter;
