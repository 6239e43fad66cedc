pub mod provider;
pub mod serpapi;

pub use provider::SearchProvider;
pub use serpapi::SerpApiClient;
