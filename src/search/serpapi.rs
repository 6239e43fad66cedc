use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::search::provider::SearchProvider;

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const RESULTS_PER_QUERY: u32 = 100;

pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    site: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    organic_results: Option<Vec<OrganicResult>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OrganicResult {
    link: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, site: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: SERPAPI_BASE_URL.to_string(),
            site: site.into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn site_query(&self, query: &str) -> String {
        format!("site:{} {}", self.site, query)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn discover(&self, query: &str) -> Result<Vec<String>> {
        let q = self.site_query(query);
        let num = RESULTS_PER_QUERY.to_string();
        tracing::info!("Searching: {}", q);

        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google"),
                ("num", num.as_str()),
                ("q", q.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SearchUnavailable(format!(
                "SerpAPI error ({}): {}",
                status, body
            )));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("Failed to parse SerpAPI response: {}", e)))?;

        let organic = match (result.organic_results, result.error) {
            (Some(organic), _) => organic,
            (None, Some(error)) => return Err(Error::SearchUnavailable(error)),
            (None, None) => {
                return Err(Error::SearchUnavailable(
                    "Response has no organic_results".to_string(),
                ))
            }
        };

        let links: Vec<String> = organic.into_iter().map(|r| r.link).collect();
        if links.is_empty() {
            tracing::warn!("Search returned no results for: {}", q);
        } else {
            tracing::info!("Discovered {} thread URLs", links.len());
        }

        Ok(links)
    }
}
