use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::RedditCredentials;
use crate::error::{Error, Result};
use crate::models::{CommentNode, MorePlaceholder, Thread};
use crate::reddit::listing::{into_nodes, MoreChildrenResponse, Thing};
use crate::reddit::platform::DiscussionPlatform;
use crate::reddit::rate_limiter::RateLimiter;

pub const REDDIT_AUTH_URL: &str = "https://www.reddit.com";
pub const REDDIT_API_URL: &str = "https://oauth.reddit.com";

/// Most comments Reddit returns for one thread request.
const COMMENT_LIMIT: &str = "500";
/// Most ids `/api/morechildren` accepts per call.
const MORE_CHILDREN_BATCH: usize = 100;

pub struct RedditClient {
    client: Client,
    rate_limiter: RateLimiter,
    api_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

impl RedditClient {
    pub async fn connect(credentials: &RedditCredentials, timeout: Duration) -> Result<Self> {
        Self::connect_to(credentials, timeout, REDDIT_AUTH_URL, REDDIT_API_URL).await
    }

    /// Authenticate against explicit endpoints.
    pub async fn connect_to(
        credentials: &RedditCredentials,
        timeout: Duration,
        auth_url: &str,
        api_url: &str,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&credentials.user_agent())?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let access_token = fetch_token(&client, credentials, auth_url.trim_end_matches('/')).await?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::default(),
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.rate_limiter.wait().await;
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!("Fetching: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::RedditApi(format!("Request to {} failed: {}", path, e)))?;
        self.rate_limiter.update_from_headers(response.headers()).await;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RedditApi(format!("{} returned {}: {}", path, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedThread(format!("Unexpected response from {}: {}", path, e)))
    }

    async fn more_children(&self, link_id: &str, children: &[String]) -> Result<Vec<CommentNode>> {
        let mut nodes = Vec::new();

        for batch in children.chunks(MORE_CHILDREN_BATCH) {
            let ids = batch.join(",");
            let response: MoreChildrenResponse = self
                .get_json(
                    "/api/morechildren",
                    &[
                        ("api_type", "json"),
                        ("link_id", link_id),
                        ("children", ids.as_str()),
                        ("limit_children", "false"),
                        ("raw_json", "1"),
                    ],
                )
                .await?;

            if !response.json.errors.is_empty() {
                return Err(Error::RedditApi(format!(
                    "morechildren failed: {:?}",
                    response.json.errors
                )));
            }

            let things = response.json.data.map(|d| d.things).unwrap_or_default();
            nodes.extend(into_nodes(things)?);
        }

        Ok(nodes)
    }

    /// Replies below a comment whose chain Reddit cut off for depth.
    async fn continue_thread(&self, link_id: &str, parent_id: &str) -> Result<Vec<CommentNode>> {
        let submission = link_id.trim_start_matches("t3_");
        // Only a comment can have its chain continued; a top-level placeholder
        // without child ids has nothing to fetch.
        let parent = parent_id.strip_prefix("t1_").ok_or_else(|| {
            Error::MalformedThread(format!(
                "continue-thread placeholder under {} in {} is not below a comment",
                parent_id, link_id
            ))
        })?;

        let listings: Vec<Thing> = self
            .get_json(
                &format!("/comments/{}/_/{}", submission, parent),
                &[("limit", COMMENT_LIMIT), ("raw_json", "1")],
            )
            .await?;

        let comments = comment_listing(listings)?;
        for node in into_nodes(comments)? {
            if let CommentNode::Comment(comment) = node {
                if comment.fullname() == parent_id {
                    return Ok(comment.replies);
                }
            }
        }

        Err(Error::MalformedThread(format!(
            "continuation for {} did not include the parent comment",
            parent_id
        )))
    }
}

async fn fetch_token(client: &Client, credentials: &RedditCredentials, auth_url: &str) -> Result<String> {
    let form: Vec<(&str, &str)> = match credentials.script_login() {
        Some((username, password)) => vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ],
        None => vec![("grant_type", "client_credentials")],
    };

    let response = client
        .post(format!("{}/api/v1/access_token", auth_url))
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::RedditApi(format!("Token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::RedditApi(format!("Token exchange failed with status {}", status)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::RedditApi(format!("Token parse error: {}", e)))?;

    // Reddit answers bad script credentials with 200 and an error field
    match (token.access_token, token.error) {
        (Some(access_token), _) => Ok(access_token),
        (None, Some(error)) => Err(Error::RedditApi(format!("Token exchange rejected: {}", error))),
        (None, None) => Err(Error::RedditApi("Token response had no access_token".to_string())),
    }
}

/// Base-36 submission id from a thread URL (`/r/<sub>/comments/<id>/...` or `redd.it/<id>`).
pub fn submission_id(thread_url: &str) -> Result<String> {
    let url = Url::parse(thread_url)
        .map_err(|e| Error::MalformedThread(format!("Invalid thread URL {}: {}", thread_url, e)))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let id = if url.host_str() == Some("redd.it") {
        segments.first().copied()
    } else {
        segments
            .iter()
            .position(|seg| *seg == "comments")
            .and_then(|i| segments.get(i + 1).copied())
    };

    id.filter(|id| id.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedThread(format!("Not a thread URL: {}", thread_url)))
}

/// The second listing of a `/comments/` response holds the comment tree.
fn comment_listing(listings: Vec<Thing>) -> Result<Vec<Thing>> {
    let mut listings = listings.into_iter();
    listings.next();
    listings
        .next()
        .ok_or_else(|| Error::MalformedThread("Response has no comment listing".to_string()))?
        .into_listing_children()
}

#[async_trait]
impl DiscussionPlatform for RedditClient {
    async fn fetch_thread(&self, url: &str) -> Result<Thread> {
        let id = submission_id(url)?;
        tracing::info!("Fetching thread {} ({})", id, url);

        let listings: Vec<Thing> = self
            .get_json(
                &format!("/comments/{}", id),
                &[("limit", COMMENT_LIMIT), ("raw_json", "1")],
            )
            .await?;

        let mut listings = listings.into_iter();
        let submission = listings
            .next()
            .ok_or_else(|| Error::MalformedThread(format!("Empty response for {}", url)))?
            .into_listing_children()?;

        let (link_id, title) = match submission.into_iter().next() {
            Some(Thing::Link(link)) => (link.name, link.title),
            _ => {
                return Err(Error::MalformedThread(format!(
                    "No submission in response for {}",
                    url
                )))
            }
        };

        let comments = listings
            .next()
            .ok_or_else(|| Error::MalformedThread(format!("No comment listing for {}", url)))?
            .into_listing_children()?;

        Ok(Thread {
            url: url.to_string(),
            link_id,
            title,
            comments: into_nodes(comments)?,
        })
    }

    async fn expand(&self, link_id: &str, placeholder: &MorePlaceholder) -> Result<Vec<CommentNode>> {
        if placeholder.is_continue_thread() {
            tracing::debug!("Continuing thread below {}", placeholder.parent_id);
            self.continue_thread(link_id, &placeholder.parent_id).await
        } else {
            tracing::debug!(
                "Loading {} more comment(s) under {}",
                placeholder.children.len(),
                placeholder.parent_id
            );
            self.more_children(link_id, &placeholder.children).await
        }
    }
}
