//! `RedditClient` authentication, thread fetch, and placeholder expansion
//! against a local mock of Reddit's OAuth API.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use threadsift::config::RedditCredentials;
use threadsift::models::{CommentNode, MorePlaceholder};
use threadsift::research::expand_all;
use threadsift::{DiscussionPlatform, Error, RedditClient};

const THREAD_URL: &str = "https://www.reddit.com/r/ecommerce/comments/abc/avalara_vs_shopify_tax/";

fn credentials() -> RedditCredentials {
    RedditCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        username: Some("researcher".to_string()),
        password: Some("hunter2".to_string()),
    }
}

fn comment(id: &str, parent: &str, body: &str, replies: Value) -> Value {
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "name": format!("t1_{}", id),
            "parent_id": parent,
            "author": format!("user_{}", id),
            "body": body,
            "created_utc": 1700000000.0,
            "replies": replies
        }
    })
}

fn listing(children: Vec<Value>) -> Value {
    json!({"kind": "Listing", "data": {"after": null, "before": null, "children": children}})
}

fn submission() -> Value {
    listing(vec![json!({
        "kind": "t3",
        "data": {"id": "abc", "name": "t3_abc", "title": "Avalara vs Shopify Tax"}
    })])
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=researcher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-123",
            "token_type": "bearer",
            "expires_in": 86400,
            "scope": "*"
        })))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> RedditClient {
    RedditClient::connect_to(&credentials(), Duration::from_secs(5), &server.uri(), &server.uri())
        .await
        .expect("failed to connect")
}

#[tokio::test]
async fn test_fetch_thread_parses_submission_and_tree() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/comments/abc"))
        .and(query_param("raw_json", "1"))
        .and(header("authorization", "Bearer token-123"))
        .and(header("user-agent", "Comment Extraction (by u/researcher)"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-remaining", "99.0")
                .insert_header("x-ratelimit-reset", "120")
                .set_body_json(json!([
                    submission(),
                    listing(vec![comment(
                        "c1",
                        "t3_abc",
                        "too expensive",
                        listing(vec![comment("c2", "t1_c1", "agreed", json!(""))]),
                    )]),
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let thread = connect(&server).await.fetch_thread(THREAD_URL).await.unwrap();

    assert_eq!(thread.url, THREAD_URL);
    assert_eq!(thread.link_id, "t3_abc");
    assert_eq!(thread.title.as_deref(), Some("Avalara vs Shopify Tax"));
    assert_eq!(thread.comments.len(), 1);
    match &thread.comments[0] {
        CommentNode::Comment(c1) => {
            assert_eq!(c1.body, "too expensive");
            assert_eq!(c1.replies.len(), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_expand_all_resolves_more_and_continue_placeholders() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let continue_marker = json!({
        "kind": "more",
        "data": {"id": "_", "name": "t1__", "parent_id": "t1_c2", "count": 0, "depth": 10, "children": []}
    });
    let load_more = json!({
        "kind": "more",
        "data": {"id": "c4", "name": "t1_c4", "parent_id": "t3_abc", "count": 2, "depth": 0, "children": ["c4", "c5"]}
    });

    Mock::given(method("GET"))
        .and(path("/comments/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            submission(),
            listing(vec![
                comment(
                    "c1",
                    "t3_abc",
                    "first",
                    listing(vec![comment("c2", "t1_c1", "deep", listing(vec![continue_marker]))]),
                ),
                load_more,
            ]),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/morechildren"))
        .and(query_param("link_id", "t3_abc"))
        .and(query_param("children", "c4,c5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": {
                "errors": [],
                "data": {"things": [
                    comment("c4", "t3_abc", "late top-level", json!("")),
                    comment("c5", "t1_c4", "reply to late", json!(""))
                ]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/abc/_/c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            submission(),
            listing(vec![comment(
                "c2",
                "t1_c1",
                "deep",
                listing(vec![comment("c3", "t1_c2", "deepest", json!(""))]),
            )]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let thread = client.fetch_thread(THREAD_URL).await.unwrap();
    let expanded = expand_all(&client, thread).await.unwrap();

    let ids: Vec<&str> = expanded.comments().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c4", "c2", "c5", "c3"]);
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_reddit_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let result =
        RedditClient::connect_to(&credentials(), Duration::from_secs(5), &server.uri(), &server.uri()).await;
    match result {
        Err(Error::RedditApi(msg)) => assert!(msg.contains("invalid_grant")),
        Err(other) => panic!("expected RedditApi, got {:?}", other),
        Ok(_) => panic!("expected an error"),
    }
}

#[tokio::test]
async fn test_application_only_auth_without_script_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "app-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = RedditCredentials {
        username: None,
        password: None,
        ..credentials()
    };
    RedditClient::connect_to(&credentials, Duration::from_secs(5), &server.uri(), &server.uri())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unexpected_thread_shape_is_malformed() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/comments/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let result = connect(&server).await.fetch_thread(THREAD_URL).await;
    assert!(matches!(result, Err(Error::MalformedThread(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_non_thread_url_is_malformed() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let result = connect(&server)
        .await
        .fetch_thread("https://www.reddit.com/r/ecommerce/")
        .await;
    assert!(matches!(result, Err(Error::MalformedThread(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_top_level_continue_placeholder_is_rejected() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/comments/abc/_/t3_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let placeholder = MorePlaceholder {
        id: "_".to_string(),
        parent_id: "t3_abc".to_string(),
        count: 0,
        children: vec![],
    };

    match connect(&server).await.expand("t3_abc", &placeholder).await {
        Err(Error::MalformedThread(msg)) => assert!(msg.contains("t3_abc"), "got {}", msg),
        other => panic!("expected MalformedThread, got {:?}", other),
    }
}
