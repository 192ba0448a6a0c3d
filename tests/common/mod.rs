// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;

use scraps_ogp::ogp::{OgpClient, OgpSource, USER_AGENT};
use scraps_ogp::{FetchError, LinkTarget, OgpMetadata, OgpProvider};

pub const GITHUB_TITLE: &str = "GitHub - boykush/scraps: Scraps is a portable CLI knowledge hub";
pub const GITHUB_DESCRIPTION: &str =
    "Scraps is a portable CLI knowledge hub for managing interconnected Markdown documentation.";
pub const GITHUB_IMAGE: &str =
    "https://repository-images.githubusercontent.com/659405543/5c1a5c43-0bb1-4b6e-8c4b-6f0f1f1f2a11";

/// Stand-in for the GitHub repository page the docs autolink to.
pub const GITHUB_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>GitHub - boykush/scraps</title>
  <meta name="description" content="fallback description">
  <meta property="og:site_name" content="GitHub">
  <meta property="og:title" content="GitHub - boykush/scraps: Scraps is a portable CLI knowledge hub">
  <meta property="og:description" content="Scraps is a portable CLI knowledge hub for managing interconnected Markdown documentation.">
  <meta property="og:image" content="https://repository-images.githubusercontent.com/659405543/5c1a5c43-0bb1-4b6e-8c4b-6f0f1f1f2a11">
</head>
<body><main>repository</main></body>
</html>"#;

pub const PLAIN_PAGE: &str = "<html><head></head><body><p>no tags here</p></body></html>";

/// How long the `/slow` route stalls before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

/// A running stand-in server and how many requests each route received.
pub struct TestServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn target(&self, path: &str) -> LinkTarget {
        LinkTarget::parse(&self.url(path)).expect("test server URL is absolute")
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn github_page(State(hits): State<Arc<AtomicUsize>>) -> Html<&'static str> {
    hits.fetch_add(1, Ordering::SeqCst);
    Html(GITHUB_PAGE)
}

async fn plain_page() -> Html<&'static str> {
    Html(PLAIN_PAGE)
}

async fn missing_page() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

async fn slow_page() -> Html<&'static str> {
    tokio::time::sleep(SLOW_DELAY).await;
    Html(GITHUB_PAGE)
}

/// Metadata provider endpoint: answers based on the `url` query parameter.
async fn provider(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
    let url = params.get("url").cloned().unwrap_or_default();
    if url.ends_with("/boykush/scraps") {
        Json(json!({
            "url": url,
            "title": "GitHub - boykush/scraps",
            "description": "Scraps is a portable CLI knowledge hub",
            "imageUrl": GITHUB_IMAGE,
        }))
        .into_response()
    } else if url.ends_with("/both-images") {
        Json(json!({
            "title": "Both images",
            "image": GITHUB_IMAGE,
            "imageUrl": "https://example.com/ignored.png",
        }))
        .into_response()
    } else if url.ends_with("/no-title") {
        Json(json!({ "url": url, "description": "untitled" })).into_response()
    } else if url.ends_with("/garbage") {
        (StatusCode::OK, "this is not json").into_response()
    } else {
        (StatusCode::BAD_GATEWAY, "upstream failed").into_response()
    }
}

pub fn create_test_router(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/boykush/scraps", get(github_page))
        .route("/plain", get(plain_page))
        .route("/missing", get(missing_page))
        .route("/slow", get(slow_page))
        .route("/api/ogp", get(provider))
        .with_state(hits)
}

/// Bind the stand-in router on an ephemeral local port.
pub async fn spawn_test_server() -> TestServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("bound address");
    let app = create_test_router(Arc::clone(&hits));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server crashed");
    });
    TestServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// A URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("bound address");
    drop(listener);
    format!("http://{addr}/gone")
}

pub fn direct_client(timeout: Duration) -> OgpClient {
    OgpClient::new(OgpSource::Direct, timeout, USER_AGENT).expect("client builds")
}

pub fn provider_client(server: &TestServer, timeout: Duration) -> OgpClient {
    let endpoint = url::Url::parse(&server.url("/api/ogp")).expect("endpoint URL");
    OgpClient::new(OgpSource::Provider(endpoint), timeout, USER_AGENT).expect("client builds")
}

/// In-memory provider with a fixed answer per URL and an optional delay.
pub struct StubProvider {
    responses: HashMap<String, Result<OgpMetadata, FetchError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            responses: HashMap::new(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond(mut self, url: &str, result: Result<OgpMetadata, FetchError>) -> Self {
        let key = LinkTarget::parse(url).expect("stub URL").to_string();
        self.responses.insert(key, result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OgpProvider for StubProvider {
    async fn fetch(&self, target: &LinkTarget) -> Result<OgpMetadata, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.responses
            .get(target.as_str())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network("no stub response".into())))
    }
}
