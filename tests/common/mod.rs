#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use tower::ServiceExt;

use bookmark_api::bookmarks::{BookmarkStore, Bookmarks};
use bookmark_api::db::Database;
use bookmark_api::handler::AppState;
use bookmark_api::model::{Bookmark, BookmarkChanges, BookmarkInsert};

pub const TOKEN: &str = "test-api-token";
pub const BASE: &str = "/api/bookmarks";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

/// Router over a fresh in-memory database, plus a handle on its store.
pub async fn test_app() -> (Router, Arc<dyn BookmarkStore>) {
    test_app_at(BASE).await
}

pub async fn test_app_at(mount_path: &str) -> (Router, Arc<dyn BookmarkStore>) {
    let db = Arc::new(Database::in_memory().await.expect("in-memory database"));
    let store: Arc<dyn BookmarkStore> = Arc::new(Bookmarks::new(db));
    let app = bookmark_api::app(AppState::new(store.clone(), TOKEN), mount_path);
    (app, store)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse { status, headers, body }
}

pub async fn authed(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> TestResponse {
    send(app, method, uri, Some(TOKEN), body).await
}

pub fn make_bookmarks_array() -> Vec<BookmarkInsert> {
    (1..=4)
        .map(|n| BookmarkInsert {
            title: format!("Test Bookmark {n}"),
            url: format!("http://www.testbookmark{n}.com"),
            rating: 5,
            description: format!("test bookmark {n} desc"),
        })
        .collect()
}

pub fn make_malicious_bookmark() -> (BookmarkInsert, BookmarkInsert) {
    let malicious = BookmarkInsert {
        title: r#"Bad Title <script>alert("xss");</script>"#.to_string(),
        url: "https://www.hackers.com".to_string(),
        rating: 1,
        description: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.to_string(),
    };
    let expected = BookmarkInsert {
        title: r#"Bad Title &lt;script&gt;alert("xss");&lt;/script&gt;"#.to_string(),
        description: r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#.to_string(),
        ..malicious.clone()
    };
    (malicious, expected)
}

pub async fn seed(store: &Arc<dyn BookmarkStore>, bookmarks: Vec<BookmarkInsert>) -> Vec<Bookmark> {
    let mut stored = Vec::new();
    for bookmark in bookmarks {
        stored.push(store.insert(bookmark).await.expect("seed bookmark"));
    }
    stored
}

pub fn to_json(bookmark: &Bookmark) -> serde_json::Value {
    serde_json::to_value(bookmark).unwrap()
}

/// A store whose every call fails, for exercising the 5xx path.
pub struct FailingStore;

#[async_trait]
impl BookmarkStore for FailingStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>> {
        anyhow::bail!("connection refused")
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Bookmark>> {
        anyhow::bail!("connection refused")
    }

    async fn insert(&self, _input: BookmarkInsert) -> Result<Bookmark> {
        anyhow::bail!("connection refused")
    }

    async fn update(&self, _id: i64, _changes: BookmarkChanges) -> Result<bool> {
        anyhow::bail!("connection refused")
    }

    async fn delete(&self, _id: i64) -> Result<bool> {
        anyhow::bail!("connection refused")
    }
}
