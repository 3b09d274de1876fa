use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::api::StatusResponse;
use crate::bookmarks::BookmarkStore;

#[derive(Clone)]
pub struct AppState {
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub api_token: Arc<String>,
}

impl AppState {
    pub fn new(bookmarks: Arc<dyn BookmarkStore>, api_token: impl Into<String>) -> Self {
        AppState {
            bookmarks,
            api_token: Arc::new(api_token.into()),
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse::new_from_msg("ok"))
}
