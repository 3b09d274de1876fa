use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::bookmarks::ValidationError;

pub const SERVER_ERROR_MESSAGE: &str = "server error";

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    MalformedBody(String),
    #[error("Bookmark doesn't exist")]
    NotFound,
    #[error("Unauthorized request")]
    Unauthorized,
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl BookmarkError {
    pub fn status(&self) -> StatusCode {
        use BookmarkError::*;
        match self {
            Validation(_) | MalformedBody(_) => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Unauthorized => StatusCode::UNAUTHORIZED,
            Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookmarkError {
    fn into_response(self) -> Response {
        use BookmarkError::*;
        let status = self.status();
        match self {
            Validation(ValidationError::EmptyUpdate) => {
                (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
            }
            Validation(_) | MalformedBody(_) => (status, self.to_string()).into_response(),
            NotFound | Unauthorized => {
                (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
            }
            Persistence(e) => {
                let source: &(dyn std::error::Error + 'static) = e.as_ref();
                tracing::error!(error = %crate::unpack_error(source), "persistence failure");
                (status, Json(ErrorResponse::new(SERVER_ERROR_MESSAGE))).into_response()
            }
        }
    }
}
