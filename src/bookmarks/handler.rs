//! HTTP handlers for the bookmarks collection.

use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::payload::BookmarkPayload;
use super::validation::{self, ValidationError};
use crate::error::BookmarkError;
use crate::handler::AppState;
use crate::model::Bookmark;
use crate::sanitize::sanitize;

type HandlerResult = Result<Response, BookmarkError>;

/// Escapes markup in the free-text fields. Every response carrying a bookmark goes through here.
pub fn sanitize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        title: sanitize(&bookmark.title),
        description: sanitize(&bookmark.description),
        ..bookmark
    }
}

/// Non-numeric ids can never match a row, so they are reported like any unknown id.
fn parse_id(raw: &str) -> Result<i64, BookmarkError> {
    raw.parse::<i64>().map_err(|_| {
        tracing::info!("bookmark id {:?} is not an integer", raw);
        BookmarkError::NotFound
    })
}

fn read_payload(payload: Result<Json<BookmarkPayload>, JsonRejection>) -> Result<BookmarkPayload, BookmarkError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            tracing::error!("malformed request body: {}", rejection.body_text());
            Err(BookmarkError::MalformedBody(rejection.body_text()))
        }
    }
}

fn log_validation_error(err: &ValidationError) {
    match err {
        ValidationError::MissingField(field) => tracing::error!("{} is required", field.as_str()),
        ValidationError::InvalidRating(value) => tracing::error!("Invalid rating: {}", value),
        ValidationError::InvalidUrl(url) => tracing::error!("Invalid url: {}", url),
        ValidationError::EmptyUpdate => tracing::error!("Invalid update without required fields"),
    }
}

/// `<request path>/<id>`, so the header is right wherever the router is mounted.
fn location_for(uri: &OriginalUri, id: i64) -> String {
    format!("{}/{}", uri.0.path().trim_end_matches('/'), id)
}

pub async fn list_bookmarks(State(state): State<AppState>) -> HandlerResult {
    let bookmarks = state.bookmarks.list_all().await?;

    tracing::info!(count = bookmarks.len(), "listed bookmarks");
    let bookmarks: Vec<Bookmark> = bookmarks.into_iter().map(sanitize_bookmark).collect();

    Ok((StatusCode::OK, Json(bookmarks)).into_response())
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    uri: OriginalUri,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> HandlerResult {
    let payload = read_payload(payload)?;
    let input = validation::validate_new(&payload).inspect_err(log_validation_error)?;

    let bookmark = state.bookmarks.insert(input).await?;
    tracing::info!(id = bookmark.id, "bookmark created");

    let location = location_for(&uri, bookmark.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(sanitize_bookmark(bookmark)),
    )
        .into_response())
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    match state.bookmarks.get_by_id(id).await? {
        Some(bookmark) => Ok((StatusCode::OK, Json(sanitize_bookmark(bookmark))).into_response()),
        None => {
            tracing::info!(id, "bookmark not found");
            Err(BookmarkError::NotFound)
        }
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_id(&id)?;

    if !state.bookmarks.delete(id).await? {
        tracing::info!(id, "bookmark not found");
        return Err(BookmarkError::NotFound);
    }

    tracing::info!(id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> HandlerResult {
    // Body problems are reported before existence, whatever the id looks like.
    let payload = read_payload(payload)?;
    let changes = validation::validate_changes(&payload).inspect_err(log_validation_error)?;
    let id = parse_id(&id)?;

    if !state.bookmarks.update(id, changes).await? {
        tracing::info!(id, "bookmark not found");
        return Err(BookmarkError::NotFound);
    }

    tracing::info!(id, "bookmark updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}
