//! Write-time checks for bookmark payloads.
//!
//! Everything here is pure: failures come back as a [`ValidationError`] whose
//! `Display` is the message sent to the client.

use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;

use super::payload::BookmarkPayload;
use crate::model::{BookmarkChanges, BookmarkInsert};

pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Url,
    Rating,
    Description,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Url, Field::Rating, Field::Description];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Url => "url",
            Field::Rating => "rating",
            Field::Description => "description",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Url => "URL",
            Field::Rating => "Rating",
            Field::Description => "Description",
        }
    }

    fn is_present(&self, payload: &BookmarkPayload) -> bool {
        match self {
            Field::Title => payload.title().is_some(),
            Field::Url => payload.url().is_some(),
            Field::Rating => payload.rating().is_some(),
            Field::Description => payload.description().is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingField(Field),
    #[error("Rating must be a number between 0 and 5.")]
    InvalidRating(JsonValue),
    #[error("url must be a valid URL")]
    InvalidUrl(String),
    #[error("Request body must contain either 'title', 'url', 'rating' or 'description'")]
    EmptyUpdate,
}

/// Fields missing from a create payload, in declaration order.
pub fn require_fields(payload: &BookmarkPayload) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| !field.is_present(payload))
        .collect()
}

pub fn require_at_least_one_updatable_field(payload: &BookmarkPayload) -> bool {
    Field::ALL.iter().any(|field| field.is_present(payload))
}

/// Accepts JSON integers, and floats without a fractional part, in `0..=5`.
pub fn validate_rating(value: &JsonValue) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidRating(value.clone());

    let JsonValue::Number(number) = value else {
        return Err(invalid());
    };

    let rating = match number.as_i64() {
        Some(n) => n,
        None => {
            let f = number.as_f64().ok_or_else(invalid)?;
            if f.fract() != 0.0 || f < MIN_RATING as f64 || f > MAX_RATING as f64 {
                return Err(invalid());
            }
            f as i64
        }
    };

    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(invalid())
    }
}

/// Characters allowed in a URL as written, besides ASCII alphanumerics.
const URL_PUNCTUATION: &str = ":/?#[]@!$&'()*+,;=.-_~%";

/// Absolute http(s) URL with a host.
///
/// The string is checked as written before parsing: `Url::parse` would
/// otherwise repair whitespace, control characters or a missing `//` and
/// accept input that gets stored verbatim.
pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidUrl(value.to_string());

    let lower = value.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(invalid());
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || URL_PUNCTUATION.contains(c)) {
        return Err(invalid());
    }
    if !has_valid_percent_escapes(value) {
        return Err(invalid());
    }

    let parsed = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

// Every `%` must start a two-digit hex escape.
fn has_valid_percent_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || (bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

pub fn validate_new(payload: &BookmarkPayload) -> Result<BookmarkInsert, ValidationError> {
    if let Some(field) = require_fields(payload).first() {
        return Err(ValidationError::MissingField(*field));
    }

    // require_fields guarantees every accessor below is Some.
    let (Some(title), Some(url), Some(rating), Some(description)) = (
        payload.title(),
        payload.url(),
        payload.rating(),
        payload.description(),
    ) else {
        return Err(ValidationError::MissingField(Field::Title));
    };

    let rating = validate_rating(rating)?;
    validate_url(url)?;

    Ok(BookmarkInsert {
        title: title.to_string(),
        url: url.to_string(),
        rating,
        description: description.to_string(),
    })
}

pub fn validate_changes(payload: &BookmarkPayload) -> Result<BookmarkChanges, ValidationError> {
    if !require_at_least_one_updatable_field(payload) {
        return Err(ValidationError::EmptyUpdate);
    }

    let rating = payload.rating().map(validate_rating).transpose()?;
    if let Some(url) = payload.url() {
        validate_url(url)?;
    }

    Ok(BookmarkChanges {
        title: payload.title().map(str::to_string),
        url: payload.url().map(str::to_string),
        rating,
        description: payload.description().map(str::to_string),
    })
}
