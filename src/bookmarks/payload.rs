use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Request body for both create and partial update.
///
/// Every field is optional at this layer; whether a field counts as supplied is
/// decided by the accessors below. `rating` stays a raw JSON value so that
/// strings and fractional numbers reach rating validation instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookmarkPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rating: Option<JsonValue>,
    #[serde(default)]
    pub description: Option<String>,
}

fn present_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl BookmarkPayload {
    pub fn title(&self) -> Option<&str> {
        present_text(&self.title)
    }

    pub fn url(&self) -> Option<&str> {
        present_text(&self.url)
    }

    /// `0` is a rating like any other; only an omitted key or `null` is absent.
    pub fn rating(&self) -> Option<&JsonValue> {
        self.rating.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        present_text(&self.description)
    }
}
