use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub rating: i64,
    pub description: String,
}

/// A fully validated bookmark, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkInsert {
    pub title: String,
    pub url: String,
    pub rating: i64,
    pub description: String,
}

/// The subset of columns a partial update writes. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub rating: Option<i64>,
    pub description: Option<String>,
}

impl BookmarkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.rating.is_none() && self.description.is_none()
    }
}
