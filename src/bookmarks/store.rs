use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::Database;
use crate::model::{Bookmark, BookmarkChanges, BookmarkInsert};

/// Persistence for the `bookmarks` table.
///
/// Backed by libsql in production; tests swap in their own implementations.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Bookmark>>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>>;
    async fn insert(&self, input: BookmarkInsert) -> Result<Bookmark>;
    /// Returns `false` when no row has this id.
    async fn update(&self, id: i64, changes: BookmarkChanges) -> Result<bool>;
    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct Bookmarks {
    db: Arc<Database>,
}

impl Bookmarks {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            rating: row.get(3)?,
            description: row.get(4)?,
        })
    }
}

#[async_trait]
impl BookmarkStore for Bookmarks {
    async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, title, url, rating, description
            FROM bookmarks
            ORDER BY id
        "#;

        let mut rows = self.db.connection().query(query, ()).await?;
        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, title, url, rating, description
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.db.connection().query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn insert(&self, input: BookmarkInsert) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (title, url, rating, description)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, rating, description
        "#;

        let mut rows = self
            .db
            .connection()
            .query(
                query,
                libsql::params![input.title, input.url, input.rating, input.description],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Self::row_to_bookmark(&row)
        } else {
            anyhow::bail!("Failed to create bookmark")
        }
    }

    async fn update(&self, id: i64, changes: BookmarkChanges) -> Result<bool> {
        if changes.is_empty() {
            return Ok(self.get_by_id(id).await?.is_some());
        }

        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = changes.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = changes.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(rating) = changes.rating {
            updates.push("rating = ?");
            params.push(rating.into());
        }
        if let Some(description) = changes.description {
            updates.push("description = ?");
            params.push(description.into());
        }

        updates.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
        params.push(id.into());

        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        let affected = self.db.connection().execute(&query, params).await?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .db
            .connection()
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(affected > 0)
    }
}
