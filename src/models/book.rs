//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Descriptive fields of a book, as submitted on create and update.
///
/// There is no `id` here: identity always comes from the path, so an `id`
/// sent in a request body is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl Book {
    /// Overwrite every descriptive field, keeping `id` and `created_at`
    pub fn apply(&mut self, form: BookForm) {
        self.title = form.title;
        self.author = form.author;
        self.isbn = form.isbn;
    }
}
