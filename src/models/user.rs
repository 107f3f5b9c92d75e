//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User record. The borrowed book is referenced by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub book_id: i64,
    pub created_at: DateTime<Utc>,
}

/// User attributes accepted from callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserForm {
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Create/update user request: the form fields plus the book to reference
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserRequest {
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub book_id: i64,
}

impl UserRequest {
    /// Split into the user payload and the separate book id parameter
    pub fn into_parts(self) -> (UserForm, i64) {
        (
            UserForm {
                name: self.name,
                last_name: self.last_name,
                phone: self.phone,
            },
            self.book_id,
        )
    }
}

impl User {
    /// Copy the three scalar attributes and re-point the book reference.
    /// Nothing else on the record changes.
    pub fn apply(&mut self, form: UserForm, book_id: i64) {
        self.name = form.name;
        self.last_name = form.last_name;
        self.phone = form.phone;
        self.book_id = book_id;
    }
}
