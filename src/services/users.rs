//! User management service
//!
//! Every user references exactly one existing book. The reference is
//! verified here before each write; the store re-checks it atomically with
//! the write itself.

use crate::{
    error::{AppError, AppResult},
    models::user::{User, UserForm},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn require_book(&self, book_id: i64) -> AppResult<()> {
        self.repository
            .books
            .find_by_id(book_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::book_not_found(book_id))
    }

    /// Create a user pointing at `book_id`
    pub async fn create_user(&self, user: UserForm, book_id: i64) -> AppResult<User> {
        self.require_book(book_id).await?;

        let created = self.repository.users.insert(&user, book_id).await?;
        tracing::info!(user_id = created.id, book_id, "user created");
        Ok(created)
    }

    pub async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.repository.users.find_by_id(id).await
    }

    pub async fn find_all_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.find_all().await
    }

    /// Copy name, last name and phone from `details` and re-point the user
    /// at `book_id`. Any other field of `details` is ignored.
    pub async fn update_user(&self, id: i64, details: UserForm, book_id: i64) -> AppResult<User> {
        let mut user = self
            .repository
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        self.require_book(book_id).await?;

        let previous_book = user.book_id;
        user.apply(details, book_id);
        let updated = self.repository.users.update(&user).await?;

        tracing::info!(user_id = id, previous_book, book_id, "user updated");
        Ok(updated)
    }

    /// Delete a user. Deleting an unknown id is not an error.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete_by_id(id).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.users.count().await
    }
}
