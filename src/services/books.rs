//! Book management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookForm},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Persist a new book; the store assigns its id
    pub async fn create_book(&self, book: BookForm) -> AppResult<Book> {
        let created = self.repository.books.insert(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "book created");
        Ok(created)
    }

    pub async fn find_book_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        self.repository.books.find_by_id(id).await
    }

    pub async fn find_all_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.find_all().await
    }

    /// Overwrite the descriptive fields of book `id`.
    /// The id is taken from the parameter only.
    pub async fn update_book(&self, id: i64, details: BookForm) -> AppResult<Book> {
        let mut book = self
            .repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;

        book.apply(details);
        let updated = self.repository.books.update(&book).await?;
        tracing::info!(book_id = id, "book updated");
        Ok(updated)
    }

    /// Delete a book. Fails with `ConstraintViolation` while a user still
    /// references it.
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete_by_id(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Number of stored books, also used as a store liveness probe
    pub async fn count(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }
}
