//! Repository layer for database operations
//!
//! Each entity gets a store trait; the services only ever see
//! `Arc<dyn BookStore>` / `Arc<dyn UserStore>`, so the PostgreSQL tables and
//! the in-memory arena are interchangeable.

pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookForm, User, UserForm},
};

/// Data access for the `books` table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// `None` when no row has this id
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// All rows in id order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// Insert a row; the store assigns `id` and `created_at`
    async fn insert(&self, book: &BookForm) -> AppResult<Book>;

    /// Overwrite the row identified by `book.id`
    async fn update(&self, book: &Book) -> AppResult<Book>;

    /// Remove the row. Missing ids are a no-op; rows still referenced by a
    /// user fail with `ConstraintViolation`.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;
}

/// Data access for the `users` table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Insert a row referencing `book_id`. The book must exist when the
    /// write lands.
    async fn insert(&self, user: &UserForm, book_id: i64) -> AppResult<User>;

    /// Overwrite the row identified by `user.id`, including its book reference
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Remove the row; missing ids are a no-op
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>, users: Arc<dyn UserStore>) -> Self {
        Self { books, users }
    }

    /// Repositories backed by PostgreSQL tables
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Repositories backed by a single shared in-memory arena
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            books: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}
