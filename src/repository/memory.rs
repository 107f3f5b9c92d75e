//! In-memory store used for local runs and tests.
//!
//! Rows live in id-keyed maps behind one lock; the user → book relation is
//! the plain `book_id` field, checked against the books map on every write
//! the same way the `users_book_id_fkey` constraint is checked in
//! PostgreSQL.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BookStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookForm, User, UserForm},
};

#[derive(Default)]
struct Tables {
    books: BTreeMap<i64, Book>,
    users: BTreeMap<i64, User>,
    last_book_id: i64,
    last_user_id: i64,
}

impl Tables {
    fn ensure_book(&self, book_id: i64) -> AppResult<()> {
        if self.books.contains_key(&book_id) {
            Ok(())
        } else {
            Err(AppError::book_not_found(book_id))
        }
    }
}

/// Shared arena implementing both [`BookStore`] and [`UserStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn insert(&self, book: &BookForm) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.last_book_id += 1;

        let row = Book {
            id: tables.last_book_id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            created_at: Utc::now(),
        };
        tables.books.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        let row = tables
            .books
            .get_mut(&book.id)
            .ok_or_else(|| AppError::book_not_found(book.id))?;

        row.title = book.title.clone();
        row.author = book.author.clone();
        row.isbn = book.isbn.clone();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        let borrowers = tables.users.values().filter(|u| u.book_id == id).count();
        if borrowers > 0 {
            return Err(AppError::ConstraintViolation(format!(
                "book {} is still referenced by {} user(s)",
                id, borrowers
            )));
        }

        tables.books.remove(&id);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.books.len() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn insert(&self, user: &UserForm, book_id: i64) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        tables.ensure_book(book_id)?;
        tables.last_user_id += 1;

        let row = User {
            id: tables.last_user_id,
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            book_id,
            created_at: Utc::now(),
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        tables.ensure_book(user.book_id)?;

        let row = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::user_not_found(user.id))?;

        row.name = user.name.clone();
        row.last_name = user.last_name.clone();
        row.phone = user.phone.clone();
        row.book_id = user.book_id;
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.tables.write().await.users.remove(&id);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.users.len() as i64)
    }
}
