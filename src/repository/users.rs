//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::UserStore;
use crate::{
    error::{AppError, AppResult},
    models::user::{User, UserForm},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Lock the referenced book row until the surrounding transaction ends.
///
/// `FOR KEY SHARE` blocks a concurrent `DELETE FROM books` on that row but
/// not ordinary updates of its descriptive columns.
async fn lock_book(conn: &mut PgConnection, book_id: i64) -> AppResult<()> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM books WHERE id = $1 FOR KEY SHARE")
        .bind(book_id)
        .fetch_optional(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::book_not_found(book_id))
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, user: &UserForm, book_id: i64) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;
        lock_book(&mut tx, book_id).await?;

        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, last_name, phone, book_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;
        lock_book(&mut tx, user.book_id).await?;

        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, last_name = $3, phone = $4, book_id = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(user.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::user_not_found(user.id))?;

        tx.commit().await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
