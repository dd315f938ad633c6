//! Books repository for database operations.
//!
//! ISBN uniqueness is enforced by the `idx_books_isbn` unique index, so
//! insert and replace never check for duplicates before writing; a unique
//! violation raised by SQLite surfaces as [`StoreError::DuplicateKey`].

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use super::{StoreError, StoreResult};
use crate::models::book::{AvailabilityChange, Book, BookInput};

const BOOK_COLUMNS: &str =
    "id, title, author, isbn, published_year, description, available, created_at";

/// Escape `LIKE` metacharacters so the caller's text matches literally.
/// Pair with `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Insert a new book; the store assigns `id`, `available` and `created_at`
    pub async fn insert(&self, data: &BookInput) -> StoreResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, isbn, published_year, description, available, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(&data.author)
            .bind(&data.isbn)
            .bind(data.published_year)
            .bind(&data.description)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(book)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// List books ordered by id
    pub async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY id LIMIT ? OFFSET ?",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Overwrite every mutable field of a book.
    ///
    /// `id`, `available` and `created_at` are left untouched.
    pub async fn replace(&self, id: i64, data: &BookInput) -> StoreResult<Book> {
        let query = format!(
            r#"
            UPDATE books SET
                title = ?,
                author = ?,
                isbn = ?,
                published_year = ?,
                description = ?
            WHERE id = ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(&data.author)
            .bind(&data.isbn)
            .bind(data.published_year)
            .bind(&data.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Delete a book
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Set the availability flag.
    ///
    /// The write only happens when the stored value differs, so of two
    /// concurrent callers requesting the same value exactly one observes
    /// [`AvailabilityChange::Changed`].
    pub async fn set_availability(&self, id: i64, available: bool) -> StoreResult<AvailabilityChange> {
        let result = sqlx::query("UPDATE books SET available = ?1 WHERE id = ?2 AND available <> ?1")
            .bind(available)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 1 {
            return Ok(AvailabilityChange::Changed);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match exists {
            Some(_) => Ok(AvailabilityChange::Unchanged),
            None => Err(StoreError::NotFound),
        }
    }

    /// Case-insensitive literal substring search over title, author and ISBN
    pub async fn search(&self, text: &str) -> StoreResult<Vec<Book>> {
        let pattern = format!("%{}%", escape_like(text));
        let query = format!(
            r#"
            SELECT {} FROM books
            WHERE title LIKE ?1 ESCAPE '\'
               OR author LIKE ?1 ESCAPE '\'
               OR isbn LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
