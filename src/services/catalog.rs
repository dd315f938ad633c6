//! Catalog management service

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::book::{AvailabilityChange, Book, BookInput, DEFAULT_PAGE_SIZE},
    repository::{Repository, StoreError},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Create a new book. A duplicate ISBN is rejected by the store.
    pub async fn create_book(&self, data: &BookInput) -> AppResult<Book> {
        let book = self.repository.books.insert(data).await.map_err(|e| {
            if matches!(e, StoreError::DuplicateKey) {
                tracing::warn!(isbn = %data.isbn, "Catalog create: ISBN already exists");
            }
            AppError::from(e)
        })?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// List books by id, `skip` clamped to zero and `limit` to the configured page size
    pub async fn list_books(&self, skip: Option<i64>, limit: Option<i64>) -> AppResult<Vec<Book>> {
        let skip = skip.unwrap_or(0).max(0);
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(0, self.config.max_page_size.max(0));
        Ok(self.repository.books.list(skip, limit).await?)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        Ok(self.repository.books.get_by_id(id).await?)
    }

    /// Replace every mutable field of a book.
    ///
    /// Optional fields missing from `data` are cleared rather than kept.
    pub async fn update_book(&self, id: i64, data: &BookInput) -> AppResult<Book> {
        match self.repository.books.replace(id, data).await {
            Ok(book) => {
                tracing::info!(book_id = id, "Book updated");
                Ok(book)
            }
            Err(StoreError::NotFound) => Err(StoreError::NotFound.into()),
            Err(StoreError::DuplicateKey) => {
                tracing::warn!(book_id = id, isbn = %data.isbn, "Book update rejected: ISBN already exists");
                Err(AppError::UpdateFailed("Update failed".to_string()))
            }
            Err(StoreError::Database(e)) => {
                tracing::error!(book_id = id, "Book update failed: {:?}", e);
                Err(AppError::UpdateFailed("Update failed".to_string()))
            }
        }
    }

    /// Delete a book regardless of its availability
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Borrow a book that is currently on the shelf
    pub async fn borrow_book(&self, id: i64) -> AppResult<()> {
        match self.repository.books.set_availability(id, false).await? {
            AvailabilityChange::Changed => {
                tracing::info!(book_id = id, "Book borrowed");
                Ok(())
            }
            AvailabilityChange::Unchanged => {
                tracing::warn!(book_id = id, "Borrow rejected: book is already borrowed");
                Err(AppError::InvalidState("Book is not available".to_string()))
            }
        }
    }

    /// Return a borrowed book
    pub async fn return_book(&self, id: i64) -> AppResult<()> {
        match self.repository.books.set_availability(id, true).await? {
            AvailabilityChange::Changed => {
                tracing::info!(book_id = id, "Book returned");
                Ok(())
            }
            AvailabilityChange::Unchanged => {
                tracing::warn!(book_id = id, "Return rejected: book is already on the shelf");
                Err(AppError::InvalidState("Book is already returned".to_string()))
            }
        }
    }

    /// Search books by title, author or ISBN
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        Ok(self.repository.books.search(query).await?)
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.repository.ping().await?)
    }
}
