//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookListQuery, BookSearchQuery},
};

/// Confirmation body of delete, borrow and return
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 200, description = "Book created", body = Book),
        (status = 400, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.create_book(&data).await?;
    Ok(Json(book))
}

/// List books ordered by id
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookListQuery>, AppError>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .catalog
        .list_books(query.skip, query.limit)
        .await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Replace every mutable field of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Update failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(id).await?;
    Ok(MessageResponse::new("Book deleted successfully"))
}

/// Borrow a book
#[utoipa::path(
    put,
    path = "/books/{id}/borrow",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book borrowed", body = MessageResponse),
        (status = 400, description = "Book is not available", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.borrow_book(id).await?;
    Ok(MessageResponse::new("Book borrowed successfully"))
}

/// Return a borrowed book
#[utoipa::path(
    put,
    path = "/books/{id}/return",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book returned", body = MessageResponse),
        (status = 400, description = "Book is already returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.return_book(id).await?;
    Ok(MessageResponse::new("Book returned successfully"))
}

/// Search books by title, author or ISBN
#[utoipa::path(
    get,
    path = "/books/search/",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(params), _): WithRejection<Query<BookSearchQuery>, AppError>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search_books(&params.query).await?;
    Ok(Json(books))
}
