//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Default page size of list requests
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Book record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    /// `true` while on the shelf, `false` while borrowed
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields of a book, used for both create and full replace.
///
/// `id`, `available` and `created_at` are owned by the store and cannot be
/// set through this type; any such keys in a request body are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Offset/limit parameters of the list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Number of records to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default: 100)
    pub limit: Option<i64>,
}

/// Search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Case-insensitive substring matched against title, author and ISBN
    pub query: String,
}

/// Outcome of an availability update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityChange {
    /// The flag was flipped to the requested value
    Changed,
    /// The record already held the requested value
    Unchanged,
}
