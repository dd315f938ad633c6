//! Data models for Bookshelf

pub mod book;

pub use book::{AvailabilityChange, Book, BookInput, BookListQuery, BookSearchQuery};
