//! Bookshelf catalog server
//!
//! A REST JSON API tracking book records and their lending status, backed by
//! SQLite.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: &AppConfig, repository: repository::Repository) -> Self {
        Self {
            services: Arc::new(services::Services::new(repository, config.catalog.clone())),
        }
    }
}
