use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::BookRecord,
};

/// Seed list written by the bootstrap endpoint
const SEED_BOOKS: &str = include_str!("../../data/seed_books.json");

/// File-backed book catalog
///
/// The file is read on every call; edits to it take effect on the next submission without
/// a restart.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the catalog
    ///
    /// A missing, empty, or unparsable file is a catalog error; the caller must not reach
    /// the provider in that case.
    pub async fn load(&self) -> AppResult<Vec<BookRecord>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::Catalog(
                    "Book database (books.json) not found.".to_string(),
                ));
            }
            Err(e) => {
                return Err(AppError::Catalog(format!(
                    "Failed to read book database: {}",
                    e
                )));
            }
        };

        let books: Vec<BookRecord> = serde_json::from_str(&data).map_err(|e| {
            tracing::error!(error = %e, path = %self.path.display(), "Catalog file is not valid JSON");
            AppError::Catalog(format!("Book database is malformed: {}", e))
        })?;

        if books.is_empty() {
            return Err(AppError::Catalog(
                "Book database is empty. Please run the book scraper first.".to_string(),
            ));
        }

        tracing::debug!(books = books.len(), path = %self.path.display(), "Catalog loaded");
        Ok(books)
    }

    /// Overwrites the catalog file with the embedded seed list and returns the book count
    pub async fn seed(&self) -> AppResult<usize> {
        let books = seed_books()?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create data directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(&books)
            .map_err(|e| AppError::Internal(format!("Catalog serialization error: {}", e)))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write book data: {}", e)))?;

        tracing::info!(books = books.len(), path = %self.path.display(), "Catalog seeded");
        Ok(books.len())
    }
}

/// The embedded seed catalog
pub fn seed_books() -> AppResult<Vec<BookRecord>> {
    serde_json::from_str(SEED_BOOKS)
        .map_err(|e| AppError::Internal(format!("Embedded seed catalog is invalid: {}", e)))
}
