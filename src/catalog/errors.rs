//! # Catalog Errors
//!
//! The store surfaces every failure unchanged. Translation to transport
//! status codes happens in the HTTP layer via [`CatalogError::status_code`].

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Lookup by id found nothing
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id or name on create
    #[error("{0}")]
    Conflict(String),

    /// Client addressed a record that does not exist (delete)
    #[error("{0}")]
    BadRequest(String),

    /// Backing file could not be read, created or written
    #[error("I/O error: {0}")]
    Io(String),

    /// Backing file exists but does not hold a well-formed table
    #[error("Corrupt table: {0}")]
    Corrupt(String),
}

impl CatalogError {
    pub(crate) fn product_not_found() -> Self {
        CatalogError::NotFound("Product not found.".to_string())
    }

    pub(crate) fn duplicate_id(id: &str) -> Self {
        CatalogError::Conflict(format!("Product with id {} already exists.", id))
    }

    pub(crate) fn duplicate_name(name: &str) -> Self {
        CatalogError::Conflict(format!("Product with name {} already exists.", name))
    }

    pub(crate) fn missing_id(id: &str) -> Self {
        CatalogError::BadRequest(format!("Product with id {} does not exist.", id))
    }

    /// Get HTTP status code
    ///
    /// Duplicate records are reported as 400, not 409.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::NotFound(_) => 404,
            CatalogError::Conflict(_) => 400,
            CatalogError::BadRequest(_) => 400,
            CatalogError::Io(_) => 500,
            CatalogError::Corrupt(_) => 500,
        }
    }

    /// True for failures of the backing file rather than of the request
    pub fn is_fatal(&self) -> bool {
        matches!(self, CatalogError::Io(_) | CatalogError::Corrupt(_))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        match e.kind() {
            csv::ErrorKind::Io(_) => CatalogError::Io(e.to_string()),
            _ => CatalogError::Corrupt(e.to_string()),
        }
    }
}
