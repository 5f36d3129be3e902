//! # Widget Error Types
//!
//! Typed error handling for the gateway-docs widget engine.
//! All fallible widget operations return `Result<T, WidgetError>`.

use thiserror::Error;

/// Core error type for all widget operations
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Configuration errors (bad env values, unreadable content files)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Sample set is empty, has duplicate keys or a foreign default
    #[error("Invalid sample set: {0}")]
    InvalidSampleSet(String),

    /// Page content failed validation
    #[error("Invalid page content: {0}")]
    InvalidPage(String),

    /// Page not found in catalog
    #[error("Page not found: {page_id}")]
    PageNotFound { page_id: String },

    /// Mounted view not found
    #[error("View not found: {view_id}")]
    ViewNotFound { view_id: String },

    /// Block instance is not mounted (never was, or already unmounted)
    #[error("Block instance not mounted: {instance_id}")]
    UnknownInstance { instance_id: String },

    /// Clipboard write failed
    #[error("Clipboard error [{backend}]: {message}")]
    Clipboard { backend: String, message: String },

    /// Diagram engine rejected the definition or returned garbage
    #[error("Render error [{engine}]: {message}")]
    Render { engine: String, message: String },

    /// Diagram definition is unusable before reaching any engine
    #[error("Invalid diagram definition: {0}")]
    InvalidDefinition(String),

    /// Network/HTTP error talking to an external engine
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WidgetError {
    /// Returns true if retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WidgetError::NetworkError(_) | WidgetError::Clipboard { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            WidgetError::Configuration(_) => 500,
            WidgetError::InvalidSampleSet(_) => 422,
            WidgetError::InvalidPage(_) => 422,
            WidgetError::PageNotFound { .. } => 404,
            WidgetError::ViewNotFound { .. } => 404,
            WidgetError::UnknownInstance { .. } => 404,
            WidgetError::Clipboard { .. } => 502,
            WidgetError::Render { .. } => 502,
            WidgetError::InvalidDefinition(_) => 400,
            WidgetError::NetworkError(_) => 503,
            WidgetError::Serialization(_) => 500,
            WidgetError::Internal(_) => 500,
        }
    }
}

/// Result type alias for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;
