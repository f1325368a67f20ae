//! # Errors
//!
//! `GatewayError` covers everything that can go wrong behind the data gateway.
//! `AppError` is what the controllers return; the renderer itself never fails.

use thiserror::Error;

/// Failure reported by a data gateway adapter.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The store could not be reached (network, connection pool).
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered but refused the request (validation, permission).
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A row came back in a shape the caller could not decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// Local storage engine failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Update target does not exist.
    #[error("no row in {table} with id {id}")]
    NotFound { table: String, id: String },
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

/// The primary error type for all controller operations.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Caller-side input problem, raised before any gateway call.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Resource not found (e.g., poet, agent)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// A previous send for this session is still in flight.
    #[error("busy: {0}")]
    Busy(String),
}

/// A specialized Result type for Rusty-Verse logic.
pub type Result<T> = std::result::Result<T, AppError>;

/// Rejects empty or whitespace-only input, returning the trimmed text.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Precondition(format!("{field} must not be blank")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("theme", "  思乡 ").unwrap(), "思乡");
        assert!(matches!(
            require_text("theme", " \t\n"),
            Err(AppError::Precondition(msg)) if msg.contains("theme")
        ));
    }
}
