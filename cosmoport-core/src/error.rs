//! Error types for Cosmoport core.

use std::{error::Error, fmt};

/// Error type for ship registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipError {
    /// Malformed or out-of-range input; the caller can fix and retry.
    BadRequest(String),
    /// The referenced ship does not exist.
    NotFound(String),
    /// The persistence layer failed; passed through unclassified.
    Storage(String),
}

impl ShipError {
    /// Build a [`ShipError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Build a [`ShipError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build a [`ShipError::Storage`] from any displayable failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl fmt::Display for ShipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipError {}

/// Convenience result type for Cosmoport core.
pub type Result<T> = std::result::Result<T, ShipError>;

#[cfg(test)]
mod tests {
    use super::ShipError;

    #[test]
    fn bad_request_formats_message() {
        let error = ShipError::bad_request("Incorrect Ship.name");
        assert_eq!(format!("{error}"), "bad request: Incorrect Ship.name");
    }

    #[test]
    fn not_found_formats_message() {
        let error = ShipError::not_found("Ship not found");
        assert_eq!(format!("{error}"), "not found: Ship not found");
    }

    #[test]
    fn storage_wraps_display() {
        let error = ShipError::storage(std::io::Error::other("disk gone"));
        match error {
            ShipError::Storage(message) => assert_eq!(message, "disk gone"),
            other => panic!("expected Storage variant, got {other:?}"),
        }
    }
}
