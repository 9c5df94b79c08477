//! Repository error types

use thiserror::Error;

use super::types::ReservationId;

/// Errors returned by a reservation repository
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No reservation with this identifier
    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    /// The backing service could not be reached or refused the call
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RepositoryError::NotFound(42);
        assert_eq!(err.to_string(), "Reservation not found: 42");

        let err = RepositoryError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Repository unavailable: connection refused");
    }
}
