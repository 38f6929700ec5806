//! Error types for catalogue operations.

use thiserror::Error;

use crate::types::Category;

/// Errors that can occur while talking to the metadata provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogueError {
    /// Transport failure, non-success status, or undecodable payload.
    #[error("Failed to {operation}: {reason}")]
    FetchFailed {
        /// Human-readable name of the attempted operation
        operation: String,
        /// The reason for the failure
        reason: String,
    },

    /// The provider has no record for the requested id.
    #[error("{category} {id} not found")]
    NotFound {
        /// Category the lookup was made in
        category: Category,
        /// The id that was requested
        id: u64,
    },

    /// Request rejected locally before reaching the network.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// The reason the request was rejected
        reason: String,
    },
}

impl CatalogueError {
    pub(crate) fn fetch_failed(
        operation: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::FetchFailed {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly message suitable for display in a view.
    pub fn user_message(&self) -> String {
        match self {
            CatalogueError::FetchFailed { operation, .. } => {
                format!("Failed to {operation}. Please try again later.")
            }
            CatalogueError::NotFound { category, .. } => {
                format!("{} not found", capitalize(category.singular()))
            }
            CatalogueError::InvalidRequest { reason } => format!("Invalid request: {reason}"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = CatalogueError::fetch_failed("fetch popular movies", "HTTP 500");
        assert_eq!(
            err.user_message(),
            "Failed to fetch popular movies. Please try again later."
        );
        assert_eq!(err.to_string(), "Failed to fetch popular movies: HTTP 500");

        let err = CatalogueError::NotFound {
            category: Category::Series,
            id: 7,
        };
        assert_eq!(err.user_message(), "TV show not found");
        assert_eq!(err.to_string(), "TV show 7 not found");
    }
}
