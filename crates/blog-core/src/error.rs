//! Error types shared by the post flows and the storage ports.

use thiserror::Error;
use uuid::Uuid;

/// Why a post or account operation could not complete.
///
/// Invalid form input is not an error: flows re-render the form instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} {id} does not exist")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// A write was attempted without an authenticated author.
    #[error("Authentication required")]
    Unauthorized,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "User",
            id,
        }
    }
}

/// Storage failures, independent of the backend.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage unreachable: {0}")]
    Connection(String),

    #[error("Storage query failed: {0}")]
    Query(String),

    #[error("Row not found")]
    NotFound,

    /// Unique or foreign key violation.
    #[error("Constraint violated: {0}")]
    Constraint(String),
}
