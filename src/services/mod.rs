use sea_orm::{DbErr, TransactionError};
use serde::Serialize;

use crate::aggregation::EntitySummary;

pub mod artist;
pub mod show;
pub mod venue;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(e) => ServiceError::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}

/// Result of a name search, shared by venues and artists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<EntitySummary>,
}

impl From<Vec<EntitySummary>> for SearchResults {
    fn from(data: Vec<EntitySummary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive substring match on a display name.
///
/// Both sides are lowercased with full Unicode case mapping, so `élan` finds "Café Élan".
/// An empty term matches every name.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}
