pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::http_server::error::AppError;

/// Integer id from the `{id}` path segment. Anything else is a missing page, not a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                log::debug!("Rejecting path id: {}", e);
                AppError::NotFound
            })?;
        Ok(EntityId(id))
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
