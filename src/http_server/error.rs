use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::http_server::views;
use crate::services::ServiceError;

/// Error returned by page handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type AppResult<T> = Result<T, AppError>;

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound | AppError::Service(ServiceError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, Html(views::not_found())).into_response()
            }
            err => {
                log::error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error()),
                )
                    .into_response()
            }
        }
    }
}
