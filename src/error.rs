use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::accounts::AuthError;
use crate::chart::ChartError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No valid session; the visitor is sent to the login page.
    #[error("Login required")]
    LoginRequired,

    #[error("Entry not found or unauthorized")]
    EntryNotFound,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::LoginRequired => return Redirect::to("/login").into_response(),
            AppError::EntryNotFound => (
                StatusCode::NOT_FOUND,
                "Entry not found or unauthorized".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(e) => {
                tracing::error!("Auth error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Chart(e) => {
                tracing::error!("Chart error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Task(e) => {
                tracing::error!("Task error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
