use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use bridge_core::error::CoreError;

use crate::views::layout::error_page;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Client errors render an HTML page the user can navigate back from;
/// missing resources and auth failures are answered with plain text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bridge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message and a link back.
    #[error("Bad request: {message}")]
    BadRequest { message: String, back: String },

    /// Unknown session, job or route.
    #[error("Not found")]
    NotFound,

    /// Missing or wrong token.
    #[error("Forbidden")]
    Forbidden,

    /// An internal error with diagnostic detail.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Core(CoreError::NotFound(_)) | AppError::NotFound => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            AppError::Core(CoreError::Forbidden(_)) | AppError::Forbidden => {
                (StatusCode::FORBIDDEN, "Forbidden").into_response()
            }
            AppError::Core(CoreError::Validation(message)) => bad_request(&message, None),
            AppError::BadRequest { message, back } => bad_request(&message, Some(&back)),
            AppError::Core(err @ (CoreError::Io(_) | CoreError::Internal(_))) => {
                server_error(&err.to_string())
            }
            AppError::InternalError(detail) => server_error(&detail),
        }
    }
}

fn bad_request(message: &str, back: Option<&str>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(error_page("Error", message, back)),
    )
        .into_response()
}

/// 500 page carrying `detail`. Also used for caught panics.
pub fn server_error(detail: &str) -> Response {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(error_page("Server error", detail, None)),
    )
        .into_response()
}
