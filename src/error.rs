use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    /// A required form field was blank after trimming.
    #[error("{0} cannot be empty")]
    EmptySubmission(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::EmptySubmission(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Password(_)
            | AppError::Json(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Details stay in the log; the client only learns that something broke.
            tracing::error!(error = %self, "Request failed");
            return (status, "Internal server error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
