use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Failures reported by a [`UserStore`](super::repo::UserStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already used: {0}")]
    DuplicateEmail(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Broad class of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller can fix the request.
    Validation,
    /// Credentials were rejected.
    Auth,
    /// Store or crypto failure; details stay server-side.
    Internal,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Email already used")]
    EmailAlreadyUsed,

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong Password")]
    WrongPassword,

    #[error("Internal Server Error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::InvalidInput(_) | AuthError::EmailAlreadyUsed => ErrorCategory::Validation,
            AuthError::UserNotFound | AuthError::WrongPassword => ErrorCategory::Auth,
            AuthError::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::EmailAlreadyUsed => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::WrongPassword => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => AuthError::EmailAlreadyUsed,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(ref e) = self {
            error!(error = ?e, "internal auth failure");
        }
        let status = self.status();
        debug!(category = ?self.category(), status = %status, "auth request rejected");
        (status, Json(json!({ "msg": self.to_string() }))).into_response()
    }
}
