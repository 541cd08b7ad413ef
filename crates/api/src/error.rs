use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tablebook_core::error::{CoreError, ErrorKind, FieldError};
use tablebook_db::DbError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tablebook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store constraint violation.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The error category reported to clients alongside the code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(core) => core.kind(),
            AppError::Database(DbError::UniqueViolation { .. }) => ErrorKind::Conflict,
            AppError::Database(DbError::ForeignKeyViolation { .. }) => ErrorKind::NotFound,
            AppError::Database(DbError::StillReferenced { .. }) => ErrorKind::Conflict,
            AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::InternalError(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let mut fields: Option<&[FieldError]> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(errs) => {
                    fields = Some(errs);
                    let message = errs
                        .first()
                        .map(|f| f.message.clone())
                        .unwrap_or_else(|| "Invalid input".to_string());
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Transport(msg) => {
                    tracing::warn!(error = %msg, "Upstream failure");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "SERVICE_UNAVAILABLE",
                        msg.clone(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Database(err) => classify_db_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
            "kind": kind,
        });
        if let Some(fields) = fields {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - Missing parent rows map to 404.
/// - Removing a row that is still referenced maps to 409.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        DbError::ForeignKeyViolation { constraint } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Referenced resource does not exist: {constraint}"),
        ),
        DbError::StillReferenced { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Resource is still in use: {constraint}"),
        ),
    }
}
