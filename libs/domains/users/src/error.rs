use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tonic::Status;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Invalid request body: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("User with email '{0}' not found")]
    NotFound(String),

    // Fixed wording, shared by unknown-email and wrong-password failures so
    // callers cannot probe which addresses are registered.
    #[error("email or password is incorrect")]
    Authentication,

    #[error("Request cancelled")]
    Cancelled,
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UserError::Decode(_) | UserError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            UserError::Authentication => (StatusCode::UNAUTHORIZED, self.to_string()),
            UserError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            UserError::DuplicateEmail(_) => (StatusCode::CONFLICT, self.to_string()),
            UserError::Hashing(details) | UserError::Persistence(details) => {
                tracing::error!("Internal error: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::Decode(_) | UserError::Validation(_) => {
                Status::invalid_argument(err.to_string())
            }
            UserError::Authentication => Status::unauthenticated(err.to_string()),
            UserError::NotFound(_) => Status::not_found(err.to_string()),
            UserError::DuplicateEmail(_) => Status::already_exists(err.to_string()),
            UserError::Hashing(details) | UserError::Persistence(details) => {
                tracing::error!("Internal error: {}", details);
                Status::internal("An internal error occurred")
            }
            UserError::Cancelled => Status::cancelled(err.to_string()),
        }
    }
}
