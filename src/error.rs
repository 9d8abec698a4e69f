use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Service error types
///
/// The wire contract is deliberately flat: every error renders as
/// `{"message": <text>}` with a status code, no machine-readable code.
/// The variants exist so handlers and logs can still tell causes apart.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid image id `{0}`")]
    InvalidId(String),

    #[error("image not found")]
    NotFound,

    #[error("not found")]
    RouteNotFound,

    #[error("request is missing an `image` file part")]
    MissingFilePart,

    #[error("multipart decode failed: {0}")]
    Multipart(String),

    #[error("invalid request body: {0}")]
    BadBody(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Wrap any store-level failure
    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Store(err.to_string())
    }

    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MissingFilePart
            | ApiError::Multipart(_)
            | ApiError::BadBody(_)
            | ApiError::Store(_)
            | ApiError::Io(_)
            | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Store(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Multipart(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(err: axum::extract::multipart::MultipartRejection) -> Self {
        ApiError::Multipart(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadBody(err.to_string())
    }
}
