// Custom Error types live here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors from the binaries' command line handling.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Error: Invalid argument \"{0}\". Use \"-h\" or \"--help\" for usage information.")]
    InvalidArgument(String),

    #[error("Error: Invalid number of arguments. Use \"-h\" or \"--help\" for usage information.")]
    InvalidNumberOfArguments,
}

/// Failures of the suggestion store or its connection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("DATABASE_URL not configured")]
    Configuration,

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Everything an endpoint can answer with besides success.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required fields")]
    Validation,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("not_found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Configuration) => {
                tracing::error!("store is not configured");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Store(StoreError::Database(ref err)) => {
                tracing::error!("store error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Client side failure talking to the endpoints.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint answered {status}: {message}")]
    Status { status: u16, message: String },
}
