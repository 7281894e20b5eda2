use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use report::ReportError;

use serde::Serialize;
pub use server::{SESSION_COOKIE, ServerOptions, router, run_with_listener};
pub use uploads::UploadStore;

mod auth;
mod income;
mod reports;
mod server;
mod summary;
mod tickets;
mod uploads;
mod users;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Report(ReportError),
    Io(std::io::Error),
    NotFound(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

const INTERNAL: &str = "internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::PasswordHash(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            INTERNAL.to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            INTERNAL.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Report(err) => {
                tracing::error!("report error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
            ServerError::Io(err) => {
                tracing::error!("io error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
            ServerError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ReportError> for ServerError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
