//! Error types for Timetable

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Login '{0}' already exists")]
    LoginExists(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Book '{0}' already exists")]
    BookExists(String),

    #[error("Book '{0}' not found")]
    BookNotFound(String),

    #[error("Config file not found. Run 'timetable init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Auth(AuthError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Error::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            Error::BookNotFound(_) => StatusCode::NOT_FOUND,
            Error::LoginExists(_) | Error::UnknownRole(_) | Error::BookExists(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            return (status, "Internal server error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
