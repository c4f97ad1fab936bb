//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror,
//! plus the JSON error body handed back to the browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error: {message}")]
    Vendor {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task store error: {0}")]
    Store(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    pub fn vendor(provider: &'static str, message: impl Into<String>) -> Self {
        Error::Vendor {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the failure came back from a vendor response.
    pub fn vendor_status(&self) -> Option<u16> {
        match self {
            Error::Vendor { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Localized failure returned to the client as `{ "error": ..., "message"?: ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ApiErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: &self.error,
            message: self.message.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}
