use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// 应用自定义错误类型
///
/// Only errors that surface as an HTTP error status live here. Upstream
/// fetch failures are a [`FetchError`] instead: those still render a badge
/// whose status text is the error message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("badge rendering failed: {0}")]
    Render(String),
    #[error("unknown request type: {0}")]
    UnknownRequestType(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Error processing request: {}", self);
        let (status, body) = match &self {
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            AppError::UnknownRequestType(_) => (StatusCode::NOT_FOUND, "Not Found"),
        };
        // Add Cache-Control header to error responses for badges to prevent caching
        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        response
            .headers_mut()
            .insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        response
            .headers_mut()
            .insert(header::EXPIRES, HeaderValue::from_static("0"));
        response
    }
}

/// Failure talking to a provider API. The `Display` text of the error is
/// what ends up as the badge's status text, so variants carry a short
/// human-readable message rather than a structured taxonomy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Payload(String),
}
