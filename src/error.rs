//! Transport-facing error type. §7.
//!
//! `DomainError` (see `crate::errors::domain`) is the pure game-logic
//! failure type threaded through the engine and the WS session, which
//! turns it into an outbound `error` event itself rather than an HTTP
//! response. `AppError` only covers the handful of plain HTTP endpoints
//! (the WS upgrade and health check) that sit in front of that socket.

use actix_web::error::ResponseError;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{DomainError, ErrorKind};
use crate::errors::ErrorCode;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("not found: {detail}")]
    NotFound { detail: String },
    #[error("domain error: {0}")]
    Domain(DomainError),
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest { code, detail: detail.into() }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound { detail: detail.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal { detail: detail.into() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } => code.as_str(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Domain(err) => err.code.unwrap_or(err.kind.as_str()),
            Self::Internal { .. } => ErrorCode::Internal.as_str(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Domain(err) => match err.kind {
                ErrorKind::Identity => StatusCode::NOT_FOUND,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Legality | ErrorKind::Precondition => StatusCode::BAD_REQUEST,
                ErrorKind::State => StatusCode::CONFLICT,
                ErrorKind::Invariant => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::BadRequest { detail, .. } => detail.clone(),
            Self::NotFound { detail } => detail.clone(),
            Self::Domain(err) => err.message.clone(),
            Self::Internal { detail } => detail.clone(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let problem = ProblemDetails {
            type_: format!("https://two-hundred.app/errors/{code}"),
            title: code.replace('_', " ").to_lowercase(),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
        };
        HttpResponse::build(status).insert_header((CONTENT_TYPE, "application/problem+json")).json(problem)
    }
}
