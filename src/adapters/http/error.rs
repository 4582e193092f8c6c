//! HTTP error responses.
//!
//! Body shape: `{"error": {"code": "...", "message": "...", "details": [...] | null}}`.

use crate::domain::DomainError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorPayload<'a>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    code: &'a str,
    message: &'a str,
    details: Option<&'a [String]>,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(details: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(details) => Self::bad_request(details),
            DomainError::PhoneDuplicate => Self {
                status: StatusCode::BAD_REQUEST,
                code: "PHONE_DUPLICATE",
                message: err.to_string(),
                details: None,
            },
            DomainError::EmailTaken => Self {
                status: StatusCode::CONFLICT,
                code: "UNIQUE_VIOLATION",
                message: err.to_string(),
                details: None,
            },
            DomainError::NotFound => Self::not_found("Contact not found"),
            DomainError::Repo(ref e) => {
                tracing::error!(error = %e, "storage failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "INTERNAL_ERROR",
                    message: "Internal server error".to_string(),
                    details: None,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorPayload {
                code: self.code,
                message: &self.message,
                details: self.details.as_deref(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}
