//! API error responses

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Missing form field: {0}")]
    MissingField(&'static str),
    #[error("Malformed upload: {message}")]
    Multipart { status: StatusCode, message: String },
    #[error("Too many requests")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inference(InferenceError::InvalidImage(_)) => StatusCode::BAD_REQUEST,
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Inference(e) => e.kind(),
            ApiError::MissingField(_) => "missing_field",
            ApiError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "payload_too_large"
            }
            ApiError::Multipart { .. } => "malformed_upload",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Message safe to show to the user
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Inference(InferenceError::InvalidImage(e)) => e.to_string(),
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => {
                "The classifier model is not available".to_string()
            }
            ApiError::Inference(_) | ApiError::Internal(_) => {
                "Classification failed, please try again".to_string()
            }
            ApiError::RateLimited {
                retry_after_secs: Some(secs),
            } => format!("Too many requests, please wait {}s", secs),
            ApiError::RateLimited { .. } => "Too many requests, please wait a moment".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Rewrite the rate limiter's plain-text 429 as a JSON [`ErrorBody`],
/// keeping its `x-ratelimit-*` and `retry-after` headers.
pub async fn json_rate_limit_response(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let headers = response.headers().clone();
    let mut json = ApiError::RateLimited {
        retry_after_secs: retry_after_secs(&headers),
    }
    .into_response();

    for (name, value) in headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            json.headers_mut().append(name.clone(), value.clone());
        }
    }
    json
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    ["x-ratelimit-after", "retry-after"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .find_map(|value| value.to_str().ok()?.trim().parse().ok())
}
