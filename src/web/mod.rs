//! HTTP mapping for API errors: every failure becomes an AWS-style error
//! envelope with a request ID, even when the request never reached a
//! handler.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::ApiError;
use crate::ident;

#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
}

impl ApiFailure {
    pub fn new(error: ApiError) -> Self {
        Self { error }
    }

    fn status(&self) -> StatusCode {
        match self.error {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Duplicate { .. } => StatusCode::CONFLICT,
            ApiError::DryRunOperation => StatusCode::PRECONDITION_FAILED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ApiError> for ApiFailure {
    fn from(error: ApiError) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "Response": {
                "Errors": {
                    "Error": {
                        "Code": self.error.code(),
                        "Message": self.error.to_string(),
                    }
                },
                "RequestID": ident::request_id(),
            }
        }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiFailure>;
