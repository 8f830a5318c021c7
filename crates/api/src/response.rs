// Response envelope shared by every API route
//
// Success and failure use the same shape:
//   {"error": "", "code": 200, "message": "", "data": {...}}
// `error` carries the underlying error text, `message` a short context line.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use event_tracker_core::TrackerError;
use serde::Serialize;
use utoipa::ToSchema;

/// Envelope wrapping every JSON response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Error text; empty on success.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Optional context for the caller.
    pub message: String,
    /// Payload; null when there is nothing to return.
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            error: String::new(),
            code: StatusCode::OK.as_u16(),
            message: String::new(),
            data: Some(data),
        })
    }
}

/// 200 with a message and no data
pub fn ack(message: impl Into<String>) -> Json<Envelope<serde_json::Value>> {
    Json(Envelope {
        error: String::new(),
        code: StatusCode::OK.as_u16(),
        message: message.into(),
        data: None,
    })
}

/// API error rendered as an envelope
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            message: String::new(),
        }
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            message: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        if err.is_client_error() {
            return ApiError::bad_request(err.to_string());
        }
        match err {
            TrackerError::Persistence(_) => {
                ApiError::internal(err.to_string()).with_message("failed to write to database")
            }
            _ => ApiError::internal(err.to_string()),
        }
    }
}

// Undecodable bodies are validation errors. Other rejections (wrong
// content type, unreadable body) keep axum's status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => rejection.status(),
        };
        Self {
            status,
            error: rejection.body_text(),
            message: String::new(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        let status = match rejection {
            FormRejection::FailedToDeserializeForm(_)
            | FormRejection::FailedToDeserializeFormBody(_) => StatusCode::BAD_REQUEST,
            _ => rejection.status(),
        };
        Self {
            status,
            error: rejection.body_text(),
            message: String::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error, "Request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.error, "Request rejected");
        }

        let body = Envelope::<serde_json::Value> {
            error: self.error,
            code: self.status.as_u16(),
            message: self.message,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}
