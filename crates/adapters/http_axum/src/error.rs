//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use foodbase_domain::error::FoodbaseError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldBody>,
}

/// One offending field of a validation failure.
#[derive(Serialize)]
struct FieldBody {
    field: &'static str,
    message: String,
}

/// Maps [`FoodbaseError`] and body rejections to an HTTP response.
pub enum ApiError {
    /// Error raised by the domain or application layer.
    Domain(FoodbaseError),
    /// The request body was not a readable JSON object.
    Body(JsonRejection),
}

impl From<FoodbaseError> for ApiError {
    fn from(err: FoodbaseError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Domain(FoodbaseError::InvalidId(err)) => {
                (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string()))
            }
            Self::Domain(FoodbaseError::NotFound(err)) => {
                (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string()))
            }
            Self::Domain(FoodbaseError::Validation(err)) => {
                let fields = err
                    .fields()
                    .iter()
                    .map(|field| FieldBody {
                        field: field.field,
                        message: field.problem.to_string(),
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: err.to_string(),
                        fields,
                    },
                )
            }
            Self::Domain(FoodbaseError::Storage(err)) => {
                tracing::error!(error = ?err, "storage error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::message("storage error".to_string()),
                )
            }
            Self::Body(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::message(rejection.body_text()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl ErrorBody {
    fn message(error: String) -> Self {
        Self {
            error,
            fields: Vec::new(),
        }
    }
}
