//! Mapping from handler failures to HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resource_framework::{ErrorBody, ResourceError};
use tracing::error;

/// Every error a route can return.
#[derive(Debug)]
pub enum ApiError {
    Resource(ResourceError),
    /// Body exceeded the configured limit. Kept apart so it stays a 413.
    PayloadTooLarge(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resource(ResourceError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            ApiError::Resource(ResourceError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Resource(ResourceError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Resource(ResourceError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Resource(e) => ErrorBody::from(e),
            ApiError::PayloadTooLarge(message) => ErrorBody {
                error_type: "PayloadTooLarge".to_string(),
                message: message.clone(),
            },
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        ApiError::Resource(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Resource(ResourceError::Validation(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::Resource(ResourceError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Resource(ResourceError::Store(cause)) = &self {
            // full detail goes to the log only
            error!(error = %cause, "Store operation failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::{FrameworkError, Operation};

    #[test]
    fn status_mapping() {
        let cases = [
            (
                ResourceError::Forbidden {
                    operation: Operation::Update,
                },
                StatusCode::FORBIDDEN,
            ),
            (
                ResourceError::NotFound { kind: "Car", id: 1 },
                StatusCode::NOT_FOUND,
            ),
            (
                ResourceError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ResourceError::Store(FrameworkError::ActorDropped),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn oversized_body_stays_413() {
        let error = ApiError::PayloadTooLarge("too big".into());
        assert_eq!(error.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
