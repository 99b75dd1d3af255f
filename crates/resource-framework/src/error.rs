//! # Errors
//!
//! Two layers of errors live here:
//!
//! - [`FrameworkError`]: failures of the store actor plumbing (closed channel, dropped reply,
//!   missing record on delete).
//! - [`ResourceError`]: the taxonomy a [`ResourceHandler`](crate::ResourceHandler) reports to
//!   its caller: access denied, not found, validation failed, store failure.
//!
//! [`ErrorBody`] is the uniform wire payload every `ResourceError` is rendered into.

use crate::entity::RecordId;
use crate::policy::Operation;
use serde::{Deserialize, Serialize};

/// Errors that can occur within the store actor plumbing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(RecordId),
}

/// Failures reported by the generic resource handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// The caller lacks the role the operation requires.
    #[error("Access is denied")]
    Forbidden { operation: Operation },

    /// The looked-up id has no live record.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: RecordId },

    /// Request parameters or body failed field validation.
    #[error("{0}")]
    Validation(String),

    /// The underlying store failed.
    #[error("Store failure: {0}")]
    Store(#[from] FrameworkError),
}

impl ResourceError {
    /// Error-kind tag carried in the `type` field of the wire payload.
    pub fn error_type(&self) -> &'static str {
        match self {
            ResourceError::Forbidden { .. } => "AccessDeniedException",
            ResourceError::NotFound { .. } => "EntityNotFoundException",
            ResourceError::Validation(_) => "ValidationException",
            ResourceError::Store(_) => "StoreFailure",
        }
    }
}

/// Structured error payload: `{"type": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl From<&ResourceError> for ErrorBody {
    fn from(error: &ResourceError) -> Self {
        // store internals stay out of the response
        let message = match error {
            ResourceError::Store(_) => "The resource store failed to complete the request".to_string(),
            other => other.to_string(),
        };
        Self {
            error_type: error.error_type().to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let error = ResourceError::NotFound { kind: "Bike", id: 7 };
        let body = ErrorBody::from(&error);
        assert_eq!(body.error_type, "EntityNotFoundException");
        assert_eq!(body.message, "Bike with id 7 not found");
    }

    #[test]
    fn not_found_payload_uses_type_key() {
        let error = ResourceError::NotFound {
            kind: "Restaurant",
            id: 15,
        };
        let json = serde_json::to_value(ErrorBody::from(&error)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "EntityNotFoundException",
                "message": "Restaurant with id 15 not found"
            })
        );
    }

    #[test]
    fn store_failure_hides_internal_detail() {
        let error = ResourceError::from(FrameworkError::ActorClosed);
        let body = ErrorBody::from(&error);
        assert_eq!(body.error_type, "StoreFailure");
        assert!(!body.message.contains("actor"));
    }

    #[test]
    fn forbidden_has_fixed_message() {
        let error = ResourceError::Forbidden {
            operation: Operation::Delete,
        };
        let body = ErrorBody::from(&error);
        assert_eq!(body.error_type, "AccessDeniedException");
        assert_eq!(body.message, "Access is denied");
    }
}
