// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::db::DbError;
use crate::schema::Violation;

/// Request-scope error taxonomy. Validation and not-found are expected
/// per-request outcomes and are never logged as errors; everything else is
/// logged with full context and surfaced only as an opaque message.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(Vec<Violation>),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error (detail lives in the server log only)
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message. Never contains query shapes, driver errors or
    /// any other internal detail.
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Validation(_) => "payload failed schema validation".to_string(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(violations) => {
                let list: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                json!({
                    "success": false,
                    "error": self.message(),
                    "violations": list,
                })
            }
            _ => json!({
                "success": false,
                "error": self.message(),
            }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<Violation> for ApiError {
    fn from(violation: Violation) -> Self {
        ApiError::Validation(vec![violation])
    }
}

impl From<Vec<Violation>> for ApiError {
    fn from(violations: Vec<Violation>) -> Self {
        ApiError::Validation(violations)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(detail) => {
                tracing::error!("database connection failure: {}", detail);
                ApiError::Internal("database unavailable".to_string())
            }
            DbError::Query(detail) => {
                // Log the real error but return a generic message
                tracing::error!("database query failure: {}", detail);
                ApiError::Internal("an error occurred while processing your request".to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ViolationReason, Violation};

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_body_lists_violations_in_order() {
        let err = ApiError::Validation(vec![
            Violation { path: "name".into(), reason: ViolationReason::Missing },
            Violation { path: "modelId".into(), reason: ViolationReason::InvalidId },
        ]);
        let body = err.to_json();
        let list = body["violations"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].as_str().unwrap().starts_with("name:"));
        assert!(list[1].as_str().unwrap().starts_with("modelId:"));
    }

    #[test]
    fn connectivity_detail_is_not_exposed() {
        let err: ApiError = DbError::Connection("secret-host refused".into()).into();
        let body = err.to_json();
        assert!(!body["error"].as_str().unwrap().contains("secret-host"));
    }
}
