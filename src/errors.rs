//! Centralized error handling.
//!
//! Every handler returns `AppResult`; the error side renders as
//! `{"error": {"code", "message", "details"?}}` with the matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(ValidationErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Inventory rules
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // External service errors
    #[error("Database error")]
    Database(DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHENTICATED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock { .. }
            | AppError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Structured details for client errors that carry them
    fn details(&self) -> Option<Value> {
        match self {
            AppError::InvalidFields(errors) => {
                let mut fields = Map::new();
                collect_field_errors(errors, "", &mut fields);
                Some(Value::Object(fields))
            }
            AppError::InsufficientStock {
                product,
                available,
                requested,
            } => Some(json!({
                "product": product,
                "available": available,
                "requested": requested,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "Unique constraint violated");
                AppError::Conflict(conflict_subject(&detail).to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

/// Name the duplicated thing from the violated constraint.
fn conflict_subject(detail: &str) -> &'static str {
    if detail.contains("sku") {
        "Product with this SKU"
    } else if detail.contains("barcode") {
        "Product with this barcode"
    } else if detail.contains("email") {
        "User with this email"
    } else if detail.contains("phone") {
        "User with this phone"
    } else if detail.contains("order_number") {
        "Order with this number"
    } else if detail.contains("scanned_orders") {
        "Scan for this order"
    } else {
        "Record"
    }
}

/// Flatten nested validator errors into `path -> [messages]`.
fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Map<String, Value>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = errs
                    .iter()
                    .map(|e| {
                        let message = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field));
                        Value::String(message)
                    })
                    .collect();
                out.insert(path, Value::Array(messages));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, resource: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(resource))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: i32,
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(nested)]
        items: Vec<Line>,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("Order").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::conflict("Order").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InsufficientStock {
                product: "Mug".into(),
                available: 10,
                requested: 999
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_resource() {
        assert_eq!(AppError::not_found("Product").to_string(), "Product not found");
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("connection string leaked");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_conflict_subject_from_constraint() {
        assert_eq!(
            conflict_subject("duplicate key value violates unique constraint \"products_sku_key\""),
            "Product with this SKU"
        );
        assert_eq!(
            conflict_subject("duplicate key value violates unique constraint \"idx_scanned_orders_order_id\""),
            "Scan for this order"
        );
        assert_eq!(conflict_subject("something else"), "Record");
    }

    #[test]
    fn test_field_details_include_nested_paths() {
        let payload = Payload {
            name: String::new(),
            items: vec![Line { quantity: 0 }],
        };
        let err = AppError::InvalidFields(payload.validate().unwrap_err());
        let details = err.details().unwrap();

        assert_eq!(details["name"][0], "Name is required");
        assert_eq!(details["items[0].quantity"][0], "Quantity must be at least 1");
    }

    #[test]
    fn test_insufficient_stock_details() {
        let err = AppError::InsufficientStock {
            product: "Mug".into(),
            available: 10,
            requested: 999,
        };
        let details = err.details().unwrap();
        assert_eq!(details["available"], 10);
        assert_eq!(details["requested"], 999);
    }
}
