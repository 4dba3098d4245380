use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{default_limit, default_page, optional, trimmed, PHONE_REGEX};
use crate::domain::{UserFilter, UserRole};
use crate::types::PaginationParams;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Amina Benali")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "amina@example.com")]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    #[schema(example = "+213555000111")]
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    pub role: UserRole,
}

impl CreateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            email: optional(self.email).map(|e| e.to_lowercase()),
            phone: optional(self.phone),
            password: self.password,
            role: self.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Matches name, email or phone
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub role: Option<UserRole>,
    pub include_inactive: Option<bool>,
}

impl UserListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn filter(&self) -> UserFilter {
        UserFilter {
            search: optional(self.search.clone()),
            role: self.role,
            include_inactive: self.include_inactive.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"name":"A","email":"not-an-email","password":"short","role":"ADMIN"}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_unknown_role_is_rejected_at_parse() {
        let result: Result<CreateUserRequest, _> = serde_json::from_str(
            r#"{"name":"A","password":"longenough","role":"MANAGER"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_normalized_lowercases_email() {
        let request = CreateUserRequest {
            name: " Amina ".into(),
            email: Some(" Amina@Example.COM ".into()),
            phone: Some("  ".into()),
            password: "longenough".into(),
            role: UserRole::Confirmer,
        }
        .normalized();
        assert_eq!(request.name, "Amina");
        assert_eq!(request.email.as_deref(), Some("amina@example.com"));
        assert_eq!(request.phone, None);
    }
}
