use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Login request. `identity` is the email or phone, depending on deployment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "email", alias = "phone")]
    #[validate(length(min = 1, message = "Identity is required"))]
    #[schema(example = "admin@example.com")]
    pub identity: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_accepts_email_or_phone_key() {
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"x"}"#).unwrap();
        assert_eq!(by_email.identity, "a@b.co");

        let by_phone: LoginRequest =
            serde_json::from_str(r#"{"phone":"0555","password":"x"}"#).unwrap();
        assert_eq!(by_phone.identity, "0555");
    }

    #[test]
    fn test_empty_password_rejected() {
        let request = LoginRequest {
            identity: "a@b.co".into(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
