//! Create-admin command - Bootstraps a SUPER_ADMIN account.

use validator::ValidateEmail;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::{IdentityField, NewUser, Password, UserRole};
use crate::dto::PHONE_REGEX;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Check the arguments and build the account to insert.
fn new_admin(args: CreateAdminArgs, identity_field: IdentityField) -> AppResult<NewUser> {
    let name = args.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let email = args
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let phone = args
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    if email.as_ref().is_some_and(|e| !e.validate_email()) {
        return Err(AppError::validation("Invalid email format"));
    }
    if phone.as_ref().is_some_and(|p| !PHONE_REGEX.is_match(p)) {
        return Err(AppError::validation("Invalid phone number"));
    }

    let identity = match identity_field {
        IdentityField::Email => &email,
        IdentityField::Phone => &phone,
    };
    if identity.is_none() {
        return Err(AppError::validation(format!(
            "--{} is required when IDENTITY_FIELD={}",
            identity_field, identity_field
        )));
    }

    let password = Password::new(&args.password)?;

    Ok(NewUser {
        name,
        email,
        phone,
        password_hash: password.into_string(),
        role: UserRole::SuperAdmin,
    })
}

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let admin = new_admin(args, config.identity_field)?;

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Persistence::new(db.get_connection());

    let user = uow.users().create(admin).await?;

    tracing::info!(user_id = %user.id, "Super admin created");
    println!("Created SUPER_ADMIN '{}' ({})", user.name, user.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(email: Option<&str>, phone: Option<&str>) -> CreateAdminArgs {
        CreateAdminArgs {
            name: " Root ".into(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            password: "SecurePass123!".into(),
        }
    }

    #[test]
    fn test_email_identity_is_normalized() {
        let admin = new_admin(args(Some(" Root@Example.COM "), None), IdentityField::Email).unwrap();
        assert_eq!(admin.email.as_deref(), Some("root@example.com"));
        assert_eq!(admin.name, "Root");
        assert_eq!(admin.role, UserRole::SuperAdmin);
        assert!(Password::from_hash(admin.password_hash).verify("SecurePass123!"));
    }

    #[test]
    fn test_identity_field_value_required() {
        let err = new_admin(args(Some("root@example.com"), None), IdentityField::Phone).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert!(new_admin(args(Some("not-an-email"), None), IdentityField::Email).is_err());
    }
}
