//! JWT authentication middleware and role gates.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Action, Actor, Resource, UserRole};
use crate::errors::{AppError, AppResult};

/// Route allow-lists
pub mod roles {
    use crate::domain::UserRole::{self, *};

    pub const EVERYONE: &[UserRole] = &UserRole::ALL;
    pub const ADMINS: &[UserRole] = &[SuperAdmin, Admin];
    pub const STOCK_KEEPERS: &[UserRole] = &[SuperAdmin, Admin, WarehouseAgent];
    pub const STOCK_READERS: &[UserRole] = &[SuperAdmin, Admin, WarehouseAgent, ShopAgent];
    pub const ORDER_TAKERS: &[UserRole] = &[SuperAdmin, Admin, ShopAgent, Confirmer];
    pub const ORDER_HANDLERS: &[UserRole] = &[SuperAdmin, Admin, Confirmer, WarehouseAgent];
}

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// Bearer header first, then the auth cookie
fn token_from(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// JWT authentication middleware.
///
/// Validates the token and injects the CurrentUser into the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from(request.headers(), &state.config.auth_cookie_name)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.services.auth().verify_token(&token)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Route allow-list, then the access policy. Both must admit the role.
pub fn require(
    state: &AppState,
    user: &CurrentUser,
    route_roles: &[UserRole],
    resource: Resource,
    action: Action,
) -> AppResult<()> {
    state
        .policy
        .authorize(user.role, route_roles, resource, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));
        headers.insert(COOKIE, HeaderValue::from_static("token=cookie-token"));

        assert_eq!(token_from(&headers, "token").as_deref(), Some("header-token"));
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=cookie-token"));

        assert_eq!(token_from(&headers, "token").as_deref(), Some("cookie-token"));
        assert_eq!(token_from(&headers, "session"), None);
    }

    #[test]
    fn test_non_bearer_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert_eq!(token_from(&headers, "token"), None);
    }
}
