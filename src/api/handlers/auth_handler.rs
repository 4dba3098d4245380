//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::dto::auth::LoginRequest;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// Login and logout; both sit behind the stricter rate limit
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Routes that need a valid token, mounted beside the other protected routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn session_cookie(name: String, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Login and get JWT token
///
/// The token is returned in the body and set as an HttpOnly cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or inactive account"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let token = state
        .services
        .auth()
        .login(payload.identity, payload.password)
        .await?;

    let cookie = session_cookie(
        state.config.auth_cookie_name.clone(),
        token.access_token.clone(),
    );

    Ok((jar.add(cookie), Json(token)))
}

/// Clear the auth cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let cookie = session_cookie(state.config.auth_cookie_name.clone(), String::new());
    (jar.remove(cookie), Json(MessageResponse::new("Logged out")))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.auth().current_user(user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
