//! User administration handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, Resource, UserResponse};
use crate::dto::user::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Page of users"),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<UserListQuery>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    require(&state, &user, roles::ADMINS, Resource::Users, Action::Read)?;
    let page = state
        .services
        .users()
        .list_users(query.filter(), query.pagination())
        .await?;
    Ok(Json(page))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require(&state, &user, roles::ADMINS, Resource::Users, Action::Read)?;
    let found = state.services.users().get_user(id).await?;
    Ok(Json(UserResponse::from(found)))
}

/// Create a user
///
/// The caller must outrank the role being granted.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role not manageable by caller"),
        (status = 409, description = "Email or phone already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    require(&state, &user, roles::ADMINS, Resource::Users, Action::Create)?;
    let created = state
        .services
        .users()
        .create_user(user.actor(), payload)
        .await?;
    Ok(Created(UserResponse::from(created)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role not manageable by caller"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require(&state, &user, roles::ADMINS, Resource::Users, Action::Update)?;
    let updated = state
        .services
        .users()
        .update_user(user.actor(), id, payload)
        .await?;
    Ok(Json(UserResponse::from(updated)))
}

/// Deactivate a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require(&state, &user, roles::ADMINS, Resource::Users, Action::Delete)?;
    state.services.users().delete_user(user.actor(), id).await?;
    Ok(NoContent)
}
