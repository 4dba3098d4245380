//! Order handlers. Orders are never deleted; cancel them instead.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, Order, OrderWithItems, Resource};
use crate::dto::order::{CreateOrderRequest, OrderListQuery, UpdateOrderStatusRequest};
use crate::errors::AppResult;
use crate::types::{Created, Paginated};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_status))
}

/// List orders
///
/// Shop agents only see orders they created.
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(OrderListQuery),
    responses((status = 200, description = "Page of orders, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<OrderListQuery>,
) -> AppResult<Json<Paginated<Order>>> {
    require(&state, &user, roles::EVERYONE, Resource::Orders, Action::Read)?;
    let page = state
        .services
        .orders()
        .list_orders(user.actor(), query.filter()?, query.pagination())
        .await?;
    Ok(Json(page))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderWithItems),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderWithItems>> {
    require(&state, &user, roles::EVERYONE, Resource::Orders, Action::Read)?;
    Ok(Json(
        state.services.orders().get_order(user.actor(), id).await?,
    ))
}

/// Place an order
///
/// Reserves stock for every line in one transaction.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderWithItems),
        (status = 400, description = "Validation error or insufficient stock"),
        (status = 404, description = "Unknown or inactive product"),
        (status = 409, description = "Order number collision")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<Created<OrderWithItems>> {
    require(&state, &user, roles::ORDER_TAKERS, Resource::Orders, Action::Create)?;
    let order = state
        .services
        .orders()
        .place_order(user.actor(), payload.into())
        .await?;
    Ok(Created(order))
}

/// Move an order to a new status
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderWithItems),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderWithItems>> {
    require(&state, &user, roles::ORDER_HANDLERS, Resource::Orders, Action::Update)?;
    let order = state
        .services
        .orders()
        .change_status(user.actor(), id, payload.status)
        .await?;
    Ok(Json(order))
}
