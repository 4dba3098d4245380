//! Stock levels and ledger movements.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, Resource, StockHistoryEntry, StockLevel, StockOverview};
use crate::dto::stock::{
    AdjustStockRequest, StockChangeRequest, StockListQuery, UpdateStockRequest,
};
use crate::errors::AppResult;
use crate::types::{Created, Paginated, PaginationParams};

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock))
        .route("/add", post(add_stock))
        .route("/remove", post(remove_stock))
        .route("/adjust", post(adjust_stock))
        .route("/:product_id", put(update_stock))
        .route("/:product_id/history", get(stock_history))
}

/// List stock levels with product details
#[utoipa::path(
    get,
    path = "/api/stock",
    tag = "Stock",
    params(StockListQuery),
    responses((status = 200, description = "Page of stock levels")),
    security(("bearer_auth" = []))
)]
pub async fn list_stock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<StockListQuery>,
) -> AppResult<Json<Paginated<StockOverview>>> {
    require(&state, &user, roles::STOCK_READERS, Resource::Stock, Action::Read)?;
    let page = state
        .services
        .stock()
        .list_stock(
            query.search(),
            query.low_stock.unwrap_or(false),
            query.pagination(),
        )
        .await?;
    Ok(Json(page))
}

/// Ledger rows for a product, newest first
#[utoipa::path(
    get,
    path = "/api/stock/{product_id}/history",
    tag = "Stock",
    params(
        ("product_id" = Uuid, Path, description = "Product id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Page of ledger rows"),
        (status = 404, description = "Stock not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn stock_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<Paginated<StockHistoryEntry>>> {
    require(&state, &user, roles::STOCK_READERS, Resource::Stock, Action::Read)?;
    Ok(Json(
        state.services.stock().history(product_id, params).await?,
    ))
}

/// Update minimum level and location
#[utoipa::path(
    put,
    path = "/api/stock/{product_id}",
    tag = "Stock",
    params(("product_id" = Uuid, Path, description = "Product id")),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock settings updated", body = StockLevel),
        (status = 404, description = "Stock not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStockRequest>,
) -> AppResult<Json<StockLevel>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::Stock, Action::Update)?;
    Ok(Json(
        state
            .services
            .stock()
            .update_settings(product_id, payload)
            .await?,
    ))
}

/// Receive stock
#[utoipa::path(
    post,
    path = "/api/stock/add",
    tag = "Stock",
    request_body = StockChangeRequest,
    responses(
        (status = 201, description = "Ledger row written", body = StockHistoryEntry),
        (status = 404, description = "Stock not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_stock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StockChangeRequest>,
) -> AppResult<Created<StockHistoryEntry>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::Stock, Action::Create)?;
    let entry = state.services.stock().add(user.actor(), payload).await?;
    Ok(Created(entry))
}

/// Take stock out
///
/// Fails with INSUFFICIENT_STOCK rather than going below zero.
#[utoipa::path(
    post,
    path = "/api/stock/remove",
    tag = "Stock",
    request_body = StockChangeRequest,
    responses(
        (status = 201, description = "Ledger row written", body = StockHistoryEntry),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Stock not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_stock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StockChangeRequest>,
) -> AppResult<Created<StockHistoryEntry>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::Stock, Action::Update)?;
    let entry = state.services.stock().remove(user.actor(), payload).await?;
    Ok(Created(entry))
}

/// Correct stock to a counted quantity
#[utoipa::path(
    post,
    path = "/api/stock/adjust",
    tag = "Stock",
    request_body = AdjustStockRequest,
    responses(
        (status = 201, description = "Ledger row written", body = StockHistoryEntry),
        (status = 400, description = "Count matches current stock"),
        (status = 404, description = "Stock not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AdjustStockRequest>,
) -> AppResult<Created<StockHistoryEntry>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::Stock, Action::Update)?;
    let entry = state.services.stock().adjust(user.actor(), payload).await?;
    Ok(Created(entry))
}
