//! Warehouse pickup scans.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, Resource, ScannedOrder};
use crate::dto::scan::{CreateScanRequest, ScanListQuery};
use crate::errors::AppResult;
use crate::types::{Created, Paginated};

pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/", get(list_scans).post(scan_order))
}

/// Record a pickup scan
///
/// Moves the order to PICKED_UP unless it is already there.
#[utoipa::path(
    post,
    path = "/api/scan-orders",
    tag = "Scans",
    request_body = CreateScanRequest,
    responses(
        (status = 201, description = "Scan recorded", body = ScannedOrder),
        (status = 400, description = "Order is in a final status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already scanned")
    ),
    security(("bearer_auth" = []))
)]
pub async fn scan_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateScanRequest>,
) -> AppResult<Created<ScannedOrder>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::ScanOrders, Action::Create)?;
    let scan = state
        .services
        .scans()
        .scan(
            user.actor(),
            payload.reference()?,
            payload.delivery_company(),
            payload.tracking_number(),
        )
        .await?;
    Ok(Created(scan))
}

/// List scans
#[utoipa::path(
    get,
    path = "/api/scan-orders",
    tag = "Scans",
    params(ScanListQuery),
    responses((status = 200, description = "Page of scans, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn list_scans(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<ScanListQuery>,
) -> AppResult<Json<Paginated<ScannedOrder>>> {
    require(&state, &user, roles::STOCK_KEEPERS, Resource::ScanOrders, Action::Read)?;
    let page = state
        .services
        .scans()
        .list_scans(query.delivery_company(), query.pagination())
        .await?;
    Ok(Json(page))
}
