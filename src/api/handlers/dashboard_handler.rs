//! Dashboard aggregates.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::extractors::{QueryParams, ValidatedQuery};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, DailySales, DashboardSummary, Resource, TopProduct};
use crate::dto::dashboard::{SalesQuery, SummaryQuery, TopProductsQuery};
use crate::errors::AppResult;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/top-products", get(top_products))
        .route("/sales", get(sales))
}

/// Revenue, expenses and order counts
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(SummaryQuery),
    responses((status = 200, description = "Summary", body = DashboardSummary)),
    security(("bearer_auth" = []))
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<SummaryQuery>,
) -> AppResult<Json<DashboardSummary>> {
    require(&state, &user, roles::ADMINS, Resource::Dashboard, Action::Read)?;
    Ok(Json(
        state.services.dashboard().summary(query.range()?).await?,
    ))
}

/// Best sellers by quantity
#[utoipa::path(
    get,
    path = "/api/dashboard/top-products",
    tag = "Dashboard",
    params(TopProductsQuery),
    responses((status = 200, description = "Top products", body = [TopProduct])),
    security(("bearer_auth" = []))
)]
pub async fn top_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<TopProductsQuery>,
) -> AppResult<Json<Vec<TopProduct>>> {
    require(&state, &user, roles::ADMINS, Resource::Dashboard, Action::Read)?;
    Ok(Json(
        state
            .services
            .dashboard()
            .top_products(query.limit())
            .await?,
    ))
}

/// Daily order count and revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/sales",
    tag = "Dashboard",
    params(SalesQuery),
    responses((status = 200, description = "One entry per day", body = [DailySales])),
    security(("bearer_auth" = []))
)]
pub async fn sales(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<SalesQuery>,
) -> AppResult<Json<Vec<DailySales>>> {
    require(&state, &user, roles::ADMINS, Resource::Dashboard, Action::Read)?;
    Ok(Json(state.services.dashboard().sales(query.days()).await?))
}
