//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, dashboard_routes, finance_handler, health, order_routes, product_routes,
    scan_routes, session_routes, stock_routes, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Everything here requires a valid token
    let protected = Router::new()
        .merge(session_routes())
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/stock", stock_routes())
        .nest("/orders", order_routes())
        .nest("/scan-orders", scan_routes())
        .nest("/salaries", finance_handler::salaries::routes())
        .nest("/charges", finance_handler::charges::routes())
        .nest("/ad-costs", finance_handler::ad_costs::routes())
        .nest("/dashboard", dashboard_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let api = Router::new()
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(protected);

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stockroom API"
}
