//! OpenAPI documentation configuration.
//!
//! Served at `/api-docs/openapi.json` with Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, dashboard_handler, finance_handler, order_handler, product_handler,
    scan_handler, stock_handler, user_handler,
};
use crate::domain::{
    AdCost, Charge, DailySales, DashboardSummary, MovementType, Order, OrderItem, OrderStatus,
    OrderWithItems, PaymentStatus, ProductDeliveryStats, ProductSort, ProductView, Salary,
    ScannedOrder, SortOrder, StatusCount, StockHistoryEntry, StockLevel, StockOverview,
    TopProduct, UserResponse, UserRole,
};
use crate::dto::auth::LoginRequest;
use crate::dto::finance::{
    CreateAdCostRequest, CreateChargeRequest, CreateSalaryRequest, UpdateAdCostRequest,
    UpdateChargeRequest, UpdateSalaryRequest,
};
use crate::dto::order::{CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest};
use crate::dto::product::{CreateProductRequest, UpdateProductRequest};
use crate::dto::scan::CreateScanRequest;
use crate::dto::stock::{AdjustStockRequest, StockChangeRequest, UpdateStockRequest};
use crate::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::services::{ImportError, ImportReport, TokenResponse};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom",
        version = "0.1.0",
        description = "Role-based inventory and order management API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        product_handler::list_products,
        product_handler::lookup_product,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::delivery_stats,
        product_handler::import_products,
        stock_handler::list_stock,
        stock_handler::stock_history,
        stock_handler::update_stock,
        stock_handler::add_stock,
        stock_handler::remove_stock,
        stock_handler::adjust_stock,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::create_order,
        order_handler::update_status,
        scan_handler::scan_order,
        scan_handler::list_scans,
        finance_handler::salaries::list,
        finance_handler::salaries::fetch,
        finance_handler::salaries::create,
        finance_handler::salaries::update,
        finance_handler::salaries::delete,
        finance_handler::charges::list,
        finance_handler::charges::fetch,
        finance_handler::charges::create,
        finance_handler::charges::update,
        finance_handler::charges::delete,
        finance_handler::ad_costs::list,
        finance_handler::ad_costs::fetch,
        finance_handler::ad_costs::create,
        finance_handler::ad_costs::update,
        finance_handler::ad_costs::delete,
        dashboard_handler::summary,
        dashboard_handler::top_products,
        dashboard_handler::sales,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            LoginRequest,
            TokenResponse,
            MessageResponse,
            ProductView,
            ProductSort,
            SortOrder,
            CreateProductRequest,
            UpdateProductRequest,
            ProductDeliveryStats,
            ImportReport,
            ImportError,
            StockLevel,
            StockOverview,
            StockHistoryEntry,
            MovementType,
            StockChangeRequest,
            AdjustStockRequest,
            UpdateStockRequest,
            Order,
            OrderItem,
            OrderWithItems,
            OrderStatus,
            PaymentStatus,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            ScannedOrder,
            CreateScanRequest,
            Salary,
            Charge,
            AdCost,
            CreateSalaryRequest,
            UpdateSalaryRequest,
            CreateChargeRequest,
            UpdateChargeRequest,
            CreateAdCostRequest,
            UpdateAdCostRequest,
            DashboardSummary,
            StatusCount,
            TopProduct,
            DailySales,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, logout and the current session"),
        (name = "Users", description = "User administration"),
        (name = "Products", description = "Catalogue, lookup and CSV import"),
        (name = "Stock", description = "Stock levels and the stock ledger"),
        (name = "Orders", description = "Order placement and status changes"),
        (name = "Scans", description = "Warehouse pickup scans"),
        (name = "Salaries", description = "Salary records"),
        (name = "Charges", description = "Business charges"),
        (name = "Ad costs", description = "Advertising spend"),
        (name = "Dashboard", description = "Aggregated figures")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/auth/login, or the auth cookie"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/auth/login",
            "/api/products/{id}/delivery-stats",
            "/api/products/import-csv",
            "/api/stock/adjust",
            "/api/orders/{id}/status",
            "/api/scan-orders",
            "/api/ad-costs/{id}",
            "/api/dashboard/sales",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
