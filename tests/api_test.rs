//! Router-level tests: authentication, role checks, rate limiting and the
//! order, stock, scan and product routes.
//!
//! The service container and the request counter are mocked, so no
//! database or Redis connection is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use stockroom::api::create_router;
use stockroom::domain::{
    MovementType, Order, OrderReference, OrderStatus, OrderWithItems, PaymentStatus, ScannedOrder,
    StockHistoryEntry, User, UserResponse, UserRole,
};
use stockroom::errors::{AppError, AppResult};
use stockroom::infra::{HealthCheck, MockRateLimiter, RateLimitStatus};
use stockroom::services::{
    AuthService, Claims, ImportReport, MockOrderService, MockProductService, MockScanService,
    MockServiceContainer, MockStockService, OrderService, ProductService, ScanService,
    StockService, TokenResponse,
};
use stockroom::types::Paginated;
use stockroom::{AppState, Config};

const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

fn test_user(role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: Some("test@example.com".to_string()),
        phone: None,
        password_hash: "hashed".to_string(),
        role,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Accepts a fixed token per role
struct FakeAuthService;

fn role_for(token: &str) -> Option<UserRole> {
    match token {
        "admin-token" => Some(UserRole::Admin),
        "agent-token" => Some(UserRole::ShopAgent),
        "warehouse-token" => Some(UserRole::WarehouseAgent),
        _ => None,
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, _identity: String, password: String) -> AppResult<TokenResponse> {
        if password != "SecurePass123!" {
            return Err(AppError::InvalidCredentials);
        }
        Ok(TokenResponse {
            access_token: "admin-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
            user: UserResponse::from(test_user(UserRole::Admin)),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let role = role_for(token).ok_or(AppError::Unauthorized)?;
        Ok(Claims {
            sub: Uuid::new_v4(),
            role,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }

    async fn current_user(&self, id: Uuid) -> AppResult<User> {
        let mut user = test_user(UserRole::Admin);
        user.id = id;
        Ok(user)
    }
}

struct StaticProbe {
    name: &'static str,
    healthy: bool,
}

#[async_trait]
impl HealthCheck for StaticProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> Result<(), String> {
        if self.healthy {
            Ok(())
        } else {
            Err("connection refused".to_string())
        }
    }
}

fn services() -> MockServiceContainer {
    let auth: Arc<dyn AuthService> = Arc::new(FakeAuthService);
    let mut services = MockServiceContainer::new();
    services.expect_auth().returning(move || auth.clone());
    services
}

fn open_limiter() -> MockRateLimiter {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_hit()
        .returning(|_, max, _| Ok(RateLimitStatus::new(1, max)));
    limiter
}

fn state_with(services: MockServiceContainer, limiter: MockRateLimiter) -> AppState {
    AppState::new(
        Arc::new(services),
        Config::for_tests(TEST_SECRET),
        Arc::new(limiter),
    )
}

fn app() -> Router {
    create_router(state_with(services(), open_limiter()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "stockroom-boundary";

fn csv_upload(token: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"products.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = BOUNDARY,
        csv = csv
    );
    Request::builder()
        .method("POST")
        .uri("/api/products/import-csv")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn order(id: Uuid, status: OrderStatus) -> OrderWithItems {
    OrderWithItems {
        order: Order {
            id,
            order_number: "ORD-20240131-0001".to_string(),
            customer_name: "Yacine".to_string(),
            customer_phone: "0555000111".to_string(),
            customer_address: "12 Rue Didouche".to_string(),
            customer_city: None,
            notes: None,
            delivery_price: Decimal::new(20, 0),
            total_amount: Decimal::new(320, 0),
            status,
            payment_status: PaymentStatus::Unpaid,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        items: vec![],
    }
}

fn with_orders(orders: MockOrderService) -> MockServiceContainer {
    let orders: Arc<dyn OrderService> = Arc::new(orders);
    let mut services = services();
    services.expect_orders().returning(move || orders.clone());
    services
}

fn with_stock(stock: MockStockService) -> MockServiceContainer {
    let stock: Arc<dyn StockService> = Arc::new(stock);
    let mut services = services();
    services.expect_stock().returning(move || stock.clone());
    services
}

fn with_products(products: MockProductService) -> MockServiceContainer {
    let products: Arc<dyn ProductService> = Arc::new(products);
    let mut services = services();
    services.expect_products().returning(move || products.clone());
    services
}

fn with_scans(scans: MockScanService) -> MockServiceContainer {
    let scans: Arc<dyn ScanService> = Arc::new(scans);
    let mut services = services();
    services.expect_scans().returning(move || scans.clone());
    services
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Stockroom API");
}

#[tokio::test]
async fn test_health_reports_every_probe() {
    let state = state_with(services(), open_limiter())
        .with_probe(Arc::new(StaticProbe {
            name: "database",
            healthy: true,
        }))
        .with_probe(Arc::new(StaticProbe {
            name: "redis",
            healthy: true,
        }));

    let response = create_router(state).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_a_backend_is_down() {
    let state = state_with(services(), open_limiter()).with_probe(Arc::new(StaticProbe {
        name: "redis",
        healthy: false,
    }));

    let response = create_router(state).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["redis"]["error"], "connection refused");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let response = app().oneshot(get("/api/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let response = app()
        .oneshot(get_with_token("/api/orders", "forged-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_outside_allow_list_is_forbidden() {
    let mut services = services();
    services.expect_users().never();

    let response = create_router(state_with(services, open_limiter()))
        .oneshot(get_with_token("/api/users", "agent-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_shop_agent_cannot_read_dashboard() {
    let mut services = services();
    services.expect_dashboard().never();

    let response = create_router(state_with(services, open_limiter()))
        .oneshot(get_with_token("/api/dashboard/summary", "agent-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_accepts_cookie_token() {
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, "token=admin-token")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["role"], "ADMIN");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"admin@example.com","password":"SecurePass123!"}"#,
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token=admin-token"));
    assert!(cookie.contains("HttpOnly"));

    let body = json_body(response).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["role"], "ADMIN");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"admin@example.com","password":"nope"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_exhausted_window_returns_429() {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_hit()
        .returning(|_, max, _| Ok(RateLimitStatus::new(max + 1, max)));

    let response = create_router(state_with(services(), limiter))
        .oneshot(get_with_token("/api/orders", "admin-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn test_unreachable_counter_fails_closed() {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_hit()
        .returning(|_, _, _| Err(AppError::internal("redis down")));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"admin@example.com","password":"SecurePass123!"}"#,
        ))
        .unwrap();

    let response = create_router(state_with(services(), limiter))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_headers_on_success() {
    let response = app()
        .oneshot(get_with_token("/api/auth/me", "admin-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-ratelimit-remaining"));
}

#[tokio::test]
async fn test_status_change_is_a_put() {
    let id = Uuid::new_v4();
    let mut orders = MockOrderService::new();
    orders
        .expect_change_status()
        .withf(move |actor, order_id, status| {
            actor.role == UserRole::Admin && *order_id == id && *status == OrderStatus::Confirmed
        })
        .times(1)
        .returning(|_, order_id, status| Ok(order(order_id, status)));
    let app = create_router(state_with(with_orders(orders), open_limiter()));
    let uri = format!("/api/orders/{}/status", id);

    let response = app
        .clone()
        .oneshot(send_json("PUT", &uri, "admin-token", json!({ "status": "CONFIRMED" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(body["orderNumber"], "ORD-20240131-0001");

    let response = app
        .oneshot(send_json("PATCH", &uri, "admin-token", json!({ "status": "CONFIRMED" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_shop_agent_cannot_change_status() {
    let mut orders = MockOrderService::new();
    orders.expect_change_status().never();
    let uri = format!("/api/orders/{}/status", Uuid::new_v4());

    let response = create_router(state_with(with_orders(orders), open_limiter()))
        .oneshot(send_json("PUT", &uri, "agent-token", json!({ "status": "CANCELLED" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_order_list_is_scoped_to_the_caller() {
    let mut orders = MockOrderService::new();
    orders
        .expect_list_orders()
        .withf(|actor, _, params| actor.role == UserRole::ShopAgent && params.page() == 2)
        .times(1)
        .returning(|_, _, params| Ok(Paginated::new(vec![], &params, 0)));

    let response = create_router(state_with(with_orders(orders), open_limiter()))
        .oneshot(get_with_token("/api/orders?page=2&limit=10", "agent-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let mut orders = MockOrderService::new();
    orders
        .expect_get_order()
        .returning(|_, _| Err(AppError::not_found("Order")));
    let uri = format!("/api/orders/{}", Uuid::new_v4());

    let response = create_router(state_with(with_orders(orders), open_limiter()))
        .oneshot(get_with_token(&uri, "admin-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_csv_import_route() {
    let mut products = MockProductService::new();
    products
        .expect_import_csv()
        .withf(|actor, data| {
            actor.role == UserRole::Admin && data.starts_with(b"name,sku,sellingPrice")
        })
        .times(1)
        .returning(|_, _| {
            Ok(ImportReport {
                imported: 1,
                errors: vec![],
            })
        });

    let response = create_router(state_with(with_products(products), open_limiter()))
        .oneshot(csv_upload("admin-token", "name,sku,sellingPrice\nMug,MUG-1,100"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["imported"], 1);
}

#[tokio::test]
async fn test_csv_import_is_admin_only() {
    let mut products = MockProductService::new();
    products.expect_import_csv().never();

    let response = create_router(state_with(with_products(products), open_limiter()))
        .oneshot(csv_upload("warehouse-token", "name,sku,sellingPrice\nMug,MUG-1,100"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stock_add_for_warehouse_agent() {
    let product_id = Uuid::new_v4();
    let mut stock = MockStockService::new();
    stock
        .expect_add()
        .withf(move |actor, request| {
            actor.role == UserRole::WarehouseAgent
                && request.product_id == product_id
                && request.quantity == 3
        })
        .times(1)
        .returning(|actor, request| {
            Ok(StockHistoryEntry {
                id: Uuid::new_v4(),
                product_id: request.product_id,
                movement_type: MovementType::Add,
                quantity_change: request.quantity,
                reason: request.reason(),
                previous_quantity: 7,
                new_quantity: 7 + request.quantity,
                created_by: Some(actor.id),
                created_at: Utc::now(),
            })
        });

    let response = create_router(state_with(with_stock(stock), open_limiter()))
        .oneshot(send_json(
            "POST",
            "/api/stock/add",
            "warehouse-token",
            json!({ "productId": product_id, "quantity": 3, "reason": "Supplier delivery" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["newQuantity"], 10);
}

#[tokio::test]
async fn test_shop_agent_cannot_move_stock() {
    let mut stock = MockStockService::new();
    stock.expect_add().never();

    let response = create_router(state_with(with_stock(stock), open_limiter()))
        .oneshot(send_json(
            "POST",
            "/api/stock/add",
            "agent-token",
            json!({ "productId": Uuid::new_v4(), "quantity": 3 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stock_add_rejects_zero_quantity() {
    let mut stock = MockStockService::new();
    stock.expect_add().never();

    let response = create_router(state_with(with_stock(stock), open_limiter()))
        .oneshot(send_json(
            "POST",
            "/api/stock/add",
            "admin-token",
            json!({ "productId": Uuid::new_v4(), "quantity": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scan_by_order_number() {
    let mut scans = MockScanService::new();
    scans
        .expect_scan()
        .withf(|_, reference, company, tracking| {
            matches!(reference, OrderReference::Number(n) if n == "ORD-20240131-0001")
                && company == "Yalidine"
                && tracking.is_none()
        })
        .times(1)
        .returning(|actor, _, company, tracking| {
            Ok(ScannedOrder {
                id: Uuid::new_v4(),
                order_id: Uuid::new_v4(),
                order_number: "ORD-20240131-0001".to_string(),
                delivery_company: company,
                tracking_number: tracking,
                scanned_by: actor.id,
                scanned_at: Utc::now(),
            })
        });

    let response = create_router(state_with(with_scans(scans), open_limiter()))
        .oneshot(send_json(
            "POST",
            "/api/scan-orders",
            "warehouse-token",
            json!({ "orderNumber": "ORD-20240131-0001", "deliveryCompany": " Yalidine " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_scan_needs_exactly_one_reference() {
    let mut scans = MockScanService::new();
    scans.expect_scan().never();

    let response = create_router(state_with(with_scans(scans), open_limiter()))
        .oneshot(send_json(
            "POST",
            "/api/scan-orders",
            "warehouse-token",
            json!({
                "orderId": Uuid::new_v4(),
                "orderNumber": "ORD-20240131-0001",
                "deliveryCompany": "Yalidine"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
