//! Product catalogue handlers.

use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{QueryParams, ValidatedJson, ValidatedQuery};
use crate::api::middleware::{require, roles, CurrentUser};
use crate::api::AppState;
use crate::domain::{Action, ProductDeliveryStats, ProductView, Resource};
use crate::dto::product::{
    CreateProductRequest, LookupQuery, ProductListQuery, UpdateProductRequest,
};
use crate::errors::{AppError, AppResult};
use crate::services::ImportReport;
use crate::types::{Created, NoContent, Paginated};

/// Multipart field carrying the CSV file
const IMPORT_FIELD: &str = "file";

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/lookup", get(lookup_product))
        .route("/import-csv", post(import_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/delivery-stats", get(delivery_stats))
}

/// List products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductListQuery),
    responses((status = 200, description = "Page of products with stock")),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    QueryParams(query): QueryParams<ProductListQuery>,
) -> AppResult<Json<Paginated<ProductView>>> {
    require(&state, &user, roles::EVERYONE, Resource::Products, Action::Read)?;
    let page = state
        .services
        .products()
        .list_products(query.filter(), query.pagination())
        .await?;
    Ok(Json(page))
}

/// Find an active product by barcode or SKU
#[utoipa::path(
    get,
    path = "/api/products/lookup",
    tag = "Products",
    params(LookupQuery),
    responses(
        (status = 200, description = "Matching product", body = ProductView),
        (status = 404, description = "No product with this code")
    ),
    security(("bearer_auth" = []))
)]
pub async fn lookup_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<LookupQuery>,
) -> AppResult<Json<ProductView>> {
    require(&state, &user, roles::EVERYONE, Resource::Products, Action::Read)?;
    let product = state.services.products().lookup(query.code.trim()).await?;
    Ok(Json(product))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductView),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductView>> {
    require(&state, &user, roles::EVERYONE, Resource::Products, Action::Read)?;
    Ok(Json(state.services.products().get_product(id).await?))
}

/// Create a product
///
/// Also provisions its stock and delivery stats rows, and records the
/// opening quantity in the stock ledger.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, description = "Validation error"),
        (status = 409, description = "SKU or barcode already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<ProductView>> {
    require(&state, &user, roles::ADMINS, Resource::Products, Action::Create)?;
    let product = state
        .services
        .products()
        .create_product(user.actor(), payload.into())
        .await?;
    Ok(Created(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductView),
        (status = 404, description = "Product not found"),
        (status = 409, description = "SKU or barcode already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ProductView>> {
    require(&state, &user, roles::ADMINS, Resource::Products, Action::Update)?;
    let changes = payload.into_changes()?;
    Ok(Json(
        state.services.products().update_product(id, changes).await?,
    ))
}

/// Deactivate a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deactivated"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require(&state, &user, roles::ADMINS, Resource::Products, Action::Delete)?;
    state.services.products().delete_product(id).await?;
    Ok(NoContent)
}

/// Delivery outcome counters for a product
#[utoipa::path(
    get,
    path = "/api/products/{id}/delivery-stats",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Delivery counters", body = ProductDeliveryStats),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delivery_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductDeliveryStats>> {
    require(&state, &user, roles::EVERYONE, Resource::Products, Action::Read)?;
    Ok(Json(state.services.products().delivery_stats(id).await?))
}

/// Import products from a CSV upload
///
/// Rows are created independently; failures are reported per line.
#[utoipa::path(
    post,
    path = "/api/products/import-csv",
    tag = "Products",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "CSV in field `file`"),
    responses(
        (status = 200, description = "Import summary", body = ImportReport),
        (status = 400, description = "Missing file or required columns")
    ),
    security(("bearer_auth" = []))
)]
pub async fn import_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportReport>> {
    require(&state, &user, roles::ADMINS, Resource::Products, Action::Create)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() == Some(IMPORT_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            data = Some(bytes.to_vec());
        }
    }

    let data = data.ok_or_else(|| {
        AppError::bad_request(format!("Missing multipart field '{}'", IMPORT_FIELD))
    })?;

    let report = state
        .services
        .products()
        .import_csv(user.actor(), data)
        .await?;
    Ok(Json(report))
}
