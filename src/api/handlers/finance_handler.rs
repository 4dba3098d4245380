//! Salaries, charges and ad costs.
//!
//! The three resources expose the same five endpoints; `finance_handlers!`
//! generates one module per resource.

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
use crate::domain::{Action, AdCost, Charge, Resource, Salary};
use crate::dto::finance::{
    CreateAdCostRequest, CreateChargeRequest, CreateSalaryRequest, FinanceListQuery,
    UpdateAdCostRequest, UpdateChargeRequest, UpdateSalaryRequest,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated};

macro_rules! finance_handlers {
    (
        $module:ident,
        record: $record:ident,
        create: $create:ident,
        update: $update:ident,
        resource: $resource:ident,
        service: $service:ident,
        tag: $tag:tt,
        collection: $collection:tt,
        item: $item:tt $(,)?
    ) => {
        pub mod $module {
            use super::*;

            pub fn routes() -> Router<AppState> {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/:id", get(fetch).put(update).delete(delete))
            }

            #[utoipa::path(
                get,
                path = $collection,
                tag = $tag,
                params(FinanceListQuery),
                responses((status = 200, description = "Page of records, newest first")),
                security(("bearer_auth" = []))
            )]
            pub async fn list(
                State(state): State<AppState>,
                Extension(user): Extension<CurrentUser>,
                QueryParams(query): QueryParams<FinanceListQuery>,
            ) -> AppResult<Json<Paginated<$record>>> {
                require(&state, &user, roles::ADMINS, Resource::$resource, Action::Read)?;
                let page = state
                    .services
                    .$service()
                    .list(query.search(), query.range()?, query.pagination())
                    .await?;
                Ok(Json(page))
            }

            #[utoipa::path(
                get,
                path = $item,
                tag = $tag,
                params(("id" = Uuid, Path, description = "Record id")),
                responses(
                    (status = 200, description = "Record", body = $record),
                    (status = 404, description = "Record not found")
                ),
                security(("bearer_auth" = []))
            )]
            pub async fn fetch(
                State(state): State<AppState>,
                Extension(user): Extension<CurrentUser>,
                Path(id): Path<Uuid>,
            ) -> AppResult<Json<$record>> {
                require(&state, &user, roles::ADMINS, Resource::$resource, Action::Read)?;
                Ok(Json(state.services.$service().get(id).await?))
            }

            #[utoipa::path(
                post,
                path = $collection,
                tag = $tag,
                request_body = $create,
                responses(
                    (status = 201, description = "Record created", body = $record),
                    (status = 400, description = "Validation error")
                ),
                security(("bearer_auth" = []))
            )]
            pub async fn create(
                State(state): State<AppState>,
                Extension(user): Extension<CurrentUser>,
                ValidatedJson(payload): ValidatedJson<$create>,
            ) -> AppResult<Created<$record>> {
                require(&state, &user, roles::ADMINS, Resource::$resource, Action::Create)?;
                let record = state
                    .services
                    .$service()
                    .create(user.actor(), payload.into())
                    .await?;
                Ok(Created(record))
            }

            #[utoipa::path(
                put,
                path = $item,
                tag = $tag,
                params(("id" = Uuid, Path, description = "Record id")),
                request_body = $update,
                responses(
                    (status = 200, description = "Record updated", body = $record),
                    (status = 400, description = "Validation error"),
                    (status = 404, description = "Record not found")
                ),
                security(("bearer_auth" = []))
            )]
            pub async fn update(
                State(state): State<AppState>,
                Extension(user): Extension<CurrentUser>,
                Path(id): Path<Uuid>,
                ValidatedJson(payload): ValidatedJson<$update>,
            ) -> AppResult<Json<$record>> {
                require(&state, &user, roles::ADMINS, Resource::$resource, Action::Update)?;
                let changes = payload.into_changes()?;
                Ok(Json(state.services.$service().update(id, changes).await?))
            }

            #[utoipa::path(
                delete,
                path = $item,
                tag = $tag,
                params(("id" = Uuid, Path, description = "Record id")),
                responses(
                    (status = 204, description = "Record deleted"),
                    (status = 404, description = "Record not found")
                ),
                security(("bearer_auth" = []))
            )]
            pub async fn delete(
                State(state): State<AppState>,
                Extension(user): Extension<CurrentUser>,
                Path(id): Path<Uuid>,
            ) -> AppResult<NoContent> {
                require(&state, &user, roles::ADMINS, Resource::$resource, Action::Delete)?;
                state.services.$service().delete(id).await?;
                Ok(NoContent)
            }
        }
    };
}

finance_handlers!(
    salaries,
    record: Salary,
    create: CreateSalaryRequest,
    update: UpdateSalaryRequest,
    resource: Salaries,
    service: salaries,
    tag: "Salaries",
    collection: "/api/salaries",
    item: "/api/salaries/{id}",
);

finance_handlers!(
    charges,
    record: Charge,
    create: CreateChargeRequest,
    update: UpdateChargeRequest,
    resource: Charges,
    service: charges,
    tag: "Charges",
    collection: "/api/charges",
    item: "/api/charges/{id}",
);

finance_handlers!(
    ad_costs,
    record: AdCost,
    create: CreateAdCostRequest,
    update: UpdateAdCostRequest,
    resource: AdCosts,
    service: ad_costs,
    tag: "Ad costs",
    collection: "/api/ad-costs",
    item: "/api/ad-costs/{id}",
);
