//! Order service. SHOP_AGENT callers only ever see their own orders.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::lifecycle;
use crate::domain::{
    Actor, Order, OrderFilter, OrderStatus, OrderWithItems, PlaceOrder, UserRole,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn place_order(&self, actor: Actor, request: PlaceOrder) -> AppResult<OrderWithItems>;

    async fn list_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>>;

    async fn get_order(&self, actor: Actor, id: Uuid) -> AppResult<OrderWithItems>;

    async fn change_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<OrderWithItems>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Row owner restriction for the caller, if any
fn owner_scope(actor: &Actor) -> Option<Uuid> {
    (actor.role == UserRole::ShopAgent).then_some(actor.id)
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn place_order(&self, actor: Actor, request: PlaceOrder) -> AppResult<OrderWithItems> {
        let today = Utc::now().date_naive();
        with_transaction!(self.uow, |ctx| {
            lifecycle::place_order(&ctx.ledger(), actor.id, request, today).await
        })
    }

    async fn list_orders(
        &self,
        actor: Actor,
        mut filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        if let Some(owner) = owner_scope(&actor) {
            filter.created_by = Some(owner);
        }
        let (orders, total) = self.uow.orders().list(filter, params).await?;
        Ok(Paginated::new(orders, &params, total))
    }

    async fn get_order(&self, actor: Actor, id: Uuid) -> AppResult<OrderWithItems> {
        self.uow
            .orders()
            .find_with_items(id, owner_scope(&actor))
            .await?
            .ok_or_not_found("Order")
    }

    async fn change_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<OrderWithItems> {
        with_transaction!(self.uow, |ctx| {
            lifecycle::change_status(&ctx.ledger(), id, status, actor.id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_shop_agents_are_scoped() {
        let id = Uuid::new_v4();
        assert_eq!(owner_scope(&Actor::new(id, UserRole::ShopAgent)), Some(id));
        assert_eq!(owner_scope(&Actor::new(id, UserRole::Confirmer)), None);
        assert_eq!(owner_scope(&Actor::new(id, UserRole::Admin)), None);
    }
}
