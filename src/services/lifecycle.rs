//! Order lifecycle engine.
//!
//! Placement, status transitions, pickup scans and manual stock movements.
//! Each function runs against an `InventoryLedger`, which in production is
//! bound to one database transaction: callers commit or roll back the
//! whole operation.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::order::{merge_lines, order_number, price_order, return_reason, sale_reason};
use crate::domain::{
    NewOrder, NewOrderItem, NewScan, OrderReference, OrderStatus, OrderWithItems, PlaceOrder,
    ScannedOrder, StatsDelta, StockHistoryEntry, StockMovement, TransitionPlan,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::InventoryLedger;

/// Ledger reason for the stock a product is created with
pub const OPENING_STOCK_REASON: &str = "Initial stock";

/// Place an order: price it against locked stock, number it, persist it and
/// take its items out of stock.
pub async fn place_order<L>(
    ledger: &L,
    placed_by: Uuid,
    request: PlaceOrder,
    today: NaiveDate,
) -> AppResult<OrderWithItems>
where
    L: InventoryLedger + ?Sized,
{
    if request.lines.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    if request.delivery_price.is_sign_negative() && !request.delivery_price.is_zero() {
        return Err(AppError::validation("Delivery price must not be negative"));
    }

    let lines = merge_lines(&request.lines)?;
    let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let catalog = ledger.lock_products(&ids).await?;
    let priced = price_order(&lines, &catalog, request.delivery_price)?;

    let sequence = ledger.next_order_sequence(today).await?;
    let number = order_number(today, sequence);

    let order = ledger
        .insert_order(NewOrder {
            order_number: number.clone(),
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            customer_address: request.customer_address,
            customer_city: request.customer_city,
            notes: request.notes,
            delivery_price: request.delivery_price,
            total_amount: priced.total_amount,
            created_by: placed_by,
            items: priced
                .lines
                .iter()
                .map(|line| NewOrderItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal: line.subtotal,
                })
                .collect(),
        })
        .await?;

    // Stats rows are written in product-id order, matching the stock row locks.
    let mut effects: Vec<_> = priced.lines.iter().collect();
    effects.sort_by_key(|line| line.product_id);

    let reason = sale_reason(&number);
    for line in effects {
        let movement = StockMovement::removal(
            line.product_id,
            &line.product_name,
            line.available,
            line.quantity,
            Some(reason.clone()),
            Some(placed_by),
        )?;
        ledger.record_movement(movement).await?;
        ledger
            .adjust_delivery_stats(line.product_id, StatsDelta::placed())
            .await?;
    }

    tracing::info!(
        order_number = %number,
        total = %order.order.total_amount,
        items = order.items.len(),
        "Order placed"
    );

    Ok(order)
}

/// Move an order to `next`, applying stock and counter side effects.
pub async fn change_status<L>(
    ledger: &L,
    order_id: Uuid,
    next: OrderStatus,
    actor: Uuid,
) -> AppResult<OrderWithItems>
where
    L: InventoryLedger + ?Sized,
{
    let current = ledger.lock_order(order_id).await?.ok_or_not_found("Order")?;
    let plan = current.order.status.plan_transition(next)?;
    apply_transition(ledger, current, plan, actor).await
}

async fn apply_transition<L>(
    ledger: &L,
    current: OrderWithItems,
    plan: TransitionPlan,
    actor: Uuid,
) -> AppResult<OrderWithItems>
where
    L: InventoryLedger + ?Sized,
{
    let OrderWithItems { order, items } = current;

    if plan.restock {
        let reason = return_reason(&order.order_number);
        for item in &items {
            let stocked = ledger
                .lock_stock(item.product_id)
                .await?
                .ok_or_not_found("Stock")?;
            let movement = StockMovement::addition(
                item.product_id,
                stocked.quantity,
                item.quantity,
                Some(reason.clone()),
                Some(actor),
            )?;
            ledger.record_movement(movement).await?;
        }
    }

    let delta = StatsDelta::moved(plan.release, plan.record);
    if !delta.is_empty() {
        let mut product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        product_ids.sort();
        product_ids.dedup();
        for product_id in product_ids {
            ledger.adjust_delivery_stats(product_id, delta).await?;
        }
    }

    let updated = ledger
        .set_order_status(order.id, plan.to, plan.payment_status)
        .await?;

    tracing::info!(
        order_number = %updated.order_number,
        from = %plan.from,
        to = %plan.to,
        "Order status changed"
    );

    Ok(OrderWithItems {
        order: updated,
        items,
    })
}

/// Record a warehouse pickup, moving the order to PICKED_UP when needed.
pub async fn record_scan<L>(
    ledger: &L,
    reference: OrderReference,
    delivery_company: String,
    tracking_number: Option<String>,
    actor: Uuid,
) -> AppResult<ScannedOrder>
where
    L: InventoryLedger + ?Sized,
{
    let order_id = match reference {
        OrderReference::Id(id) => id,
        OrderReference::Number(number) => ledger
            .find_order_id(&number)
            .await?
            .ok_or_not_found("Order")?,
    };

    let current = ledger.lock_order(order_id).await?.ok_or_not_found("Order")?;
    let number = current.order.order_number.clone();
    let status = current.order.status;

    if ledger.is_scanned(order_id).await? {
        return Err(AppError::conflict(format!("Scan for order {}", number)));
    }
    if status.is_terminal() {
        return Err(AppError::bad_request(format!(
            "Order {} is {} and cannot be picked up",
            number, status
        )));
    }

    if status != OrderStatus::PickedUp {
        let plan = status.plan_transition(OrderStatus::PickedUp)?;
        apply_transition(ledger, current, plan, actor).await?;
    }

    let scan = ledger
        .insert_scan(
            NewScan {
                order_id,
                delivery_company,
                tracking_number,
                scanned_by: actor,
            },
            &number,
        )
        .await?;

    tracing::info!(
        order_number = %number,
        company = %scan.delivery_company,
        "Order scanned for pickup"
    );

    Ok(scan)
}

/// Receive `quantity` units of a product.
pub async fn add_stock<L>(
    ledger: &L,
    product_id: Uuid,
    quantity: i32,
    reason: Option<String>,
    actor: Uuid,
) -> AppResult<StockHistoryEntry>
where
    L: InventoryLedger + ?Sized,
{
    let stocked = ledger
        .lock_stock(product_id)
        .await?
        .ok_or_not_found("Stock")?;
    let movement =
        StockMovement::addition(product_id, stocked.quantity, quantity, reason, Some(actor))?;
    ledger.record_movement(movement).await
}

/// Opening ledger entry of a newly created product. Zero opens nothing.
pub async fn open_stock<L>(
    ledger: &L,
    product_id: Uuid,
    quantity: i32,
    actor: Uuid,
) -> AppResult<Option<StockHistoryEntry>>
where
    L: InventoryLedger + ?Sized,
{
    if quantity == 0 {
        return Ok(None);
    }
    add_stock(
        ledger,
        product_id,
        quantity,
        Some(OPENING_STOCK_REASON.to_string()),
        actor,
    )
    .await
    .map(Some)
}

/// Take `quantity` units of a product out of stock, never below zero.
pub async fn remove_stock<L>(
    ledger: &L,
    product_id: Uuid,
    quantity: i32,
    reason: Option<String>,
    actor: Uuid,
) -> AppResult<StockHistoryEntry>
where
    L: InventoryLedger + ?Sized,
{
    let stocked = ledger
        .lock_stock(product_id)
        .await?
        .ok_or_not_found("Stock")?;
    let movement = StockMovement::removal(
        product_id,
        &stocked.name,
        stocked.quantity,
        quantity,
        reason,
        Some(actor),
    )?;
    ledger.record_movement(movement).await
}

/// Set a product's stock to a counted quantity.
pub async fn adjust_stock<L>(
    ledger: &L,
    product_id: Uuid,
    counted: i32,
    reason: Option<String>,
    actor: Uuid,
) -> AppResult<StockHistoryEntry>
where
    L: InventoryLedger + ?Sized,
{
    let stocked = ledger
        .lock_stock(product_id)
        .await?
        .ok_or_not_found("Stock")?;
    let movement =
        StockMovement::adjustment(product_id, stocked.quantity, counted, reason, Some(actor))?;
    ledger.record_movement(movement).await
}
