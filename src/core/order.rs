//! Order business logic - creating, querying, completing and deleting orders.
//!
//! Orders are stored in two tables: the order row and its line items. Every
//! function here loads or writes both, so callers always see an
//! [`OrderWithItems`]. Totals are computed from the line items on every write.
//! Store failures come back as `Err`; an empty list always means "no orders".

use crate::{
    core::{calendar::DateWindow, check_amount, menu::MenuItem},
    entities::{Order, OrderItem, order, order_item},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::LikeExpr};
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::{debug, info, instrument};

/// Lifecycle state of an order. The only transition is `Pending -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Taken but not yet handed over
    Pending,
    /// Handed over; the order is frozen
    Completed,
}

impl OrderStatus {
    /// Value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(Error::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// A line item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Menu item name
    pub item: String,
    /// Number of units
    pub quantity: i32,
    /// Price per unit in cents
    pub unit_price: i64,
}

impl NewLineItem {
    /// Creates a line at the menu item's default price.
    #[must_use]
    pub fn from_menu(menu_item: &MenuItem, quantity: i32) -> Self {
        Self {
            item: menu_item.name.clone(),
            quantity,
            unit_price: menu_item.default_price,
        }
    }

    /// `quantity * unit_price` in cents, saturating at the `i64` limits.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        i64::from(self.quantity).saturating_mul(self.unit_price)
    }
}

impl From<&order_item::Model> for NewLineItem {
    fn from(line: &order_item::Model) -> Self {
        Self {
            item: line.item.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Sum of all line totals in cents.
#[must_use]
pub fn order_total(items: &[NewLineItem]) -> i64 {
    items
        .iter()
        .map(NewLineItem::line_total)
        .fold(0, i64::saturating_add)
}

/// Everything needed to create an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Sale date
    pub date: NaiveDate,
    /// Free-text customer note
    pub customer_description: String,
    /// Lines in display order
    pub items: Vec<NewLineItem>,
}

/// Partial update of a pending order. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    /// New sale date
    pub date: Option<NaiveDate>,
    /// New customer note
    pub customer_description: Option<String>,
    /// Replacement line items; the total is recomputed from them
    pub items: Option<Vec<NewLineItem>>,
}

/// An order together with its line items in position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithItems {
    /// The order row
    pub order: order::Model,
    /// Its line items
    pub items: Vec<order_item::Model>,
}

impl OrderWithItems {
    /// Parsed status, `None` if the stored value is not recognised.
    #[must_use]
    pub fn status(&self) -> Option<OrderStatus> {
        self.order.status.parse().ok()
    }

    /// Whether the order has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status() == Some(OrderStatus::Completed)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn items_sold(&self) -> i64 {
        self.items
            .iter()
            .map(|line| i64::from(line.quantity))
            .fold(0, i64::saturating_add)
    }
}

fn validate_items(items: &[NewLineItem]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::EmptyOrder);
    }
    for line in items {
        if line.quantity < 1 {
            return Err(Error::InvalidQuantity {
                item: line.item.clone(),
                quantity: line.quantity,
            });
        }
        check_amount(line.unit_price)?;
    }

    check_amount(order_total(items))?;
    Ok(())
}

/// Escapes `LIKE` wildcards so `needle` matches literally under `ESCAPE '\'`.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn insert_items<C>(db: &C, order_id: i64, items: &[NewLineItem]) -> Result<Vec<order_item::Model>>
where
    C: ConnectionTrait,
{
    let mut stored = Vec::with_capacity(items.len());
    for (position, line) in items.iter().enumerate() {
        let model = order_item::ActiveModel {
            order_id: Set(order_id),
            position: Set(i32::try_from(position)?),
            item: Set(line.item.trim().to_string()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            line_total: Set(line.line_total()),
            ..Default::default()
        };
        stored.push(model.insert(db).await?);
    }
    Ok(stored)
}

async fn attach_items<C>(db: &C, orders: Vec<order::Model>) -> Result<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let lines = OrderItem::find()
        .filter(order_item::Column::OrderId.is_in(ids))
        .order_by_asc(order_item::Column::OrderId)
        .order_by_asc(order_item::Column::Position)
        .all(db)
        .await?;

    let mut by_order: HashMap<i64, Vec<order_item::Model>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}

async fn with_items<C>(db: &C, order: order::Model) -> Result<OrderWithItems>
where
    C: ConnectionTrait,
{
    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .order_by_asc(order_item::Column::Position)
        .all(db)
        .await?;
    Ok(OrderWithItems { order, items })
}

fn newest_first(select: Select<Order>) -> Select<Order> {
    select
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
}

/// Creates a pending order and its line items in one database transaction.
///
/// # Errors
/// Returns an error if:
/// - The order has no items
/// - A quantity is below 1, or a unit price or the order total is negative or
///   above [`MAX_AMOUNT`](crate::core::MAX_AMOUNT)
/// - The database insert fails
#[instrument(skip(db, new_order), fields(items = new_order.items.len()))]
pub async fn create_order(db: &DatabaseConnection, new_order: NewOrder) -> Result<OrderWithItems> {
    validate_items(&new_order.items)?;

    let now = Utc::now();
    let txn = db.begin().await?;

    let order = order::ActiveModel {
        date: Set(new_order.date),
        customer_description: Set(new_order.customer_description.trim().to_string()),
        order_total: Set(order_total(&new_order.items)),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let items = insert_items(&txn, order.id, &new_order.items).await?;
    txn.commit().await?;

    info!(order_id = order.id, total = order.order_total, "Order created");
    Ok(OrderWithItems { order, items })
}

/// Retrieves all orders, newest first.
#[instrument(skip(db))]
pub async fn get_all_orders(db: &DatabaseConnection) -> Result<Vec<OrderWithItems>> {
    let orders = newest_first(Order::find()).all(db).await?;
    debug!("Loaded {} orders", orders.len());
    attach_items(db, orders).await
}

/// Retrieves orders in the given status, newest first.
#[instrument(skip(db))]
pub async fn get_orders_by_status(
    db: &DatabaseConnection,
    status: OrderStatus,
) -> Result<Vec<OrderWithItems>> {
    let orders = newest_first(Order::find().filter(order::Column::Status.eq(status.as_str())))
        .all(db)
        .await?;
    attach_items(db, orders).await
}

/// Retrieves orders whose sale date falls in `window` (inclusive), newest first.
#[instrument(skip(db))]
pub async fn get_orders_by_date_range(
    db: &DatabaseConnection,
    window: DateWindow,
) -> Result<Vec<OrderWithItems>> {
    let orders = newest_first(
        Order::find()
            .filter(order::Column::Date.gte(window.from))
            .filter(order::Column::Date.lte(window.to)),
    )
    .all(db)
    .await?;
    attach_items(db, orders).await
}

/// Retrieves orders whose customer note contains `needle`, newest first.
///
/// `SQLite`'s `LIKE` ignores ASCII case, so "RED" matches "red shirt". `%` and
/// `_` in `needle` match themselves.
#[instrument(skip(db))]
pub async fn get_orders_by_customer(
    db: &DatabaseConnection,
    needle: &str,
) -> Result<Vec<OrderWithItems>> {
    let orders = newest_first(
        Order::find().filter(
            order::Column::CustomerDescription
                .like(LikeExpr::new(format!("%{}%", escape_like(needle.trim()))).escape('\\')),
        ),
    )
    .all(db)
    .await?;
    attach_items(db, orders).await
}

/// Finds an order by id, returning `None` if it doesn't exist.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<OrderWithItems>> {
    match Order::find_by_id(order_id).one(db).await? {
        Some(order) => with_items(db, order).await.map(Some),
        None => Ok(None),
    }
}

/// Marks a pending order as completed. Items and total are left untouched.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] for an unknown id and
/// [`Error::OrderAlreadyCompleted`] if the order was already completed.
#[instrument(skip(db))]
pub async fn complete_order(db: &DatabaseConnection, order_id: i64) -> Result<OrderWithItems> {
    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if order.status == OrderStatus::Completed.as_str() {
        return Err(Error::OrderAlreadyCompleted { id: order_id });
    }

    let mut active_model: order::ActiveModel = order.into();
    active_model.status = Set(OrderStatus::Completed.as_str().to_string());
    active_model.updated_at = Set(Utc::now());
    let updated = active_model.update(db).await?;

    info!(order_id, "Order completed");
    with_items(db, updated).await
}

/// Applies a partial update to a pending order.
///
/// When `items` is supplied the old lines are replaced and the total recomputed,
/// all inside one database transaction.
///
/// # Errors
/// Returns [`Error::OrderNotFound`], [`Error::OrderAlreadyCompleted`], or a
/// validation error for the replacement items.
#[instrument(skip(db, update))]
pub async fn update_order(
    db: &DatabaseConnection,
    order_id: i64,
    update: OrderUpdate,
) -> Result<OrderWithItems> {
    if let Some(items) = &update.items {
        validate_items(items)?;
    }

    let txn = db.begin().await?;
    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if order.status == OrderStatus::Completed.as_str() {
        return Err(Error::OrderAlreadyCompleted { id: order_id });
    }

    let mut active_model: order::ActiveModel = order.into();
    if let Some(date) = update.date {
        active_model.date = Set(date);
    }
    if let Some(note) = update.customer_description {
        active_model.customer_description = Set(note.trim().to_string());
    }
    if let Some(items) = &update.items {
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        insert_items(&txn, order_id, items).await?;
        active_model.order_total = Set(order_total(items));
    }
    active_model.updated_at = Set(Utc::now());

    let updated = active_model.update(&txn).await?;
    let result = with_items(&txn, updated).await?;
    txn.commit().await?;

    debug!(order_id, total = result.order.order_total, "Order updated");
    Ok(result)
}

/// Appends one line to a pending order and recomputes its total.
pub async fn add_item_to_order(
    db: &DatabaseConnection,
    order_id: i64,
    line: NewLineItem,
) -> Result<OrderWithItems> {
    let existing = get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let mut items: Vec<NewLineItem> = existing.items.iter().map(NewLineItem::from).collect();
    items.push(line);

    update_order(
        db,
        order_id,
        OrderUpdate {
            items: Some(items),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an order and its line items.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] if no order has this id.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    let result = Order::delete_by_id(order_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::OrderNotFound { id: order_id });
    }

    txn.commit().await?;
    info!(order_id, "Order deleted");
    Ok(())
}

/// Sum of every order total in cents, computed from the store.
pub async fn total_sales(db: &DatabaseConnection) -> Result<i64> {
    let totals: Vec<i64> = Order::find()
        .select_only()
        .column(order::Column::OrderTotal)
        .into_tuple()
        .all(db)
        .await?;
    Ok(totals.into_iter().fold(0, i64::saturating_add))
}

/// Sum of order totals dated inside `window`, computed from the store.
pub async fn total_sales_by_date_range(db: &DatabaseConnection, window: DateWindow) -> Result<i64> {
    let totals: Vec<i64> = Order::find()
        .select_only()
        .column(order::Column::OrderTotal)
        .filter(order::Column::Date.gte(window.from))
        .filter(order::Column::Date.lte(window.to))
        .into_tuple()
        .all(db)
        .await?;
    Ok(totals.into_iter().fold(0, i64::saturating_add))
}
