//! Shared test utilities for `ShawarmaLedger`.
//!
//! This module provides common helper functions for setting up test databases,
//! storing orders and expenses with sensible defaults, and building unsaved
//! records for the pure aggregation tests.

use crate::{
    core::{
        expense::{self, ExpenseCategory, ExpenseWithAllocations, NewExpense},
        order::{self, NewLineItem, NewOrder, OrderStatus, OrderWithItems},
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an impossible date.
#[allow(clippy::unwrap_used)]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An unsaved line item.
pub fn line(item: &str, quantity: i32, unit_price: i64) -> NewLineItem {
    NewLineItem {
        item: item.to_string(),
        quantity,
        unit_price,
    }
}

/// Creates a pending order with the default customer note "Walk-in".
pub async fn create_test_order(
    db: &DatabaseConnection,
    date: NaiveDate,
    items: Vec<NewLineItem>,
) -> Result<OrderWithItems> {
    create_custom_order(db, date, "Walk-in", items).await
}

/// Creates a pending order with a specific customer note.
pub async fn create_custom_order(
    db: &DatabaseConnection,
    date: NaiveDate,
    customer: &str,
    items: Vec<NewLineItem>,
) -> Result<OrderWithItems> {
    order::create_order(
        db,
        NewOrder {
            date,
            customer_description: customer.to_string(),
            items,
        },
    )
    .await
}

/// Creates a single-category expense described as "Test expense".
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category: ExpenseCategory,
    amount: i64,
    incurred_on: NaiveDate,
) -> Result<ExpenseWithAllocations> {
    expense::create_expense(
        db,
        NewExpense::fixed(category, "Test expense", amount, incurred_on),
    )
    .await
}

/// Builds an unsaved order with its lines, for aggregation tests.
///
/// # Defaults
/// * `customer_description`: "Walk-in"
/// * timestamps: midnight UTC on `date`
#[allow(clippy::unwrap_used)]
pub fn order_record(
    id: i64,
    date: NaiveDate,
    status: OrderStatus,
    lines: &[(&str, i32, i64)],
) -> OrderWithItems {
    let stamp = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
    let items: Vec<entities::order_item::Model> = lines
        .iter()
        .enumerate()
        .map(|(position, &(item, quantity, unit_price))| entities::order_item::Model {
            id: id * 100 + i64::try_from(position).unwrap(),
            order_id: id,
            position: i32::try_from(position).unwrap(),
            item: item.to_string(),
            quantity,
            unit_price,
            line_total: i64::from(quantity) * unit_price,
        })
        .collect();
    OrderWithItems {
        order: entities::order::Model {
            id,
            date,
            customer_description: "Walk-in".to_string(),
            order_total: items.iter().map(|line| line.line_total).sum(),
            status: status.as_str().to_string(),
            created_at: stamp,
            updated_at: stamp,
        },
        items,
    }
}

/// Builds an unsaved expense, for aggregation tests.
///
/// `allocations` is only meaningful for [`ExpenseCategory::Weekly`]; the amount of a
/// weekly record is then the sum of the shares.
#[allow(clippy::unwrap_used)]
pub fn expense_record(
    id: i64,
    category: ExpenseCategory,
    amount: i64,
    incurred_on: NaiveDate,
    allocations: &[(ExpenseCategory, i64)],
) -> ExpenseWithAllocations {
    let stamp = Utc.from_utc_datetime(&incurred_on.and_hms_opt(0, 0, 0).unwrap());
    let allocations: Vec<entities::expense_allocation::Model> = allocations
        .iter()
        .enumerate()
        .map(|(n, &(share_category, share))| entities::expense_allocation::Model {
            id: id * 100 + i64::try_from(n).unwrap(),
            expense_id: id,
            category: share_category.key().to_string(),
            amount: share,
        })
        .collect();
    let amount = if allocations.is_empty() {
        amount
    } else {
        allocations.iter().map(|share| share.amount).sum()
    };
    ExpenseWithAllocations {
        expense: entities::expense::Model {
            id,
            category: category.key().to_string(),
            description: "Test expense".to_string(),
            amount,
            incurred_on,
            created_at: stamp,
            updated_at: stamp,
        },
        allocations,
    }
}
