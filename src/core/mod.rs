//! Core business logic, independent of the Discord layer.
//!
//! `order` and `expense` talk to the database; `metrics`, `weekly` and
//! `breakdown` are pure aggregations over loaded records; `report` formats
//! them; `view` holds dashboard state between interactions.

use crate::errors::{Error, Result};

/// Largest money amount in cents accepted for a price, a line, an order or an
/// expense (RM10,000,000.00).
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Checks that a cent amount lies in `0..=MAX_AMOUNT`.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] when negative and [`Error::AmountTooLarge`]
/// when above [`MAX_AMOUNT`].
pub const fn check_amount(amount: i64) -> Result<i64> {
    if amount < 0 {
        Err(Error::InvalidAmount { amount })
    } else if amount > MAX_AMOUNT {
        Err(Error::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        })
    } else {
        Ok(amount)
    }
}

/// Expense categories by amount and popular items by quantity
pub mod breakdown;
/// Date windows, ISO weeks and operating days
pub mod calendar;
/// Expense recording and weekly expense allocations
pub mod expense;
/// Menu lookup
pub mod menu;
/// Sales and expense totals, averages and trends
pub mod metrics;
/// Order lifecycle and line items
pub mod order;
/// Text formatting for currency, percentages and summaries
pub mod report;
/// Dashboard view state and form handling
pub mod view;
/// Weekly sales and expense summaries
pub mod weekly;
