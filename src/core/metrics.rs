//! Headline metrics computed from loaded orders and expenses.
//!
//! Everything here is a pure function over slices of records: no I/O, no
//! failure. Money is cents. A window of `None` means all time; a record whose
//! date is unknown never falls inside a bounded window.

use crate::{
    config::business::BusinessConfig,
    core::{
        calendar::DateWindow,
        expense::ExpenseWithAllocations,
        order::OrderWithItems,
    },
};
use chrono::{Duration, NaiveDate};
use std::fmt;

/// A record that belongs to a calendar day.
pub trait Dated {
    /// The day the record counts towards, if known.
    fn record_date(&self) -> Option<NaiveDate>;
}

impl Dated for OrderWithItems {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.order.date)
    }
}

impl Dated for ExpenseWithAllocations {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.expense.incurred_on)
    }
}

fn in_window<T: Dated>(record: &T, window: Option<DateWindow>) -> bool {
    window.is_none_or(|w| w.contains_opt(record.record_date()))
}

/// Sums `value` over the records inside `window`, saturating at the `i64` limits.
pub fn sum_in_window<T, F>(records: &[T], window: Option<DateWindow>, value: F) -> i64
where
    T: Dated,
    F: Fn(&T) -> i64,
{
    records
        .iter()
        .filter(|record| in_window(*record, window))
        .map(value)
        .fold(0, i64::saturating_add)
}

/// Counts the records inside `window`.
#[must_use]
pub fn count_in_window<T: Dated>(records: &[T], window: Option<DateWindow>) -> usize {
    records
        .iter()
        .filter(|record| in_window(*record, window))
        .count()
}

/// Sum of order totals.
#[must_use]
pub fn total_sales(orders: &[OrderWithItems], window: Option<DateWindow>) -> i64 {
    sum_in_window(orders, window, |o| o.order.order_total)
}

/// Sum of expense amounts.
#[must_use]
pub fn total_expenses(expenses: &[ExpenseWithAllocations], window: Option<DateWindow>) -> i64 {
    sum_in_window(expenses, window, |e| e.expense.amount)
}

/// Number of orders.
#[must_use]
pub fn order_count(orders: &[OrderWithItems], window: Option<DateWindow>) -> usize {
    count_in_window(orders, window)
}

/// Units sold across every line of every order.
#[must_use]
pub fn items_sold(orders: &[OrderWithItems], window: Option<DateWindow>) -> i64 {
    sum_in_window(orders, window, OrderWithItems::items_sold)
}

/// Sales minus expenses.
#[must_use]
pub const fn net_profit(sales: i64, expenses: i64) -> i64 {
    sales.saturating_sub(expenses)
}

/// Net profit as a percentage of sales; 0 when there are no sales.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn profit_margin(sales: i64, expenses: i64) -> f64 {
    if sales == 0 {
        return 0.0;
    }
    net_profit(sales, expenses) as f64 * 100.0 / sales as f64
}

/// Average daily sales over the trailing `days` before `reference`.
///
/// The window is `[reference - days, reference]` and the total is divided by
/// `days`, rounded to the nearest cent. A non-positive `days` yields 0.
#[must_use]
pub fn average_daily_sales(orders: &[OrderWithItems], reference: NaiveDate, days: i64) -> i64 {
    if days <= 0 {
        return 0;
    }
    let from = Duration::try_days(days)
        .and_then(|span| reference.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    let window = DateWindow::new(from, reference);
    div_round(total_sales(orders, Some(window)), days)
}

/// Sales divided by order count, rounded to the nearest cent; 0 with no orders.
#[must_use]
pub fn average_order_value(sales: i64, orders: usize) -> i64 {
    match i64::try_from(orders) {
        Ok(count) if count > 0 => div_round(sales, count),
        _ => 0,
    }
}

// Rounds half away from zero.
const fn div_round(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        numerator.saturating_add(half) / denominator
    } else {
        numerator.saturating_sub(half) / denominator
    }
}

/// Direction of a day-over-day comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Today is higher than yesterday
    Up,
    /// Today is lower than yesterday
    Down,
    /// Exactly equal
    Stable,
}

impl Trend {
    /// Compares `current` against `previous` with no tolerance band.
    #[must_use]
    pub const fn classify(current: i64, previous: i64) -> Self {
        if current > previous {
            Self::Up
        } else if current < previous {
            Self::Down
        } else {
            Self::Stable
        }
    }

    /// Short arrow for chat output.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Stable => "▬",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        })
    }
}

fn day_over_day<T, F>(records: &[T], reference: NaiveDate, value: F) -> Trend
where
    T: Dated,
    F: Fn(&T) -> i64 + Copy,
{
    let today = sum_in_window(records, Some(DateWindow::single_day(reference)), value);
    let yesterday = sum_in_window(
        records,
        Some(DateWindow::single_day(reference.pred_opt().unwrap_or(reference))),
        value,
    );
    Trend::classify(today, yesterday)
}

/// Sales on `reference` compared with the day before.
#[must_use]
pub fn sales_trend(orders: &[OrderWithItems], reference: NaiveDate) -> Trend {
    day_over_day(orders, reference, |o| o.order.order_total)
}

/// Expenses on `reference` compared with the day before.
#[must_use]
pub fn expenses_trend(expenses: &[ExpenseWithAllocations], reference: NaiveDate) -> Trend {
    day_over_day(expenses, reference, |e| e.expense.amount)
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    /// Sales in the window
    pub total_sales: i64,
    /// Expenses in the window
    pub total_expenses: i64,
    /// Sales minus expenses
    pub net_profit: i64,
    /// Net profit as a percentage of sales
    pub profit_margin: f64,
    /// Orders in the window
    pub order_count: usize,
    /// Units sold in the window
    pub items_sold: i64,
    /// Trailing average daily sales ending at the reference day
    pub average_daily_sales: i64,
    /// Average order value in the window
    pub average_order_value: i64,
    /// Reference day's sales versus the day before
    pub sales_trend: Trend,
    /// Reference day's expenses versus the day before
    pub expenses_trend: Trend,
}

/// Computes every dashboard metric in one pass over the inputs.
#[must_use]
pub fn dashboard_metrics(
    orders: &[OrderWithItems],
    expenses: &[ExpenseWithAllocations],
    window: Option<DateWindow>,
    business: &BusinessConfig,
    reference: NaiveDate,
) -> DashboardMetrics {
    let sales = total_sales(orders, window);
    let spent = total_expenses(expenses, window);
    let count = order_count(orders, window);

    DashboardMetrics {
        total_sales: sales,
        total_expenses: spent,
        net_profit: net_profit(sales, spent),
        profit_margin: profit_margin(sales, spent),
        order_count: count,
        items_sold: items_sold(orders, window),
        average_daily_sales: average_daily_sales(orders, reference, business.average_daily_window),
        average_order_value: average_order_value(sales, count),
        sales_trend: sales_trend(orders, reference),
        expenses_trend: expenses_trend(expenses, reference),
    }
}

/// Lifetime sales figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllTimeTotals {
    /// Every order's total
    pub sales: i64,
    /// Number of orders ever taken
    pub orders: usize,
    /// Units ever sold
    pub items_sold: i64,
}

/// Totals across every loaded order.
#[must_use]
pub fn all_time_totals(orders: &[OrderWithItems]) -> AllTimeTotals {
    AllTimeTotals {
        sales: total_sales(orders, None),
        orders: order_count(orders, None),
        items_sold: items_sold(orders, None),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::core::{expense::ExpenseCategory, order::OrderStatus};
    use crate::test_utils::*;

    struct Undated(i64);

    impl Dated for Undated {
        fn record_date(&self) -> Option<NaiveDate> {
            None
        }
    }

    fn orders() -> Vec<OrderWithItems> {
        vec![
            order_record(1, ymd(2024, 6, 14), OrderStatus::Completed, &[("Fries", 2, 500)]),
            order_record(2, ymd(2024, 6, 15), OrderStatus::Pending, &[("Soft Drink", 1, 300)]),
            order_record(
                3,
                ymd(2024, 6, 16),
                OrderStatus::Completed,
                &[("Chicken Shawarma", 3, 800), ("Fries", 1, 500)],
            ),
        ]
    }

    #[test]
    fn test_window_sums_are_inclusive() {
        let orders = orders();
        let window = DateWindow::new(ymd(2024, 6, 14), ymd(2024, 6, 15));

        assert_eq!(total_sales(&orders, Some(window)), 1300);
        assert_eq!(order_count(&orders, Some(window)), 2);
        assert_eq!(items_sold(&orders, Some(window)), 3);
        assert_eq!(total_sales(&orders, None), 4200);
        assert_eq!(items_sold(&orders, None), 7);
    }

    #[test]
    fn test_undated_records_are_excluded_from_windows() {
        let records = vec![Undated(100), Undated(200)];
        let window = Some(DateWindow::single_day(ymd(2024, 6, 14)));

        assert_eq!(sum_in_window(&records, window, |r| r.0), 0);
        assert_eq!(count_in_window(&records, window), 0);
        assert_eq!(sum_in_window(&records, None, |r| r.0), 300);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let expenses = vec![
            expense_record(1, ExpenseCategory::Other, i64::MAX, ymd(2024, 6, 14), &[]),
            expense_record(2, ExpenseCategory::Other, 100, ymd(2024, 6, 14), &[]),
        ];
        assert_eq!(total_expenses(&expenses, None), i64::MAX);
        assert_eq!(net_profit(0, i64::MAX), -i64::MAX);
        assert_eq!(net_profit(i64::MIN, 1), i64::MIN);
        assert_eq!(average_order_value(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_empty_expense_set_totals_zero() {
        assert_eq!(total_expenses(&[], None), 0);
        assert_eq!(
            total_expenses(&[], Some(DateWindow::single_day(ymd(2024, 6, 14)))),
            0
        );
    }

    #[test]
    fn test_profit_and_margin() {
        assert_eq!(net_profit(10_000, 4000), 6000);
        assert_eq!(profit_margin(10_000, 4000), 60.0);
        assert_eq!(profit_margin(10_000, 15_000), -50.0);
        assert_eq!(profit_margin(0, 4000), 0.0);
    }

    #[test]
    fn test_average_daily_sales_uses_trailing_window() {
        let orders = orders();
        // [06-09, 06-16] holds all three orders: 4200 / 7
        assert_eq!(average_daily_sales(&orders, ymd(2024, 6, 16), 7), 600);
        // [06-15, 06-16] holds orders 2 and 3: 3200 / 1
        assert_eq!(average_daily_sales(&orders, ymd(2024, 6, 16), 1), 3200);
        assert_eq!(average_daily_sales(&orders, ymd(2024, 6, 16), 0), 0);
    }

    #[test]
    fn test_average_order_value() {
        assert_eq!(average_order_value(4200, 3), 1400);
        assert_eq!(average_order_value(1000, 3), 333);
        assert_eq!(average_order_value(2000, 3), 667);
        assert_eq!(average_order_value(4200, 0), 0);
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(Trend::classify(10, 5), Trend::Up);
        assert_eq!(Trend::classify(5, 10), Trend::Down);
        assert_eq!(Trend::classify(5, 5), Trend::Stable);

        let orders = orders();
        assert_eq!(sales_trend(&orders, ymd(2024, 6, 16)), Trend::Up);
        assert_eq!(sales_trend(&orders, ymd(2024, 6, 15)), Trend::Down);
        assert_eq!(sales_trend(&orders, ymd(2024, 6, 20)), Trend::Stable);
    }

    #[test]
    fn test_expenses_trend() {
        let expenses = vec![
            expense_record(1, ExpenseCategory::Wraps, 1000, ymd(2024, 6, 14), &[]),
            expense_record(2, ExpenseCategory::Balaji, 500, ymd(2024, 6, 15), &[]),
        ];
        assert_eq!(expenses_trend(&expenses, ymd(2024, 6, 15)), Trend::Down);
        assert_eq!(expenses_trend(&expenses, ymd(2024, 6, 14)), Trend::Up);
    }

    #[test]
    fn test_dashboard_metrics() {
        let orders = orders();
        let expenses = vec![expense_record(
            1,
            ExpenseCategory::Weekly,
            0,
            ymd(2024, 6, 10),
            &[(ExpenseCategory::Wraps, 1000), (ExpenseCategory::Marketing, 200)],
        )];
        let business = BusinessConfig::default();

        let metrics = dashboard_metrics(&orders, &expenses, None, &business, ymd(2024, 6, 16));
        assert_eq!(metrics.total_sales, 4200);
        assert_eq!(metrics.total_expenses, 1200);
        assert_eq!(metrics.net_profit, 3000);
        assert_eq!(metrics.order_count, 3);
        assert_eq!(metrics.items_sold, 7);
        assert_eq!(metrics.average_order_value, 1400);
        assert_eq!(metrics.average_daily_sales, 600);
        assert_eq!(metrics.sales_trend, Trend::Up);
        assert_eq!(metrics.expenses_trend, Trend::Stable);
    }

    #[test]
    fn test_all_time_totals() {
        assert_eq!(
            all_time_totals(&orders()),
            AllTimeTotals {
                sales: 4200,
                orders: 3,
                items_sold: 7,
            }
        );
        assert_eq!(all_time_totals(&[]), AllTimeTotals::default());
    }
}
