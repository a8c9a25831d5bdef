//! Week-by-week summaries of sales and expenses.
//!
//! A week is the Monday-Sunday [`DateWindow`] the caller selected. Sales are only
//! counted on the configured operating days; expenses count on every day.

use crate::core::{
    breakdown::{self, CategoryTotal, ItemCount},
    calendar::{DateWindow, OperatingDays, previous_week},
    expense::ExpenseWithAllocations,
    metrics,
    order::OrderWithItems,
};
use chrono::{Days, NaiveDate, Weekday};

/// Sales on one operating day of the selected week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySales {
    /// The weekday
    pub weekday: Weekday,
    /// Its date in the selected week
    pub date: NaiveDate,
    /// Sales total in cents
    pub total: i64,
    /// Orders taken
    pub orders: usize,
    /// Units per item, first-seen order
    pub items: Vec<ItemCount>,
    /// Sales on the same weekday of the previous week
    pub previous_total: i64,
}

/// Operating-day sales for a week next to the week before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySalesSummary {
    /// The selected week
    pub week: DateWindow,
    /// One entry per operating day, in configured order
    pub days: Vec<DaySales>,
    /// Sum over the operating days
    pub total: i64,
    /// The same sum for the previous week
    pub previous_total: i64,
}

/// Summarises sales on each operating day of `week`.
#[must_use]
pub fn weekly_sales_summary(
    orders: &[OrderWithItems],
    operating_days: &OperatingDays,
    week: DateWindow,
) -> WeeklySalesSummary {
    let days: Vec<DaySales> = operating_days
        .dates_in(week)
        .into_iter()
        .map(|(weekday, date)| {
            let today = Some(DateWindow::single_day(date));
            let same_day_last_week = Some(DateWindow::single_day(
                date.checked_sub_days(Days::new(7)).unwrap_or(date),
            ));
            DaySales {
                weekday,
                date,
                total: metrics::total_sales(orders, today),
                orders: metrics::order_count(orders, today),
                items: breakdown::item_quantities(
                    orders.iter().filter(|order| order.order.date == date),
                ),
                previous_total: metrics::total_sales(orders, same_day_last_week),
            }
        })
        .collect();

    WeeklySalesSummary {
        week,
        total: days.iter().map(|day| day.total).fold(0, i64::saturating_add),
        previous_total: days
            .iter()
            .map(|day| day.previous_total)
            .fold(0, i64::saturating_add),
        days,
    }
}

/// Expenses for a week compared with the week before and with the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyExpenseComparison {
    /// The selected week
    pub week: DateWindow,
    /// Spent in the selected week
    pub total: i64,
    /// Spent in the previous week
    pub previous_total: i64,
    /// Change from the previous week in percent; 0 when the previous week is 0
    pub percentage_change: f64,
    /// Weekly budget in cents
    pub budget: i64,
    /// Share of the budget used, in percent; 0 when the budget is 0
    pub budget_used: f64,
    /// Budget left, negative when overspent
    pub remaining: i64,
    /// Selected week's spending per category
    pub categories: Vec<CategoryTotal>,
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    current.saturating_sub(previous) as f64 * 100.0 / previous as f64
}

/// Compares spending in `week` with the previous week and the weekly budget.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weekly_expense_comparison(
    expenses: &[ExpenseWithAllocations],
    week: DateWindow,
    budget: i64,
) -> WeeklyExpenseComparison {
    let total = metrics::total_expenses(expenses, Some(week));
    let previous_total = metrics::total_expenses(expenses, Some(previous_week(week)));
    let budget_used = if budget > 0 {
        total as f64 * 100.0 / budget as f64
    } else {
        0.0
    };

    WeeklyExpenseComparison {
        week,
        total,
        previous_total,
        percentage_change: percentage_change(total, previous_total),
        budget,
        budget_used,
        remaining: budget.saturating_sub(total),
        categories: breakdown::category_breakdown(expenses, Some(week)),
    }
}
