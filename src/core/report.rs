//! Report formatting.
//!
//! This module turns amounts, percentages and the aggregate structs into the
//! plain text the bot layer sends. All functions are framework-agnostic; the bot
//! wraps their output in embeds or messages.

use crate::core::{
    breakdown::{CategoryTotal, ItemCount},
    calendar::{relative_date_label, weekday_name},
    expense::ExpenseWithAllocations,
    metrics::{DashboardMetrics, Trend},
    order::OrderWithItems,
    weekly::{WeeklyExpenseComparison, WeeklySalesSummary},
};
use chrono::NaiveDate;
use std::fmt::Write;

/// Formats cents as ringgit, e.g. `1250` -> `"RM12.50"`, `-500` -> `"-RM5.00"`.
#[must_use]
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}RM{}.{:02}", abs / 100, abs % 100)
}

/// Formats a percentage with one decimal place, e.g. `"12.5%"`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`. The bar is
/// clamped to `0..=100` but the printed percentage is not, so overspending shows.
///
/// # Arguments
/// * `progress_percent` - Progress percentage
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Trend with its arrow, e.g. `"▲ up"`.
#[must_use]
pub fn format_trend(trend: Trend) -> String {
    format!("{} {trend}", trend.arrow())
}

/// One line per order: id, status, date (with how long ago), customer, items
/// and total.
#[must_use]
pub fn format_order_line(order: &OrderWithItems, today: NaiveDate) -> String {
    let items = order
        .items
        .iter()
        .map(|line| format!("{} x{}", line.item, line.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    let status = if order.is_completed() { "✅" } else { "⏳" };

    format!(
        "{status} #{} | {} ({}) | {} | {items} | {}",
        order.order.id,
        order.order.date,
        relative_date_label(order.order.date, today),
        order.order.customer_description,
        format_currency(order.order.order_total)
    )
}

/// One line per expense: id, date, category, description and amount.
#[must_use]
pub fn format_expense_line(expense: &ExpenseWithAllocations) -> String {
    let category = expense
        .category()
        .map_or_else(|| expense.expense.category.clone(), |c| c.label().to_string());

    format!(
        "#{} | {} | {category} | {} | {}",
        expense.expense.id,
        expense.expense.incurred_on,
        expense.expense.description,
        format_currency(expense.expense.amount)
    )
}

/// Dashboard body text.
#[must_use]
pub fn format_dashboard(metrics: &DashboardMetrics) -> String {
    format!(
        "**Sales:** {} ({} today)\n\
         **Expenses:** {} ({} today)\n\
         **Net profit:** {} | **Margin:** {}\n\
         **Orders:** {} | **Items sold:** {}\n\
         **Avg daily sales:** {} | **Avg order:** {}",
        format_currency(metrics.total_sales),
        format_trend(metrics.sales_trend),
        format_currency(metrics.total_expenses),
        format_trend(metrics.expenses_trend),
        format_currency(metrics.net_profit),
        format_percentage(metrics.profit_margin),
        metrics.order_count,
        metrics.items_sold,
        format_currency(metrics.average_daily_sales),
        format_currency(metrics.average_order_value),
    )
}

/// Per-day weekly sales text.
#[must_use]
pub fn format_weekly_sales(summary: &WeeklySalesSummary) -> String {
    let mut out = format!("Week {} to {}\n", summary.week.from, summary.week.to);
    if summary.days.is_empty() {
        out.push_str("No operating days this week.\n");
    }
    for day in &summary.days {
        let _ = writeln!(
            out,
            "**{}** {}: {} from {} orders (last week {})",
            weekday_name(day.weekday),
            day.date,
            format_currency(day.total),
            day.orders,
            format_currency(day.previous_total)
        );
        for item in &day.items {
            let _ = writeln!(out, "  • {} x{}", item.name, item.quantity);
        }
    }
    let _ = write!(
        out,
        "**Week total:** {} (last week {})",
        format_currency(summary.total),
        format_currency(summary.previous_total)
    );
    out
}

/// Per-category lines, e.g. `"Wraps: RM30.00"`.
#[must_use]
pub fn format_category_totals(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "No expenses recorded.".to_string();
    }
    totals
        .iter()
        .map(|t| format!("{}: {}", t.category.label(), format_currency(t.amount)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Weekly expense comparison text with the budget bar.
#[must_use]
pub fn format_weekly_expenses(comparison: &WeeklyExpenseComparison) -> String {
    format!(
        "Week {} to {}\n\
         **Spent:** {} (last week {}, {})\n\
         **Budget:** {} {}\n\
         **Remaining:** {}\n\n{}",
        comparison.week.from,
        comparison.week.to,
        format_currency(comparison.total),
        format_currency(comparison.previous_total),
        format_percentage(comparison.percentage_change),
        format_currency(comparison.budget),
        format_progress_bar(comparison.budget_used, None),
        format_currency(comparison.remaining),
        format_category_totals(&comparison.categories),
    )
}

/// Numbered ranking of items.
#[must_use]
pub fn format_popular_items(items: &[ItemCount]) -> String {
    if items.is_empty() {
        return "No items sold yet.".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(rank, item)| format!("{}. {} ({} sold)", rank + 1, item.name, item.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        calendar::{OperatingDays, week_window},
        expense::ExpenseCategory,
        order::OrderStatus,
        weekly,
    };
    use crate::test_utils::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1250), "RM12.50");
        assert_eq!(format_currency(0), "RM0.00");
        assert_eq!(format_currency(5), "RM0.05");
        assert_eq!(format_currency(-500), "-RM5.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.345), "12.3%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(-50.0), "-50.0%");
    }

    #[test]
    fn test_format_progress_bar_full() {
        let bar = format_progress_bar(100.0, Some(10));
        assert_eq!(bar, "[██████████] 100.0%");
    }

    #[test]
    fn test_format_progress_bar_half() {
        let bar = format_progress_bar(50.0, Some(10));
        assert_eq!(bar, "[█████░░░░░] 50.0%");
    }

    #[test]
    fn test_format_progress_bar_over_budget() {
        // Overspending fills the bar but keeps the real percentage
        let bar = format_progress_bar(125.0, Some(4));
        assert_eq!(bar, "[████] 125.0%");
    }

    #[test]
    fn test_format_trend() {
        assert_eq!(format_trend(Trend::Up), "▲ up");
        assert_eq!(format_trend(Trend::Stable), "▬ stable");
    }

    #[test]
    fn test_format_order_line() {
        let order = order_record(
            7,
            ymd(2024, 6, 14),
            OrderStatus::Pending,
            &[("Fries", 2, 500), ("Soft Drink", 1, 300)],
        );
        assert_eq!(
            format_order_line(&order, ymd(2024, 6, 17)),
            "⏳ #7 | 2024-06-14 (3 days ago) | Walk-in | Fries x2, Soft Drink x1 | RM13.00"
        );
        assert!(format_order_line(&order, ymd(2024, 6, 14)).contains("2024-06-14 (Today)"));
    }

    #[test]
    fn test_format_expense_line() {
        let expense = expense_record(3, ExpenseCategory::SeriTernak, 12_050, ymd(2024, 6, 10), &[]);
        assert_eq!(
            format_expense_line(&expense),
            "#3 | 2024-06-10 | Seri Ternak | Test expense | RM120.50"
        );
    }

    #[test]
    fn test_format_weekly_sales_lists_items() {
        let orders = vec![order_record(
            1,
            ymd(2024, 6, 14),
            OrderStatus::Completed,
            &[("Fries", 2, 500)],
        )];
        let summary =
            weekly::weekly_sales_summary(&orders, &OperatingDays::default(), week_window(ymd(2024, 6, 14)));
        let text = format_weekly_sales(&summary);
        assert!(text.contains("**Friday** 2024-06-14: RM10.00 from 1 orders"));
        assert!(text.contains("  • Fries x2"));
        assert!(text.ends_with("**Week total:** RM10.00 (last week RM0.00)"));
    }

    #[test]
    fn test_format_popular_items() {
        let items = vec![
            ItemCount {
                name: "Fries".to_string(),
                quantity: 4,
            },
            ItemCount {
                name: "Soft Drink".to_string(),
                quantity: 1,
            },
        ];
        assert_eq!(
            format_popular_items(&items),
            "1. Fries (4 sold)\n2. Soft Drink (1 sold)"
        );
        assert_eq!(format_popular_items(&[]), "No items sold yet.");
    }

    #[test]
    fn test_format_category_totals() {
        let totals = vec![CategoryTotal {
            category: ExpenseCategory::Wraps,
            amount: 3000,
        }];
        assert_eq!(format_category_totals(&totals), "Wraps: RM30.00");
        assert_eq!(format_category_totals(&[]), "No expenses recorded.");
    }
}
