//! Grouped views of the ledger: expenses by category and items by popularity.

use crate::core::{
    calendar::DateWindow,
    expense::{ExpenseCategory, ExpenseWithAllocations},
    metrics::Dated,
    order::OrderWithItems,
};
use std::collections::HashMap;

/// Amount spent in one fixed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The category
    pub category: ExpenseCategory,
    /// Total in cents
    pub amount: i64,
}

/// Sums expenses per fixed category.
///
/// Weekly expenses contribute each of their shares to the matching category.
/// Categories are listed in [`ExpenseCategory::FIXED`] order and zero totals are
/// left out.
#[must_use]
pub fn category_breakdown(
    expenses: &[ExpenseWithAllocations],
    window: Option<DateWindow>,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<ExpenseCategory, i64> = HashMap::new();
    for expense in expenses {
        if window.is_some_and(|w| !w.contains_opt(expense.record_date())) {
            continue;
        }
        for (category, amount) in expense.category_amounts() {
            let total = totals.entry(category).or_default();
            *total = total.saturating_add(amount);
        }
    }

    ExpenseCategory::FIXED
        .iter()
        .filter_map(|&category| {
            let amount = totals.get(&category).copied().unwrap_or(0);
            (amount != 0).then_some(CategoryTotal { category, amount })
        })
        .collect()
}

/// Units sold of one menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCount {
    /// Item name as stored on the order line
    pub name: String,
    /// Units sold
    pub quantity: i64,
}

/// Units per item across `orders`, in the order items are first seen.
pub fn item_quantities<'a, I>(orders: I) -> Vec<ItemCount>
where
    I: IntoIterator<Item = &'a OrderWithItems>,
{
    let mut counts: Vec<ItemCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        for line in &order.items {
            let quantity = i64::from(line.quantity);
            if let Some(&at) = index.get(line.item.as_str()) {
                counts[at].quantity = counts[at].quantity.saturating_add(quantity);
            } else {
                index.insert(line.item.as_str(), counts.len());
                counts.push(ItemCount {
                    name: line.item.clone(),
                    quantity,
                });
            }
        }
    }
    counts
}

/// The `limit` best-selling items, most units first.
///
/// Equal quantities keep the order in which the items were first seen.
#[must_use]
pub fn popular_items(
    orders: &[OrderWithItems],
    window: Option<DateWindow>,
    limit: usize,
) -> Vec<ItemCount> {
    let in_range = orders
        .iter()
        .filter(|order| window.is_none_or(|w| w.contains_opt(order.record_date())));
    let mut counts = item_quantities(in_range);
    counts.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    counts.truncate(limit);
    counts
}
