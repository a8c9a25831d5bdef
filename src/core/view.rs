//! Dashboard view state.
//!
//! [`DashboardState`] is what a front end holds between interactions: the
//! selected week, which orders are expanded, the order being drafted, the
//! quick-add expense form and the cached records. Mutations go through the
//! data-access functions and patch the cache on success; failures are kept as
//! text in [`DashboardState::error`] and leave the cache untouched.
//!
//! Form inputs arrive as raw text and are coerced: a number that does not parse
//! becomes 0 and a date that does not parse becomes the reference date.

use crate::{
    config::business::Config,
    core::{
        breakdown::{self, CategoryTotal, ItemCount},
        calendar::{
            self, DateWindow, RangePreset, parse_date_or, preset_window, week_window,
        },
        expense::{self, Allocation, ExpenseCategory, ExpenseWithAllocations, NewExpense},
        menu::{self, MenuItem},
        metrics::{self, AllTimeTotals, DashboardMetrics},
        order::{self, NewLineItem, NewOrder, OrderWithItems},
        weekly::{self, WeeklyExpenseComparison, WeeklySalesSummary},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use tracing::{debug, error};

/// Parses a ringgit amount ("12.50") into cents; anything unparseable is 0.
#[must_use]
pub fn parse_amount_or_zero(input: &str) -> i64 {
    input
        .trim()
        .trim_start_matches("RM")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map_or(0, expense::ringgit_to_cents)
}

/// Parses a whole number of units; anything unparseable is 0.
#[must_use]
pub fn parse_quantity_or_zero(input: &str) -> i32 {
    input.trim().parse().unwrap_or(0)
}

/// An order being put together before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Sale date
    pub date: NaiveDate,
    /// Customer note
    pub customer_description: String,
    /// Lines added so far
    pub items: Vec<NewLineItem>,
    /// Menu item picked in the selector
    pub selected_item: String,
    /// Quantity typed next to the selector
    pub quantity: i32,
}

impl OrderDraft {
    /// An empty draft dated `date` with quantity 1.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            customer_description: String::new(),
            items: Vec::new(),
            selected_item: String::new(),
            quantity: 1,
        }
    }

    /// Sets the quantity from form text.
    pub fn set_quantity_input(&mut self, input: &str) {
        self.quantity = parse_quantity_or_zero(input);
    }

    /// Sets the date from form text, falling back to `reference`.
    pub fn set_date_input(&mut self, input: &str, reference: NaiveDate) {
        self.date = parse_date_or(input, reference);
    }

    /// Adds the selected item at its menu price.
    ///
    /// Does nothing and returns `false` when the quantity is below 1 or the item
    /// is not an active menu item.
    pub fn add_item(&mut self, menu: &[MenuItem]) -> bool {
        if self.quantity < 1 {
            return false;
        }
        let Some(menu_item) = menu::find_active(menu, &self.selected_item) else {
            return false;
        };
        self.items.push(NewLineItem::from_menu(menu_item, self.quantity));
        true
    }

    /// Removes the line at `index`, if there is one.
    pub fn remove_item(&mut self, index: usize) -> Option<NewLineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Running total in cents.
    #[must_use]
    pub fn total(&self) -> i64 {
        order::order_total(&self.items)
    }

    fn to_new_order(&self) -> NewOrder {
        NewOrder {
            date: self.date,
            customer_description: self.customer_description.clone(),
            items: self.items.clone(),
        }
    }
}

/// Raw inputs of the quick-add expense form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseFields {
    /// Selected category
    pub category: ExpenseCategory,
    /// Description text
    pub description: String,
    /// Amount text in ringgit (fixed categories)
    pub amount: String,
    /// Date text, `YYYY-MM-DD`
    pub date: String,
    /// Amount text per category (weekly expenses)
    pub allocations: Vec<(ExpenseCategory, String)>,
}

impl Default for ExpenseFields {
    fn default() -> Self {
        Self {
            category: ExpenseCategory::Other,
            description: String::new(),
            amount: String::new(),
            date: String::new(),
            allocations: Vec::new(),
        }
    }
}

impl ExpenseFields {
    fn to_new_expense(&self, reference: NaiveDate) -> NewExpense {
        let incurred_on = parse_date_or(&self.date, reference);
        if self.category.is_fixed() {
            NewExpense::fixed(
                self.category,
                self.description.clone(),
                parse_amount_or_zero(&self.amount),
                incurred_on,
            )
        } else {
            let allocations = self
                .allocations
                .iter()
                .map(|(category, text)| Allocation {
                    category: *category,
                    amount: parse_amount_or_zero(text),
                })
                .filter(|share| share.amount > 0)
                .collect();
            NewExpense::weekly(self.description.clone(), incurred_on, allocations)
        }
    }
}

/// Quick-add expense form: `Idle -> Editing -> Idle` on submit or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpenseForm {
    /// Closed
    #[default]
    Idle,
    /// Open with the current inputs
    Editing(ExpenseFields),
}

impl ExpenseForm {
    /// Opens the form with empty inputs. An open form keeps its inputs.
    pub fn open(&mut self) {
        if matches!(self, Self::Idle) {
            *self = Self::Editing(ExpenseFields::default());
        }
    }

    /// Closes the form, discarding its inputs.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Whether the form is open.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Mutable access to the inputs while editing.
    pub fn fields_mut(&mut self) -> Option<&mut ExpenseFields> {
        match self {
            Self::Editing(fields) => Some(fields),
            Self::Idle => None,
        }
    }

    /// The expense the current inputs describe; `None` while idle.
    #[must_use]
    pub fn submission(&self, reference: NaiveDate) -> Option<NewExpense> {
        match self {
            Self::Editing(fields) => Some(fields.to_new_expense(reference)),
            Self::Idle => None,
        }
    }
}

/// Every aggregate the dashboard renders, recomputed from the caches.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    /// Range the headline figures cover; `None` is all time
    pub range: Option<DateWindow>,
    /// Headline metrics over the selected range with today's trends
    pub metrics: DashboardMetrics,
    /// Lifetime sales figures
    pub all_time: AllTimeTotals,
    /// Operating-day sales for the selected week
    pub weekly_sales: WeeklySalesSummary,
    /// Selected week's spending against the previous week and budget
    pub weekly_expenses: WeeklyExpenseComparison,
    /// Spending per category over the selected range
    pub category_breakdown: Vec<CategoryTotal>,
    /// Best-selling items over the selected range
    pub popular_items: Vec<ItemCount>,
    /// Orders still pending
    pub pending_orders: usize,
}

/// State held by a dashboard between interactions.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Selected Monday-Sunday week
    pub selected_week: DateWindow,
    /// Range for headline metrics, breakdown and popular items; `None` is all time
    pub range: Option<DateWindow>,
    /// Orders whose lines are shown
    pub expanded_orders: HashSet<i64>,
    /// Whether the new-order form is shown
    pub order_form_open: bool,
    /// Order being drafted
    pub draft: OrderDraft,
    /// Quick-add expense form
    pub expense_form: ExpenseForm,
    /// Cached orders, newest first
    pub orders: Vec<OrderWithItems>,
    /// Cached expenses, newest first
    pub expenses: Vec<ExpenseWithAllocations>,
    /// A load is in progress
    pub loading: bool,
    /// Text of the last failure; cleared by the next success
    pub error: Option<String>,
}

impl DashboardState {
    /// Empty state with `today`'s week selected.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_week: week_window(today),
            range: None,
            expanded_orders: HashSet::new(),
            order_form_open: false,
            draft: OrderDraft::new(today),
            expense_form: ExpenseForm::Idle,
            orders: Vec::new(),
            expenses: Vec::new(),
            loading: false,
            error: None,
        }
    }

    // Clears the error on success; records and logs it on failure.
    fn settle<T>(&mut self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(e) => {
                error!("Failed to {action}: {e}");
                self.error = Some(format!("Failed to {action}: {e}"));
                None
            }
        }
    }

    /// Reloads orders and expenses. On failure the previous caches are kept.
    pub async fn load(&mut self, db: &DatabaseConnection) -> bool {
        self.loading = true;
        let result = async {
            let orders = order::get_all_orders(db).await?;
            let expenses = expense::get_all_expenses(db).await?;
            Ok::<_, Error>((orders, expenses))
        }
        .await;
        self.loading = false;

        match self.settle("load dashboard data", result) {
            Some((orders, expenses)) => {
                debug!(orders = orders.len(), expenses = expenses.len(), "Dashboard loaded");
                self.orders = orders;
                self.expenses = expenses;
                true
            }
            None => false,
        }
    }

    /// Selects the week before the current selection.
    pub fn previous_week(&mut self) {
        self.selected_week = calendar::previous_week(self.selected_week);
    }

    /// Selects the week after the current selection.
    pub fn next_week(&mut self) {
        self.selected_week = calendar::next_week(self.selected_week);
    }

    /// Selects the week `weeks` weeks before the one containing `today`.
    ///
    /// Returns `false` and keeps the selection when that week is out of range.
    pub fn select_weeks_back(&mut self, today: NaiveDate, weeks: u32) -> bool {
        match calendar::weeks_back(today, weeks) {
            Some(week) => {
                self.selected_week = week;
                true
            }
            None => false,
        }
    }

    /// Sets the headline range from a preset; `None` selects all time.
    pub fn select_range(&mut self, preset: Option<RangePreset>, today: NaiveDate) {
        self.range = preset.map(|preset| preset_window(preset, today));
    }

    /// Selects the week containing `today`.
    pub fn current_week(&mut self, today: NaiveDate) {
        self.selected_week = week_window(today);
    }

    /// Expands or collapses an order; returns whether it is now expanded.
    pub fn toggle_order_expanded(&mut self, order_id: i64) -> bool {
        if self.expanded_orders.remove(&order_id) {
            false
        } else {
            self.expanded_orders.insert(order_id);
            true
        }
    }

    /// Stores the draft as a new order. On success the draft is reset and the
    /// form closed.
    pub async fn submit_order(&mut self, db: &DatabaseConnection) -> bool {
        let result = order::create_order(db, self.draft.to_new_order()).await;
        match self.settle("create order", result) {
            Some(created) => {
                self.draft = OrderDraft::new(self.draft.date);
                self.order_form_open = false;
                self.orders.insert(0, created);
                true
            }
            None => false,
        }
    }

    fn replace_order(&mut self, updated: OrderWithItems) {
        if let Some(slot) = self.orders.iter_mut().find(|o| o.order.id == updated.order.id) {
            *slot = updated;
        }
    }

    /// Marks an order completed.
    pub async fn complete_order(&mut self, db: &DatabaseConnection, order_id: i64) -> bool {
        let result = order::complete_order(db, order_id).await;
        self.settle("complete order", result)
            .map(|updated| self.replace_order(updated))
            .is_some()
    }

    /// Adds an item to a pending order at its menu price.
    pub async fn add_item_to_order(
        &mut self,
        db: &DatabaseConnection,
        menu: &[MenuItem],
        order_id: i64,
        item: &str,
        quantity: i32,
    ) -> bool {
        let result = match menu::require_active(menu, item) {
            Ok(menu_item) => {
                order::add_item_to_order(db, order_id, NewLineItem::from_menu(menu_item, quantity))
                    .await
            }
            Err(e) => Err(e),
        };
        self.settle("add item", result)
            .map(|updated| self.replace_order(updated))
            .is_some()
    }

    /// Deletes an order.
    pub async fn delete_order(&mut self, db: &DatabaseConnection, order_id: i64) -> bool {
        let result = order::delete_order(db, order_id).await;
        if self.settle("delete order", result).is_none() {
            return false;
        }
        self.orders.retain(|o| o.order.id != order_id);
        self.expanded_orders.remove(&order_id);
        true
    }

    /// Submits the quick-add expense form. Does nothing while the form is idle;
    /// on success the form returns to idle.
    pub async fn submit_expense(&mut self, db: &DatabaseConnection, reference: NaiveDate) -> bool {
        let Some(new_expense) = self.expense_form.submission(reference) else {
            return false;
        };
        let result = expense::create_expense(db, new_expense).await;
        match self.settle("record expense", result) {
            Some(created) => {
                self.expense_form = ExpenseForm::Idle;
                self.expenses.insert(0, created);
                true
            }
            None => false,
        }
    }

    /// Deletes an expense.
    pub async fn delete_expense(&mut self, db: &DatabaseConnection, expense_id: i64) -> bool {
        let result = expense::delete_expense(db, expense_id).await;
        if self.settle("delete expense", result).is_none() {
            return false;
        }
        self.expenses.retain(|e| e.expense.id != expense_id);
        true
    }

    /// Recomputes every aggregate from the cached records.
    #[must_use]
    pub fn snapshot(&self, config: &Config, today: NaiveDate) -> DashboardSnapshot {
        let business = &config.business;
        DashboardSnapshot {
            range: self.range,
            metrics: metrics::dashboard_metrics(
                &self.orders,
                &self.expenses,
                self.range,
                business,
                today,
            ),
            all_time: metrics::all_time_totals(&self.orders),
            weekly_sales: weekly::weekly_sales_summary(
                &self.orders,
                &business.operating_days,
                self.selected_week,
            ),
            weekly_expenses: weekly::weekly_expense_comparison(
                &self.expenses,
                self.selected_week,
                business.weekly_budget,
            ),
            category_breakdown: breakdown::category_breakdown(&self.expenses, self.range),
            popular_items: breakdown::popular_items(
                &self.orders,
                self.range,
                business.popular_items_limit,
            ),
            pending_orders: self.orders.iter().filter(|o| !o.is_completed()).count(),
        }
    }
}
