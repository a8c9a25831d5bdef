//! Expense business logic - recording, querying, updating and deleting expenses.
//!
//! Most expenses carry one fixed category. A weekly expense instead spreads its
//! amount across several categories; each share is stored as a row in
//! `expense_allocations` and the expense amount is always the sum of the shares.
//! Amounts are cents and never negative.

use crate::{
    core::{calendar::DateWindow, check_amount},
    entities::{Expense, ExpenseAllocation, expense, expense_allocation},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::{debug, info, instrument, warn};

/// Expense categories. `Weekly` is the synthetic multi-category aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpenseCategory {
    /// Seri Ternak (meat supplier)
    SeriTernak,
    /// Balaji (grocer)
    Balaji,
    /// Wraps and bread
    Wraps,
    /// Flyers, ads and promotions
    Marketing,
    /// Anything else
    Other,
    /// A week's costs split over the fixed categories
    Weekly,
}

impl ExpenseCategory {
    /// Fixed categories in display order.
    pub const FIXED: [Self; 5] = [
        Self::SeriTernak,
        Self::Balaji,
        Self::Wraps,
        Self::Marketing,
        Self::Other,
    ];

    /// Value stored in the `category` column.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SeriTernak => "seri_ternak",
            Self::Balaji => "balaji",
            Self::Wraps => "wraps",
            Self::Marketing => "marketing",
            Self::Other => "other",
            Self::Weekly => "weekly_expense",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeriTernak => "Seri Ternak",
            Self::Balaji => "Balaji",
            Self::Wraps => "Wraps",
            Self::Marketing => "Marketing",
            Self::Other => "Other",
            Self::Weekly => "Weekly Expense",
        }
    }

    /// Whether this is one of the fixed categories.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        !matches!(self, Self::Weekly)
    }

    /// Finds a fixed category by its label, ignoring case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::FIXED
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    /// Accepts either the stored key or the label.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::FIXED
            .into_iter()
            .chain([Self::Weekly])
            .find(|c| c.key().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory {
                value: s.to_string(),
            })
    }
}

/// One category's share of a weekly expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Fixed category
    pub category: ExpenseCategory,
    /// Share in cents
    pub amount: i64,
}

/// Everything needed to record an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Category; `Weekly` requires `allocations`
    pub category: ExpenseCategory,
    /// Free-text description
    pub description: String,
    /// Amount in cents. Ignored for weekly expenses, whose amount is the allocation sum.
    pub amount: i64,
    /// Date the cost was incurred
    pub incurred_on: NaiveDate,
    /// Per-category shares; only used for weekly expenses
    pub allocations: Vec<Allocation>,
}

impl NewExpense {
    /// A single-category expense.
    #[must_use]
    pub fn fixed(
        category: ExpenseCategory,
        description: impl Into<String>,
        amount: i64,
        incurred_on: NaiveDate,
    ) -> Self {
        Self {
            category,
            description: description.into(),
            amount,
            incurred_on,
            allocations: Vec::new(),
        }
    }

    /// A weekly expense split over `allocations`.
    #[must_use]
    pub fn weekly(
        description: impl Into<String>,
        incurred_on: NaiveDate,
        allocations: Vec<Allocation>,
    ) -> Self {
        let amount = allocation_total(&allocations);
        Self {
            category: ExpenseCategory::Weekly,
            description: description.into(),
            amount,
            incurred_on,
            allocations,
        }
    }
}

/// Partial update of an expense. `None` leaves a field unchanged.
///
/// For weekly expenses the amount follows the allocations: `amount` is ignored and
/// supplying `allocations` replaces the stored shares.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    /// New category
    pub category: Option<ExpenseCategory>,
    /// New description
    pub description: Option<String>,
    /// New amount in cents (fixed categories only)
    pub amount: Option<i64>,
    /// New date incurred
    pub incurred_on: Option<NaiveDate>,
    /// Replacement shares (weekly expenses only)
    pub allocations: Option<Vec<Allocation>>,
}

/// An expense together with its allocations (empty for fixed categories).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseWithAllocations {
    /// The expense row
    pub expense: expense::Model,
    /// Its category shares
    pub allocations: Vec<expense_allocation::Model>,
}

impl ExpenseWithAllocations {
    /// Parsed category, `None` if the stored key is not recognised.
    #[must_use]
    pub fn category(&self) -> Option<ExpenseCategory> {
        self.expense.category.parse().ok()
    }

    /// The amount each fixed category receives from this expense.
    ///
    /// Weekly expenses use their stored allocations; weekly expenses recorded
    /// before allocations existed fall back to decoding their description.
    /// Unknown categories contribute nothing.
    #[must_use]
    pub fn category_amounts(&self) -> Vec<(ExpenseCategory, i64)> {
        match self.category() {
            Some(ExpenseCategory::Weekly) if self.allocations.is_empty() => {
                decode_weekly_description(&self.expense.description)
                    .into_iter()
                    .map(|a| (a.category, a.amount))
                    .collect()
            }
            Some(ExpenseCategory::Weekly) => self
                .allocations
                .iter()
                .filter_map(|row| {
                    let category = row.category.parse::<ExpenseCategory>().ok()?;
                    category.is_fixed().then_some((category, row.amount))
                })
                .collect(),
            Some(category) => vec![(category, self.expense.amount)],
            None => Vec::new(),
        }
    }
}

/// Decodes the legacy `"<Label>: RM<number>"` weekly expense text.
///
/// Segments may be separated by commas or whitespace. Labels are matched to fixed
/// categories ignoring case; numbers are ringgit and converted to cents.
/// Segments with an unknown label are dropped.
#[must_use]
pub fn decode_weekly_description(description: &str) -> Vec<Allocation> {
    const MARKER: &str = ": RM";

    let mut allocations = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = description[cursor..].find(MARKER) {
        let marker_at = cursor + offset;
        let label_start = description[cursor..marker_at]
            .rfind(':')
            .map_or(cursor, |colon| cursor + colon + 1);
        let label = &description[label_start..marker_at];

        let number_start = marker_at + MARKER.len();
        let number_len = ringgit_prefix_len(&description[number_start..]);
        if label.is_empty() || number_len == 0 {
            cursor = marker_at + 1;
            continue;
        }
        let number_end = number_start + number_len;
        cursor = number_end;

        let clean_label = label.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        let Some(category) = ExpenseCategory::from_label(clean_label) else {
            debug!(label = clean_label, "Dropping unrecognised weekly expense label");
            continue;
        };
        if let Ok(ringgit) = description[number_start..number_end].parse::<f64>() {
            allocations.push(Allocation {
                category,
                amount: ringgit_to_cents(ringgit),
            });
        }
    }

    allocations
}

/// Length of the leading `\d+(\.\d+)?` in `text`, 0 if none.
fn ringgit_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let whole = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if whole == 0 {
        return 0;
    }
    if bytes.get(whole) == Some(&b'.') {
        let fraction = bytes[whole + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if fraction > 0 {
            return whole + 1 + fraction;
        }
    }
    whole
}

/// Converts a ringgit value to cents, rounding to the nearest cent.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn ringgit_to_cents(ringgit: f64) -> i64 {
    (ringgit * 100.0).round() as i64
}

/// Renders allocations in the `"Label: RM<amount>"` form, e.g. for a description.
#[must_use]
pub fn encode_weekly_description(allocations: &[Allocation]) -> String {
    allocations
        .iter()
        .map(|a| {
            let whole = a.amount / 100;
            let cents = a.amount % 100;
            if cents == 0 {
                format!("{}: RM{whole}", a.category.label())
            } else {
                format!("{}: RM{whole}.{cents:02}", a.category.label())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_allocations(allocations: &[Allocation]) -> Result<()> {
    if allocations.is_empty() {
        return Err(Error::EmptyAllocation);
    }
    for allocation in allocations {
        if !allocation.category.is_fixed() {
            return Err(Error::UnknownCategory {
                value: allocation.category.key().to_string(),
            });
        }
        check_amount(allocation.amount)?;
    }
    check_amount(allocation_total(allocations))?;
    Ok(())
}

/// Sum of allocation amounts in cents, saturating at `i64::MAX`.
#[must_use]
pub fn allocation_total(allocations: &[Allocation]) -> i64 {
    allocations
        .iter()
        .map(|a| a.amount)
        .fold(0, i64::saturating_add)
}

async fn insert_allocations<C>(
    db: &C,
    expense_id: i64,
    allocations: &[Allocation],
) -> Result<Vec<expense_allocation::Model>>
where
    C: ConnectionTrait,
{
    let mut stored = Vec::with_capacity(allocations.len());
    for allocation in allocations {
        let model = expense_allocation::ActiveModel {
            expense_id: Set(expense_id),
            category: Set(allocation.category.key().to_string()),
            amount: Set(allocation.amount),
            ..Default::default()
        };
        stored.push(model.insert(db).await?);
    }
    Ok(stored)
}

async fn attach_allocations<C>(
    db: &C,
    expenses: Vec<expense::Model>,
) -> Result<Vec<ExpenseWithAllocations>>
where
    C: ConnectionTrait,
{
    if expenses.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = expenses.iter().map(|e| e.id).collect();
    let rows = ExpenseAllocation::find()
        .filter(expense_allocation::Column::ExpenseId.is_in(ids))
        .order_by_asc(expense_allocation::Column::Id)
        .all(db)
        .await?;

    let mut by_expense: HashMap<i64, Vec<expense_allocation::Model>> = HashMap::new();
    for row in rows {
        by_expense.entry(row.expense_id).or_default().push(row);
    }

    Ok(expenses
        .into_iter()
        .map(|expense| {
            let allocations = by_expense.remove(&expense.id).unwrap_or_default();
            ExpenseWithAllocations {
                expense,
                allocations,
            }
        })
        .collect())
}

async fn with_allocations<C>(db: &C, expense: expense::Model) -> Result<ExpenseWithAllocations>
where
    C: ConnectionTrait,
{
    let allocations = ExpenseAllocation::find()
        .filter(expense_allocation::Column::ExpenseId.eq(expense.id))
        .order_by_asc(expense_allocation::Column::Id)
        .all(db)
        .await?;
    Ok(ExpenseWithAllocations {
        expense,
        allocations,
    })
}

fn newest_first(select: Select<Expense>) -> Select<Expense> {
    select
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
}

/// Records an expense (and, for weekly expenses, its allocations) atomically.
///
/// # Errors
/// Returns an error if:
/// - The amount or any allocation is negative or above
///   [`MAX_AMOUNT`](crate::core::MAX_AMOUNT)
/// - A weekly expense has no allocations or nests another weekly allocation
/// - The database insert fails
#[instrument(skip(db, new_expense), fields(category = new_expense.category.key()))]
pub async fn create_expense(
    db: &DatabaseConnection,
    new_expense: NewExpense,
) -> Result<ExpenseWithAllocations> {
    let amount = if new_expense.category.is_fixed() {
        new_expense.amount
    } else {
        validate_allocations(&new_expense.allocations)?;
        allocation_total(&new_expense.allocations)
    };
    check_amount(amount)?;

    let now = Utc::now();
    let txn = db.begin().await?;

    let expense = expense::ActiveModel {
        category: Set(new_expense.category.key().to_string()),
        description: Set(new_expense.description.trim().to_string()),
        amount: Set(amount),
        incurred_on: Set(new_expense.incurred_on),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let allocations = if new_expense.category.is_fixed() {
        Vec::new()
    } else {
        insert_allocations(&txn, expense.id, &new_expense.allocations).await?
    };
    txn.commit().await?;

    info!(expense_id = expense.id, amount, "Expense recorded");
    Ok(ExpenseWithAllocations {
        expense,
        allocations,
    })
}

/// Retrieves all expenses, newest first.
#[instrument(skip(db))]
pub async fn get_all_expenses(db: &DatabaseConnection) -> Result<Vec<ExpenseWithAllocations>> {
    let expenses = newest_first(Expense::find()).all(db).await?;
    debug!("Loaded {} expenses", expenses.len());
    attach_allocations(db, expenses).await
}

/// Retrieves expenses recorded under `category`, newest first.
///
/// Weekly expenses are matched by their own category only, not by their shares.
#[instrument(skip(db))]
pub async fn get_expenses_by_category(
    db: &DatabaseConnection,
    category: ExpenseCategory,
) -> Result<Vec<ExpenseWithAllocations>> {
    let expenses = newest_first(Expense::find().filter(expense::Column::Category.eq(category.key())))
        .all(db)
        .await?;
    attach_allocations(db, expenses).await
}

/// Retrieves expenses incurred inside `window` (inclusive), newest first.
#[instrument(skip(db))]
pub async fn get_expenses_by_date_range(
    db: &DatabaseConnection,
    window: DateWindow,
) -> Result<Vec<ExpenseWithAllocations>> {
    let expenses = newest_first(
        Expense::find()
            .filter(expense::Column::IncurredOn.gte(window.from))
            .filter(expense::Column::IncurredOn.lte(window.to)),
    )
    .all(db)
    .await?;
    attach_allocations(db, expenses).await
}

/// Finds an expense by id, returning `None` if it doesn't exist.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<ExpenseWithAllocations>> {
    match Expense::find_by_id(expense_id).one(db).await? {
        Some(expense) => with_allocations(db, expense).await.map(Some),
        None => Ok(None),
    }
}

/// Applies a partial update to an expense.
///
/// Switching to a fixed category drops any stored allocations. Switching to
/// `Weekly` requires `allocations`.
#[instrument(skip(db, update))]
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    update: ExpenseUpdate,
) -> Result<ExpenseWithAllocations> {
    let txn = db.begin().await?;
    let existing = Expense::find_by_id(expense_id)
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let current: ExpenseCategory = existing.category.parse()?;
    let target = update.category.unwrap_or(current);
    let mut active_model: expense::ActiveModel = existing.clone().into();

    if target.is_fixed() {
        let amount = check_amount(update.amount.unwrap_or(existing.amount))?;
        ExpenseAllocation::delete_many()
            .filter(expense_allocation::Column::ExpenseId.eq(expense_id))
            .exec(&txn)
            .await?;
        active_model.amount = Set(amount);
    } else {
        match update.allocations {
            Some(allocations) => {
                validate_allocations(&allocations)?;
                ExpenseAllocation::delete_many()
                    .filter(expense_allocation::Column::ExpenseId.eq(expense_id))
                    .exec(&txn)
                    .await?;
                insert_allocations(&txn, expense_id, &allocations).await?;
                active_model.amount = Set(allocation_total(&allocations));
            }
            None if current.is_fixed() => return Err(Error::EmptyAllocation),
            None => {
                if update.amount.is_some() {
                    warn!(expense_id, "Ignoring amount change on a weekly expense");
                }
            }
        }
    }

    active_model.category = Set(target.key().to_string());
    if let Some(description) = update.description {
        active_model.description = Set(description.trim().to_string());
    }
    if let Some(incurred_on) = update.incurred_on {
        active_model.incurred_on = Set(incurred_on);
    }
    active_model.updated_at = Set(Utc::now());

    let updated = active_model.update(&txn).await?;
    let result = with_allocations(&txn, updated).await?;
    txn.commit().await?;

    debug!(expense_id, amount = result.expense.amount, "Expense updated");
    Ok(result)
}

/// Deletes an expense and its allocations.
///
/// # Errors
/// Returns [`Error::ExpenseNotFound`] if no expense has this id.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    ExpenseAllocation::delete_many()
        .filter(expense_allocation::Column::ExpenseId.eq(expense_id))
        .exec(&txn)
        .await?;
    let result = Expense::delete_by_id(expense_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }

    txn.commit().await?;
    info!(expense_id, "Expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::MAX_AMOUNT, test_utils::*};

    fn alloc(category: ExpenseCategory, amount: i64) -> Allocation {
        Allocation { category, amount }
    }

    #[test]
    fn test_decode_weekly_description() {
        let decoded = decode_weekly_description("Wraps: RM10, Marketing: RM5");
        assert_eq!(
            decoded,
            vec![
                alloc(ExpenseCategory::Wraps, 1000),
                alloc(ExpenseCategory::Marketing, 500)
            ]
        );
        assert_eq!(decoded.iter().map(|a| a.amount).sum::<i64>(), 1500);
    }

    #[test]
    fn test_decode_handles_spaces_case_and_decimals() {
        let decoded = decode_weekly_description("seri ternak: RM120.50 BALAJI: RM33.2 Other: RM1");
        assert_eq!(
            decoded,
            vec![
                alloc(ExpenseCategory::SeriTernak, 12_050),
                alloc(ExpenseCategory::Balaji, 3320),
                alloc(ExpenseCategory::Other, 100)
            ]
        );
    }

    #[test]
    fn test_decode_drops_unknown_and_malformed_segments() {
        let decoded = decode_weekly_description("Gas: RM40, Marketing: RM5, : RM9, Wraps RM3");
        assert_eq!(decoded, vec![alloc(ExpenseCategory::Marketing, 500)]);
        assert!(decode_weekly_description("Wraps: RMten").is_empty());
        assert!(decode_weekly_description("").is_empty());
        assert!(decode_weekly_description("bought wraps").is_empty());
    }

    #[test]
    fn test_encode_then_decode_weekly_description() {
        let allocations = vec![
            alloc(ExpenseCategory::Wraps, 1000),
            alloc(ExpenseCategory::SeriTernak, 2550),
        ];
        let text = encode_weekly_description(&allocations);
        assert_eq!(text, "Wraps: RM10, Seri Ternak: RM25.50");
        assert_eq!(decode_weekly_description(&text), allocations);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "weekly_expense".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Weekly
        );
        assert_eq!(
            "Seri Ternak".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::SeriTernak
        );
        assert!(matches!(
            "rent".parse::<ExpenseCategory>(),
            Err(Error::UnknownCategory { .. })
        ));
        assert_eq!(ExpenseCategory::from_label("weekly expense"), None);
    }

    #[tokio::test]
    async fn test_create_fixed_expense() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_expense(&db, ExpenseCategory::Wraps, 2500, ymd(2024, 6, 12)).await?;
        assert_eq!(created.expense.category, "wraps");
        assert_eq!(created.expense.amount, 2500);
        assert!(created.allocations.is_empty());
        assert_eq!(
            created.category_amounts(),
            vec![(ExpenseCategory::Wraps, 2500)]
        );

        let stored = get_expense_by_id(&db, created.expense.id).await?.unwrap();
        assert_eq!(stored, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_negative_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_test_expense(&db, ExpenseCategory::Other, -1, ymd(2024, 6, 12)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -1 })));
        assert!(get_all_expenses(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_expense_amounts_are_capped() -> Result<()> {
        let db = setup_test_db().await?;

        let at_limit =
            create_test_expense(&db, ExpenseCategory::Other, MAX_AMOUNT, ymd(2024, 6, 12)).await?;
        assert_eq!(at_limit.expense.amount, MAX_AMOUNT);

        // RM1e17 from a form saturates to i64::MAX cents and must not be stored
        let huge = create_test_expense(
            &db,
            ExpenseCategory::Other,
            ringgit_to_cents(1e17),
            ymd(2024, 6, 12),
        )
        .await;
        assert!(matches!(
            huge,
            Err(Error::AmountTooLarge { amount: i64::MAX, max: MAX_AMOUNT })
        ));

        // Each share is within bounds, their sum is not
        let weekly = create_expense(
            &db,
            NewExpense::weekly(
                "Week 24",
                ymd(2024, 6, 10),
                vec![
                    alloc(ExpenseCategory::Wraps, MAX_AMOUNT),
                    alloc(ExpenseCategory::Balaji, 1),
                ],
            ),
        )
        .await;
        assert!(matches!(weekly, Err(Error::AmountTooLarge { .. })));

        let raised = update_expense(
            &db,
            at_limit.expense.id,
            ExpenseUpdate {
                amount: Some(MAX_AMOUNT + 1),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(raised, Err(Error::AmountTooLarge { .. })));

        let all = get_all_expenses(&db).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].expense.amount, MAX_AMOUNT);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_weekly_expense_stores_allocations() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_expense(
            &db,
            NewExpense::weekly(
                "Week 24",
                ymd(2024, 6, 10),
                vec![
                    alloc(ExpenseCategory::Wraps, 1000),
                    alloc(ExpenseCategory::Marketing, 500),
                ],
            ),
        )
        .await?;

        assert_eq!(created.expense.category, "weekly_expense");
        assert_eq!(created.expense.amount, 1500);
        assert_eq!(created.allocations.len(), 2);
        assert_eq!(
            created.category_amounts(),
            vec![
                (ExpenseCategory::Wraps, 1000),
                (ExpenseCategory::Marketing, 500)
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_expense_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let empty = create_expense(&db, NewExpense::weekly("Nothing", ymd(2024, 6, 10), vec![])).await;
        assert!(matches!(empty, Err(Error::EmptyAllocation)));

        let nested = create_expense(
            &db,
            NewExpense::weekly(
                "Nested",
                ymd(2024, 6, 10),
                vec![alloc(ExpenseCategory::Weekly, 100)],
            ),
        )
        .await;
        assert!(matches!(nested, Err(Error::UnknownCategory { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_legacy_weekly_expense_decodes_description() -> Result<()> {
        let db = setup_test_db().await?;

        // A weekly row written without allocation rows, as older data was
        let now = Utc::now();
        let legacy = expense::ActiveModel {
            category: Set("weekly_expense".to_string()),
            description: Set("Wraps: RM10, Marketing: RM5".to_string()),
            amount: Set(1500),
            incurred_on: Set(ymd(2024, 6, 10)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let stored = get_expense_by_id(&db, legacy.id).await?.unwrap();
        assert!(stored.allocations.is_empty());
        assert_eq!(
            stored.category_amounts(),
            vec![
                (ExpenseCategory::Wraps, 1000),
                (ExpenseCategory::Marketing, 500)
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_filters_by_category_and_date() -> Result<()> {
        let db = setup_test_db().await?;
        let wraps = create_test_expense(&db, ExpenseCategory::Wraps, 1000, ymd(2024, 6, 10)).await?;
        create_test_expense(&db, ExpenseCategory::Balaji, 2000, ymd(2024, 6, 17)).await?;

        let by_category = get_expenses_by_category(&db, ExpenseCategory::Wraps).await?;
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0], wraps);

        let by_date =
            get_expenses_by_date_range(&db, DateWindow::new(ymd(2024, 6, 10), ymd(2024, 6, 16))).await?;
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].expense.id, wraps.expense.id);

        let all = get_all_expenses(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].expense.id, wraps.expense.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_fixed_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, ExpenseCategory::Wraps, 1000, ymd(2024, 6, 10)).await?;

        let updated = update_expense(
            &db,
            created.expense.id,
            ExpenseUpdate {
                category: Some(ExpenseCategory::Marketing),
                description: Some("Flyers".to_string()),
                amount: Some(1800),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.expense.category, "marketing");
        assert_eq!(updated.expense.description, "Flyers");
        assert_eq!(updated.expense.amount, 1800);
        assert_eq!(updated.expense.incurred_on, ymd(2024, 6, 10));

        let negative = update_expense(
            &db,
            created.expense.id,
            ExpenseUpdate {
                amount: Some(-10),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(negative, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_between_fixed_and_weekly() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_expense(&db, ExpenseCategory::Wraps, 1000, ymd(2024, 6, 10)).await?;

        let missing_allocations = update_expense(
            &db,
            created.expense.id,
            ExpenseUpdate {
                category: Some(ExpenseCategory::Weekly),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(missing_allocations, Err(Error::EmptyAllocation)));

        let weekly = update_expense(
            &db,
            created.expense.id,
            ExpenseUpdate {
                category: Some(ExpenseCategory::Weekly),
                allocations: Some(vec![
                    alloc(ExpenseCategory::Wraps, 700),
                    alloc(ExpenseCategory::Other, 300),
                ]),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(weekly.expense.amount, 1000);
        assert_eq!(weekly.allocations.len(), 2);

        let fixed_again = update_expense(
            &db,
            created.expense.id,
            ExpenseUpdate {
                category: Some(ExpenseCategory::Other),
                ..Default::default()
            },
        )
        .await?;
        assert!(fixed_again.allocations.is_empty());
        assert!(ExpenseAllocation::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_expense(
            &db,
            NewExpense::weekly(
                "Week",
                ymd(2024, 6, 10),
                vec![alloc(ExpenseCategory::Wraps, 1000)],
            ),
        )
        .await?;

        delete_expense(&db, created.expense.id).await?;
        assert!(get_expense_by_id(&db, created.expense.id).await?.is_none());
        assert!(ExpenseAllocation::find().all(&db).await?.is_empty());

        let again = delete_expense(&db, created.expense.id).await;
        assert!(matches!(again, Err(Error::ExpenseNotFound { .. })));
        Ok(())
    }
}
