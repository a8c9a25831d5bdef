//! Expense allocation entity - The per-category share of a weekly expense.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense allocation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_allocations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the weekly expense this share belongs to
    pub expense_id: i64,
    /// Fixed category key (never `"weekly_expense"`)
    pub category: String,
    /// Share of the expense in cents
    pub amount: i64,
}

/// Defines relationships between `ExpenseAllocation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation belongs to one expense
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
