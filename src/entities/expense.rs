//! Expense entity - An outgoing cost.
//!
//! Each expense has a category key, description, amount in cents and the date it
//! was incurred. Expenses in the synthetic `weekly_expense` category spread their
//! amount over several categories through `expense_allocations`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category key (e.g., `"wraps"`, `"marketing"`, `"weekly_expense"`)
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// Amount in cents, never negative
    pub amount: i64,
    /// Date the cost was incurred
    pub incurred_on: Date,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A weekly expense has many category allocations
    #[sea_orm(has_many = "super::expense_allocation::Entity")]
    Allocations,
}

impl Related<super::expense_allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
