//! Order entity - A single customer transaction at the stall.
//!
//! The order row carries the sale date, a free-text customer note, the computed
//! total in cents and a status (`PENDING` or `COMPLETED`). Line items live in
//! the `order_items` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar date the sale belongs to
    pub date: Date,
    /// Free-text note identifying the customer (e.g., "red shirt, table 2")
    pub customer_description: String,
    /// Sum of all line totals in cents
    pub order_total: i64,
    /// `"PENDING"` or `"COMPLETED"`
    pub status: String,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
