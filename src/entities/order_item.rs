//! Order item entity - One line of an order.
//!
//! `line_total` is stored denormalised as `quantity * unit_price` so reports never
//! need to recompute it.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the order this line belongs to
    pub order_id: i64,
    /// Position of the line within its order, starting at 0
    pub position: i32,
    /// Menu item name
    pub item: String,
    /// Number of units, at least 1
    pub quantity: i32,
    /// Price per unit in cents
    pub unit_price: i64,
    /// `quantity * unit_price` in cents
    pub line_total: i64,
}

/// Defines relationships between `OrderItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
