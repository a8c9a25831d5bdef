//! Unified error type for the ledger.
//!
//! Store failures, validation failures and framework failures all collapse into
//! [`Error`]; callers that only need a message use its `Display` output.

use thiserror::Error;

/// All failures the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or was invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The record store rejected or failed an operation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No order with this id exists
    #[error("Order #{id} not found")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// No expense with this id exists
    #[error("Expense #{id} not found")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// The order has been completed and can no longer change
    #[error("Order #{id} is already completed")]
    OrderAlreadyCompleted {
        /// Order id
        id: i64,
    },

    /// An order needs at least one line item
    #[error("An order needs at least one item")]
    EmptyOrder,

    /// Line item quantity below one
    #[error("Invalid quantity {quantity} for '{item}': must be at least 1")]
    InvalidQuantity {
        /// Item name
        item: String,
        /// Offending quantity
        quantity: i32,
    },

    /// Negative money amount (cents)
    #[error("Invalid amount: {amount} (must not be negative)")]
    InvalidAmount {
        /// Offending amount in cents
        amount: i64,
    },

    /// Money amount (cents) above the largest one the ledger accepts
    #[error("Invalid amount: {amount} (must not exceed {max})")]
    AmountTooLarge {
        /// Offending amount in cents
        amount: i64,
        /// Largest accepted amount in cents
        max: i64,
    },

    /// The item is not on the menu or is not active
    #[error("Menu item '{name}' is not available")]
    UnknownMenuItem {
        /// Requested item name
        name: String,
    },

    /// Stored or supplied category key is not recognised
    #[error("Unknown expense category '{value}'")]
    UnknownCategory {
        /// Raw category text
        value: String,
    },

    /// Stored or supplied status is not recognised
    #[error("Unknown order status '{value}'")]
    UnknownStatus {
        /// Raw status text
        value: String,
    },

    /// A weekly expense must carry at least one category allocation
    #[error("A weekly expense needs at least one category amount")]
    EmptyAllocation,

    /// I/O failure (config file, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer did not fit the target type
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Discord / poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
