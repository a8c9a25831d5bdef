//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Expense recording commands
pub mod expense;

/// General utility commands
pub mod general;

/// Order taking and management commands
pub mod order;

/// Dashboard and weekly report commands
pub mod report;

// Export commands
pub use expense::*;
pub use general::*;
pub use order::*;
pub use report::*;
