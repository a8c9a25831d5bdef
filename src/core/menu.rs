//! Menu reference data.
//!
//! Menu items come from configuration and are never persisted. They supply the
//! default unit price when an item is put on an order.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable identifier (e.g., `"chicken-shawarma"`)
    pub id: String,
    /// Display name, also stored on order lines
    pub name: String,
    /// Default unit price in cents
    pub default_price: i64,
    /// Grouping for display (e.g., `"shawarma"`, `"drink"`)
    pub category: String,
    /// Inactive items stay on file but cannot be ordered
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Looks up an active menu item by name, ignoring case and surrounding whitespace.
#[must_use]
pub fn find_active<'a>(menu: &'a [MenuItem], name: &str) -> Option<&'a MenuItem> {
    let wanted = name.trim();
    menu.iter()
        .filter(|item| item.is_active)
        .find(|item| item.name.eq_ignore_ascii_case(wanted))
}

/// Like [`find_active`] but reports a missing item as [`Error::UnknownMenuItem`].
pub fn require_active<'a>(menu: &'a [MenuItem], name: &str) -> Result<&'a MenuItem> {
    find_active(menu, name).ok_or_else(|| Error::UnknownMenuItem {
        name: name.trim().to_string(),
    })
}

/// Names of active items, in menu order.
#[must_use]
pub fn active_names(menu: &[MenuItem]) -> Vec<&str> {
    menu.iter()
        .filter(|item| item.is_active)
        .map(|item| item.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem {
                id: "chicken".to_string(),
                name: "Chicken Shawarma".to_string(),
                default_price: 800,
                category: "shawarma".to_string(),
                is_active: true,
            },
            MenuItem {
                id: "lamb".to_string(),
                name: "Lamb Shawarma".to_string(),
                default_price: 1400,
                category: "shawarma".to_string(),
                is_active: false,
            },
        ]
    }

    #[test]
    fn test_find_active_ignores_case() {
        let menu = menu();
        let item = find_active(&menu, "  chicken SHAWARMA ").unwrap();
        assert_eq!(item.default_price, 800);
    }

    #[test]
    fn test_inactive_items_are_hidden() {
        let menu = menu();
        assert!(find_active(&menu, "Lamb Shawarma").is_none());
        assert!(matches!(
            require_active(&menu, "Lamb Shawarma"),
            Err(Error::UnknownMenuItem { name }) if name == "Lamb Shawarma"
        ));
        assert_eq!(active_names(&menu), vec!["Chicken Shawarma"]);
    }
}
