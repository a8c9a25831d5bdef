//! Business settings and menu loading from config.toml
//!
//! The stall's operating days, weekly expense budget, report sizes and the menu
//! are read from a TOML file. Every field has a default so a partial file, or no
//! file at all, still yields a usable configuration.

use crate::core::{calendar::OperatingDays, menu::MenuItem};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reporting and calendar settings
    #[serde(default)]
    pub business: BusinessConfig,
    /// Items that can be put on an order
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuItem>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            business: BusinessConfig::default(),
            menu: default_menu(),
        }
    }
}

/// Settings consumed by the aggregation functions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    /// Weekdays whose sales count in weekly summaries
    pub operating_days: OperatingDays,
    /// Weekly expense budget in cents
    pub weekly_budget: i64,
    /// How many entries the popular items ranking shows
    pub popular_items_limit: usize,
    /// Trailing window, in days, for average daily sales
    pub average_daily_window: i64,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            operating_days: OperatingDays::default(),
            weekly_budget: 40_000,
            popular_items_limit: 6,
            average_daily_window: 7,
        }
    }
}

fn default_menu() -> Vec<MenuItem> {
    [
        ("chicken-shawarma", "Chicken Shawarma", 800, "shawarma"),
        ("beef-shawarma", "Beef Shawarma", 1000, "shawarma"),
        ("mixed-shawarma", "Mixed Shawarma", 1200, "shawarma"),
        ("shawarma-plate", "Shawarma Plate", 1500, "plate"),
        ("fries", "Fries", 500, "side"),
        ("soft-drink", "Soft Drink", 300, "drink"),
    ]
    .into_iter()
    .map(|(id, name, default_price, category)| MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        default_price,
        category: category.to_string(),
        is_active: true,
    })
    .collect()
}

/// Parses a configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.business.average_daily_window <= 0 {
        return Err(Error::Config {
            message: "average_daily_window must be at least 1 day".to_string(),
        });
    }
    if config.business.weekly_budget < 0 {
        return Err(Error::InvalidAmount {
            amount: config.business.weekly_budget,
        });
    }

    Ok(config)
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A setting is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Loads configuration from the default location (./config.toml).
///
/// A missing file is not an error: the built-in defaults are used instead.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        warn!("config.toml not found, using built-in defaults");
        return Ok(Config::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [business]
            operating_days = ["Thu", "Fri"]
            weekly_budget = 25000
            popular_items_limit = 3
            average_daily_window = 14

            [[menu]]
            id = "chicken"
            name = "Chicken Shawarma"
            default_price = 850
            category = "shawarma"

            [[menu]]
            id = "old-special"
            name = "Old Special"
            default_price = 1200
            category = "shawarma"
            is_active = false
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(
            config.business.operating_days.days(),
            &[Weekday::Thu, Weekday::Fri]
        );
        assert_eq!(config.business.weekly_budget, 25_000);
        assert_eq!(config.business.popular_items_limit, 3);
        assert_eq!(config.business.average_daily_window, 14);
        assert_eq!(config.menu.len(), 2);
        assert!(config.menu[0].is_active);
        assert!(!config.menu[1].is_active);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(
            config.business.operating_days.days(),
            &[Weekday::Fri, Weekday::Sat]
        );
        assert_eq!(config.business.weekly_budget, 40_000);
        assert_eq!(config.business.popular_items_limit, 6);
        assert!(!config.menu.is_empty());
    }

    #[test]
    fn test_parse_rejects_zero_window() {
        let result = parse_config("[business]\naverage_daily_window = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_parse_rejects_negative_budget() {
        let result = parse_config("[business]\nweekly_budget = -1\n");
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -1 })));
    }

    #[test]
    fn test_parse_rejects_bad_weekday() {
        let result = parse_config("[business]\noperating_days = [\"Funday\"]\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
