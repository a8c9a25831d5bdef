/// Database configuration and connection management
pub mod database;

/// Business settings and menu loading from config.toml
pub mod business;
