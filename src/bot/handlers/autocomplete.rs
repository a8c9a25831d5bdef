//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! menu item names and expense categories, improving the user experience by
//! suggesting valid options as the user types.

use crate::{
    bot::BotData,
    core::{expense::ExpenseCategory, menu},
    errors::Error,
};

// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Keeps the candidates containing `partial`, ignoring case.
fn matching<'a>(candidates: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Provides autocomplete suggestions for menu item names.
///
/// Only active items are suggested, in menu order.
///
/// # Arguments
/// * `ctx` - The poise context holding the configured menu
/// * `partial` - The partial string the user has typed so far
#[allow(clippy::unused_async)]
pub async fn autocomplete_menu_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(menu::active_names(&ctx.data().config.menu), partial)
}

/// Provides autocomplete suggestions for fixed expense categories.
#[allow(clippy::unused_async)]
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    category_suggestions(partial)
}

fn category_suggestions(partial: &str) -> Vec<String> {
    matching(ExpenseCategory::FIXED.iter().map(|c| c.label()), partial)
}
