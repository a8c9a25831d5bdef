//! Reporting Discord commands - dashboard, weekly summaries and popular items.
//!
//! Each command loads a fresh [`DashboardState`](crate::core::view::DashboardState),
//! selects the requested week or range and renders from its snapshot.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            breakdown,
            calendar::{DateWindow, RangePreset, parse_date_or, today},
            report,
            view::{DashboardSnapshot, DashboardState},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Furthest back `weeks_back` may reach (about ten years).
    const MAX_WEEKS_BACK: u32 = 520;

    /// Headline range offered by `/dashboard`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum DashboardRange {
        #[name = "today"]
        Today,
        #[name = "this week"]
        Week,
        #[name = "this month"]
        Month,
        #[name = "all time"]
        AllTime,
    }

    impl DashboardRange {
        const fn preset(self) -> Option<RangePreset> {
            match self {
                Self::Today => Some(RangePreset::Today),
                Self::Week => Some(RangePreset::Week),
                Self::Month => Some(RangePreset::Month),
                Self::AllTime => None,
            }
        }
    }

    /// Loads the dashboard state for the week `weeks_back` weeks ago with the
    /// headline figures limited to `range`.
    ///
    /// A failed load or an out-of-range week is reported to the user and yields `None`.
    async fn load_snapshot(
        ctx: poise::Context<'_, BotData, Error>,
        weeks_back: u32,
        range: Option<RangePreset>,
    ) -> Result<Option<DashboardSnapshot>> {
        let data = ctx.data();
        let reference = today();
        let mut state = DashboardState::new(reference);

        if weeks_back > MAX_WEEKS_BACK || !state.select_weeks_back(reference, weeks_back) {
            ctx.say(format!(
                "❌ `weeks_back` must be between 0 and {MAX_WEEKS_BACK}."
            ))
            .await?;
            return Ok(None);
        }
        state.select_range(range, reference);

        if !state.load(&data.database).await {
            ctx.say("❌ Could not load the ledger right now. Please try again.")
                .await?;
            return Ok(None);
        }
        Ok(Some(state.snapshot(&data.config, reference)))
    }

    /// Shows sales, expenses, profit and today's trends.
    ///
    /// `from` and `to` together pick a custom range and take precedence over `range`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Period for the headline figures (defaults to all time)"] range: Option<
            DashboardRange,
        >,
        #[description = "Custom range start (YYYY-MM-DD)"] from: Option<String>,
        #[description = "Custom range end (YYYY-MM-DD)"] to: Option<String>,
    ) -> Result<()> {
        let reference = today();
        let preset = match (from, to) {
            (Some(from), Some(to)) => Some(RangePreset::Custom(DateWindow::new(
                parse_date_or(&from, reference),
                parse_date_or(&to, reference),
            ))),
            _ => range.and_then(DashboardRange::preset),
        };

        let Some(snapshot) = load_snapshot(ctx, 0, preset).await? else {
            return Ok(());
        };

        let period = snapshot.range.map_or_else(
            || "All time".to_string(),
            |window| format!("{} to {}", window.from, window.to),
        );

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 Shawarma Ledger Dashboard ({period})"))
            .description(report::format_dashboard(&snapshot.metrics))
            .field(
                "This week",
                format!(
                    "Sales {} | Spent {}",
                    report::format_currency(snapshot.weekly_sales.total),
                    report::format_currency(snapshot.weekly_expenses.total)
                ),
                false,
            )
            .field(
                "Top items",
                report::format_popular_items(&snapshot.popular_items),
                true,
            )
            .field(
                "Expenses by category",
                report::format_category_totals(&snapshot.category_breakdown),
                true,
            )
            .color(0x0034_98DB) // Blue color
            .footer(serenity::CreateEmbedFooter::new(format!(
                "As of {} | {} pending order{}",
                today(),
                snapshot.pending_orders,
                if snapshot.pending_orders == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows sales on each operating day compared with the week before.
    #[poise::command(slash_command, prefix_command)]
    pub async fn weekly_sales(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many weeks back (0 = this week)"]
        #[max = 520]
        weeks_back: Option<u32>,
    ) -> Result<()> {
        let Some(snapshot) = load_snapshot(ctx, weeks_back.unwrap_or(0), None).await? else {
            return Ok(());
        };

        let embed = serenity::CreateEmbed::default()
            .title("📅 Weekly Sales")
            .description(report::format_weekly_sales(&snapshot.weekly_sales))
            .color(0x002E_CC71); // Green

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows spending for a week against the week before and the budget.
    #[poise::command(slash_command, prefix_command)]
    pub async fn weekly_expenses(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many weeks back (0 = this week)"]
        #[max = 520]
        weeks_back: Option<u32>,
    ) -> Result<()> {
        let Some(snapshot) = load_snapshot(ctx, weeks_back.unwrap_or(0), None).await? else {
            return Ok(());
        };

        let embed = serenity::CreateEmbed::default()
            .title("💸 Weekly Expenses")
            .description(report::format_weekly_expenses(&snapshot.weekly_expenses))
            .color(0x00E7_4C3C); // Red

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the best-selling items of all time.
    #[poise::command(slash_command, prefix_command)]
    pub async fn popular(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many items to show"] limit: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let limit = limit
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(data.config.business.popular_items_limit);

        let mut state = DashboardState::new(today());
        if !state.load(&data.database).await {
            ctx.say("❌ Could not load the ledger right now. Please try again.")
                .await?;
            return Ok(());
        }
        let items = breakdown::popular_items(&state.orders, None, limit);

        let embed = serenity::CreateEmbed::default()
            .title("🔥 Popular Items")
            .description(report::format_popular_items(&items))
            .color(0x00E6_7E22); // Orange

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
