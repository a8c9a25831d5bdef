//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Shawarma Ledger Help**\n\
        Here is a summary of all available commands.\n\n\
        **Orders**\n\
        • `/order add <item> [quantity] [customer] [date]` - Starts a new pending order.\n\
        • `/order additem <id> <item> [quantity]` - Adds an item to a pending order.\n\
        • `/order complete <id>` - Marks an order as completed.\n\
        • `/order delete <id>` - Deletes an order.\n\
        • `/order list [status] [date]` - Lists recent orders.\n\n\
        **Expenses**\n\
        • `/expense add <category> <amount> [description] [date]` - Records an expense.\n\
        • `/expense weekly <breakdown> [description] [date]` - Records a week's costs, e.g. `Wraps: RM10, Marketing: RM5`.\n\
        • `/expense delete <id>` - Deletes an expense.\n\
        • `/expense list [category]` - Lists recent expenses.\n\n\
        **Reports**\n\
        • `/dashboard [range] [from] [to]` - Sales, expenses, profit and trends for a period.\n\
        • `/weekly_sales [weeks_back]` - Sales on operating days versus the week before.\n\
        • `/weekly_expenses [weeks_back]` - Spending versus last week and the budget.\n\
        • `/popular [limit]` - Best-selling items.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
