//! Expense Discord commands - `/expense add | weekly | delete | list`.
//!
//! Amounts are typed in ringgit and stored in cents.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            calendar::{parse_date_or, today},
            expense::{self, ExpenseCategory, NewExpense},
            report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    const LIST_LIMIT: usize = 15;

    /// Parent command for recording and managing expenses.
    #[poise::command(
        slash_command,
        subcommands("expense_add", "expense_weekly", "expense_delete", "expense_list")
    )]
    pub async fn expense(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Expense command. Available subcommands:\n\
            `/expense add` - Record an expense in one category\n\
            `/expense weekly` - Record a week's costs across categories\n\
            `/expense delete` - Delete an expense\n\
            `/expense list` - List recent expenses";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records an expense in one category.
    #[poise::command(slash_command, rename = "add")]
    pub async fn expense_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Amount in RM (e.g., 25.50)"] amount: f64,
        #[description = "What the money was spent on"] description: Option<String>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        if !amount.is_finite() {
            ctx.say("❌ Invalid amount: must be a valid number").await?;
            return Ok(());
        }
        let category: ExpenseCategory = category.parse()?;
        if !category.is_fixed() {
            ctx.say("❌ Use `/expense weekly` to record a weekly expense.")
                .await?;
            return Ok(());
        }

        let reference = today();
        let created = expense::create_expense(
            &ctx.data().database,
            NewExpense::fixed(
                category,
                description.unwrap_or_default(),
                expense::ringgit_to_cents(amount),
                date.map_or(reference, |d| parse_date_or(&d, reference)),
            ),
        )
        .await?;
        info!(expense_id = created.expense.id, user = %ctx.author().name, "Expense recorded via Discord");

        ctx.say(format!(
            "✅ Recorded {} under {} (Expense #{})",
            report::format_currency(created.expense.amount),
            category.label(),
            created.expense.id
        ))
        .await?;
        Ok(())
    }

    /// Records a week's costs split across categories.
    ///
    /// The breakdown is written as `Label: RM<amount>` pairs, for example
    /// `Wraps: RM10, Marketing: RM5`.
    #[poise::command(slash_command, rename = "weekly")]
    pub async fn expense_weekly(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Breakdown, e.g. 'Wraps: RM10, Marketing: RM5'"] breakdown: String,
        #[description = "Note for the week"] description: Option<String>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let allocations = expense::decode_weekly_description(&breakdown);
        if allocations.is_empty() {
            ctx.say(
                "❌ No category amounts recognised. Write them like `Wraps: RM10, Marketing: RM5`.",
            )
            .await?;
            return Ok(());
        }

        let reference = today();
        let note = description.unwrap_or_else(|| expense::encode_weekly_description(&allocations));
        let created = expense::create_expense(
            &ctx.data().database,
            NewExpense::weekly(
                note,
                date.map_or(reference, |d| parse_date_or(&d, reference)),
                allocations,
            ),
        )
        .await?;

        let shares = created
            .category_amounts()
            .into_iter()
            .map(|(category, amount)| format!("{}: {}", category.label(), report::format_currency(amount)))
            .collect::<Vec<_>>()
            .join(", ");
        ctx.say(format!(
            "✅ Weekly expense #{} recorded: {} ({shares})",
            created.expense.id,
            report::format_currency(created.expense.amount)
        ))
        .await?;
        Ok(())
    }

    /// Deletes an expense.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn expense_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense number"] expense_id: i64,
    ) -> Result<()> {
        expense::delete_expense(&ctx.data().database, expense_id).await?;
        ctx.say(format!("🗑️ Expense #{expense_id} deleted.")).await?;
        Ok(())
    }

    /// Lists recent expenses, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn expense_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let expenses = match category {
            Some(name) => expense::get_expenses_by_category(db, name.parse()?).await?,
            None => expense::get_all_expenses(db).await?,
        };

        if expenses.is_empty() {
            ctx.say("No expenses found. Use `/expense add` to record one!")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = expenses
            .iter()
            .take(LIST_LIMIT)
            .map(report::format_expense_line)
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("💸 Expenses")
            .description(lines.join("\n"))
            .color(0x00E7_4C3C) // Red
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {} of {} expense{}",
                lines.len(),
                expenses.len(),
                if expenses.len() == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
