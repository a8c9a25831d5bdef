//! Order Discord commands - `/order add | additem | complete | delete | list`.
//!
//! Orders are created pending with a first item, grow with `additem` while
//! pending, and are completed once served.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            calendar::{DateWindow, parse_date_or, today},
            menu,
            order::{self, NewLineItem, NewOrder, OrderStatus},
            report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    const LIST_LIMIT: usize = 15;

    /// Which orders `/order list` shows.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusFilter {
        #[name = "pending"]
        Pending,
        #[name = "completed"]
        Completed,
        #[name = "all"]
        All,
    }

    /// Parent command for taking and managing orders.
    #[poise::command(
        slash_command,
        subcommands("order_add", "order_additem", "order_complete", "order_delete", "order_list")
    )]
    pub async fn order(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Order command. Available subcommands:\n\
            `/order add` - Start a new order\n\
            `/order additem` - Add an item to a pending order\n\
            `/order complete` - Mark an order as completed\n\
            `/order delete` - Delete an order\n\
            `/order list` - List recent orders";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Starts a new pending order with its first item at the menu price.
    #[poise::command(slash_command, rename = "add")]
    pub async fn order_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Menu item"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        item: String,
        #[description = "Quantity (defaults to 1)"] quantity: Option<i32>,
        #[description = "Who the order is for (e.g., 'red shirt')"] customer: Option<String>,
        #[description = "Sale date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let menu_item = menu::require_active(&data.config.menu, &item)?;
        let reference = today();
        let date = date.map_or(reference, |d| parse_date_or(&d, reference));

        let created = order::create_order(
            &data.database,
            NewOrder {
                date,
                customer_description: customer.unwrap_or_default(),
                items: vec![NewLineItem::from_menu(menu_item, quantity.unwrap_or(1))],
            },
        )
        .await?;
        info!(order_id = created.order.id, user = %ctx.author().name, "Order taken via Discord");

        ctx.say(format!(
            "✅ Order #{} created: {} x{} ({})",
            created.order.id,
            menu_item.name,
            quantity.unwrap_or(1),
            report::format_currency(created.order.order_total)
        ))
        .await?;
        Ok(())
    }

    /// Adds an item to a pending order.
    #[poise::command(slash_command, rename = "additem")]
    pub async fn order_additem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"] order_id: i64,
        #[description = "Menu item"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        item: String,
        #[description = "Quantity (defaults to 1)"] quantity: Option<i32>,
    ) -> Result<()> {
        let data = ctx.data();
        let menu_item = menu::require_active(&data.config.menu, &item)?;

        let updated = order::add_item_to_order(
            &data.database,
            order_id,
            NewLineItem::from_menu(menu_item, quantity.unwrap_or(1)),
        )
        .await?;

        ctx.say(format!(
            "✅ Added {} x{} to order #{}. New total: {}",
            menu_item.name,
            quantity.unwrap_or(1),
            order_id,
            report::format_currency(updated.order.order_total)
        ))
        .await?;
        Ok(())
    }

    /// Marks an order as completed.
    #[poise::command(slash_command, rename = "complete")]
    pub async fn order_complete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"] order_id: i64,
    ) -> Result<()> {
        let completed = order::complete_order(&ctx.data().database, order_id).await?;
        ctx.say(format!(
            "✅ Order #{} completed ({})",
            order_id,
            report::format_currency(completed.order.order_total)
        ))
        .await?;
        Ok(())
    }

    /// Deletes an order and its items.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn order_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"] order_id: i64,
    ) -> Result<()> {
        order::delete_order(&ctx.data().database, order_id).await?;
        ctx.say(format!("🗑️ Order #{order_id} deleted.")).await?;
        Ok(())
    }

    /// Lists recent orders, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn order_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Which orders to show (defaults to all)"] status: Option<StatusFilter>,
        #[description = "Only orders on this date (YYYY-MM-DD)"] date: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let orders = match (status.unwrap_or(StatusFilter::All), date) {
            (filter, Some(d)) => {
                let day = parse_date_or(&d, today());
                order::get_orders_by_date_range(db, DateWindow::single_day(day))
                    .await?
                    .into_iter()
                    .filter(|o| match filter {
                        StatusFilter::Pending => !o.is_completed(),
                        StatusFilter::Completed => o.is_completed(),
                        StatusFilter::All => true,
                    })
                    .collect()
            }
            (StatusFilter::Pending, None) => {
                order::get_orders_by_status(db, OrderStatus::Pending).await?
            }
            (StatusFilter::Completed, None) => {
                order::get_orders_by_status(db, OrderStatus::Completed).await?
            }
            (StatusFilter::All, None) => order::get_all_orders(db).await?,
        };

        if orders.is_empty() {
            ctx.say("No orders found. Use `/order add` to take one!").await?;
            return Ok(());
        }

        let now = today();
        let lines: Vec<String> = orders
            .iter()
            .take(LIST_LIMIT)
            .map(|o| report::format_order_line(o, now))
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("🧾 Orders")
            .description(lines.join("\n"))
            .color(0x00E6_7E22) // Orange
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {} of {} order{}",
                lines.len(),
                orders.len(),
                if orders.len() == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
