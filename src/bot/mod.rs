//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `ShawarmaLedger` application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (orders, expenses, reports, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::business::Config,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the business configuration
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Menu, operating days and report settings
    pub config: Arc<Config>,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and
    /// configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Arc<Config>) -> Self {
        Self { database, config }
    }
}

/// Context type shared by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::order(),
        commands::expense(),
        commands::dashboard(),
        commands::weekly_sales(),
        commands::weekly_expenses(),
        commands::popular(),
    ]
}

/// Text shown to the user for a failed command. Store failures get a generic
/// message; the details only go to the log.
#[must_use]
pub fn user_message(error: &Error) -> String {
    match error {
        Error::Database(_) | Error::Io(_) | Error::FrameworkError(_) => {
            "❌ Something went wrong while saving or loading data. Please try again.".to_string()
        }
        other => format!("❌ {other}"),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(user_message(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
