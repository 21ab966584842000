//! Ready event handler for bot initialization.
//!
//! Fired once per gateway connection after the initial handshake. Slash commands are
//! registered globally here; per-guild setup waits for `guild_create`.

use serenity::all::{ActivityData, Command, Context, Ready};

use crate::server::bot::{command, handler::Handler};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `handler` - Event handler holding the enabled features
/// - `ctx` - Discord context for setting activity and registering commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(handler: &Handler, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord in {} guilds",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::custom("Keeping the lights on")));

    let commands = command::definitions(handler.role_decay.is_some(), handler.destiny.is_some());
    let count = commands.len();

    match Command::set_global_commands(&ctx.http, commands).await {
        Ok(_) => tracing::info!("Registered {} slash commands", count),
        Err(e) => tracing::error!("Failed to register slash commands: {}", e),
    }
}
