use serenity::all::{Context, Interaction};

use crate::server::bot::{command, handler::Handler};

/// Dispatches slash commands; other interaction types are ignored
pub async fn handle_interaction(handler: &Handler, ctx: Context, interaction: Interaction) {
    if let Interaction::Command(command) = interaction {
        command::handle_command(handler, &ctx, &command).await;
    }
}
