//! Slash commands.
//!
//! Input problems are answered with an ephemeral message built from [`CommandError`];
//! upstream and permission failures are logged and answered with a generic ephemeral
//! message so internals never reach the channel.

pub mod destiny;
pub mod role;

use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};

use crate::server::{
    bot::handler::Handler,
    error::{command::CommandError, AppError},
};

pub const ROLE_GRANT: &str = "role-grant";
pub const ROLE_ALLOW: &str = "role-allow";
pub const ROLE_DENY: &str = "role-deny";
pub const DESTINY: &str = "destiny";
pub const LEADERBOARD: &str = "leaderboard";

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// Commands to register for the enabled features.
pub fn definitions(role_decay: bool, destiny: bool) -> Vec<CreateCommand> {
    let mut commands = Vec::new();
    if role_decay {
        commands.extend(role::definitions());
    }
    if destiny {
        commands.extend(destiny::definitions());
    }
    commands
}

/// Runs a slash command and reports failures to the invoking user.
pub async fn handle_command(handler: &Handler, ctx: &Context, command: &CommandInteraction) {
    let name = command.data.name.as_str();

    let result = match name {
        ROLE_GRANT | ROLE_ALLOW | ROLE_DENY => role::handle_role_command(handler, ctx, command).await,
        DESTINY => destiny::handle_destiny(handler, ctx, command).await,
        LEADERBOARD => destiny::handle_leaderboard(handler, ctx, command).await,
        other => Err(CommandError::UnknownCommand(other.to_string()).into()),
    };

    if let Err(e) = result {
        let content = user_message(name, command, &e);
        if let Err(e) = respond_ephemeral(ctx, command, content).await {
            tracing::error!("Failed to answer /{} for user {}: {}", name, command.user.id, e);
        }
    }
}

/// Text shown to the user for a failed command; non-input failures are logged here.
pub fn user_message(name: &str, command: &CommandInteraction, error: &AppError) -> String {
    match error {
        AppError::CommandErr(e) => e.to_string(),
        e => {
            tracing::error!(
                "Failed to run /{} for user {} in guild {:?}: {}",
                name,
                command.user.id,
                command.guild_id,
                e
            );
            GENERIC_FAILURE.to_string()
        }
    }
}

pub async fn respond_ephemeral(
    ctx: &Context,
    command: &CommandInteraction,
    content: String,
) -> Result<(), AppError> {
    command
        .create_response(
            ctx,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

/// Replaces a deferred public response with an ephemeral error message.
pub async fn replace_with_error(
    ctx: &Context,
    command: &CommandInteraction,
    error: &AppError,
) -> Result<(), AppError> {
    let content = user_message(&command.data.name, command, error);

    command.delete_response(&ctx.http).await?;
    command
        .create_followup(
            ctx,
            CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true),
        )
        .await?;

    Ok(())
}

/// Raw string option value; validation decides what blank input means.
pub fn string_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
}
