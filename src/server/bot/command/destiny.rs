use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    EditInteractionResponse,
};

use crate::server::{
    bot::{
        command::{replace_with_error, string_option, DESTINY, LEADERBOARD},
        handler::Handler,
    },
    error::{command::CommandError, AppError},
    service::destiny::{
        format_leaderboard, format_player, validate_bungie_name_option, validate_leaderboard_match,
        DestinyService,
    },
};

const BUNGIE_NAME_OPTION: &str = "bungie_name";
const MATCH_OPTION: &str = "match";

pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(DESTINY)
            .description("Look up a Destiny player")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    BUNGIE_NAME_OPTION,
                    "Bungie name such as Guardian#1234, defaults to your linked account",
                )
                .required(false),
            ),
        CreateCommand::new(LEADERBOARD)
            .description("Show a clan leaderboard")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    MATCH_OPTION,
                    "Leaderboard to show",
                )
                .required(true),
            ),
    ]
}

/// Handles `/destiny [bungie_name]`.
///
/// The name is validated before the interaction is deferred, so malformed input is
/// answered ephemerally without contacting the Destiny service.
pub async fn handle_destiny(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    let destiny = handler
        .destiny
        .as_ref()
        .ok_or(CommandError::FeatureDisabled)?;

    let bungie_name = validate_bungie_name_option(string_option(command, BUNGIE_NAME_OPTION))?;

    command.defer(ctx).await?;

    let service = DestinyService::new(destiny, handler.accounts.as_ref());
    match service.player(bungie_name.as_deref(), command.user.id).await {
        Ok(player) => {
            command
                .edit_response(
                    ctx,
                    EditInteractionResponse::new().content(format_player(&player)),
                )
                .await?;
        }
        Err(e) => replace_with_error(ctx, command, &e).await?,
    }

    Ok(())
}

/// Handles `/leaderboard <match>`.
pub async fn handle_leaderboard(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    let destiny = handler
        .destiny
        .as_ref()
        .ok_or(CommandError::FeatureDisabled)?;

    let match_name = validate_leaderboard_match(string_option(command, MATCH_OPTION).unwrap_or(""))?;

    command.defer(ctx).await?;

    let service = DestinyService::new(destiny, handler.accounts.as_ref());
    match service.leaderboard(&match_name).await {
        Ok(leaderboard) => {
            command
                .edit_response(
                    ctx,
                    EditInteractionResponse::new().content(format_leaderboard(&leaderboard)),
                )
                .await?;
        }
        Err(e) => replace_with_error(ctx, command, &e).await?,
    }

    Ok(())
}
