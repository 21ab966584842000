use chrono::Utc;
use serenity::all::{CommandInteraction, Context, CreateCommand};

use crate::server::{
    bot::{
        command::{respond_ephemeral, ROLE_ALLOW, ROLE_DENY, ROLE_GRANT},
        handler::Handler,
    },
    discord::SerenityGuildApi,
    error::{command::CommandError, AppError},
    model::role_decay::RoleCommandOutcome,
};

pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(ROLE_GRANT)
            .description("Get the activity role right away"),
        CreateCommand::new(ROLE_ALLOW)
            .description("Let the bot give you the activity role again"),
        CreateCommand::new(ROLE_DENY)
            .description("Remove the activity role and never receive it again"),
    ]
}

/// Handles `/role-grant`, `/role-allow` and `/role-deny`.
///
/// # Returns
/// - `Ok(())` - Command answered
/// - `Err(AppError::CommandErr)` - Feature disabled, used outside a guild or opted out
/// - `Err(AppError)` - Discord rejected the role change
pub async fn handle_role_command(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    let role_decay = handler
        .role_decay
        .as_ref()
        .ok_or(CommandError::FeatureDisabled)?;
    let guild_id = command.guild_id.ok_or(CommandError::NotInGuild)?;
    let member_roles = command
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();
    let user_id = command.user.id;
    let api = SerenityGuildApi::new(ctx.clone());
    let manager = &role_decay.manager;

    let name = command.data.name.as_str();
    let outcome = match name {
        ROLE_GRANT => {
            manager
                .grant(&api, guild_id, user_id, &member_roles, Utc::now())
                .await?
        }
        ROLE_DENY => {
            manager
                .opt_out(&api, guild_id, user_id, &member_roles)
                .await?
        }
        _ => manager.opt_in(guild_id, user_id).await,
    };

    tracing::info!(
        "/{} by user {} in guild {}: {:?}",
        name,
        user_id,
        guild_id,
        outcome
    );

    respond_ephemeral(
        ctx,
        command,
        role_reply(name, outcome, &manager.settings().role_name),
    )
    .await
}

/// Confirmation text for a role command outcome.
pub fn role_reply(command: &str, outcome: RoleCommandOutcome, role_name: &str) -> String {
    match (command, outcome) {
        (_, RoleCommandOutcome::RoleMissing) => {
            format!("The `{}` role does not exist on this server.", role_name)
        }
        (ROLE_GRANT, RoleCommandOutcome::Applied) => format!("You now have `{}`.", role_name),
        (ROLE_GRANT, RoleCommandOutcome::Unchanged) => {
            format!("You already have `{}`.", role_name)
        }
        (ROLE_DENY, RoleCommandOutcome::Applied) => format!(
            "`{}` was removed and will not be given to you again.",
            role_name
        ),
        (ROLE_DENY, RoleCommandOutcome::Unchanged) => {
            format!("You had already opted out of `{}`.", role_name)
        }
        (_, RoleCommandOutcome::Applied) => format!(
            "You will receive `{}` again with your next message.",
            role_name
        ),
        (_, RoleCommandOutcome::Unchanged) => {
            format!("You have not opted out of `{}`.", role_name)
        }
    }
}
