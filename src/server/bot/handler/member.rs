use chrono::Utc;
use serenity::all::{Context, GuildMemberUpdateEvent};

use crate::server::{bot::handler::Handler, discord::SerenityGuildApi};

/// Handles the guild_member_update event, used to catch manual role grants
pub async fn handle_guild_member_update(
    handler: &Handler,
    ctx: Context,
    event: GuildMemberUpdateEvent,
) {
    let Some(role_decay) = &handler.role_decay else {
        return;
    };

    if event.user.bot {
        return;
    }

    let api = SerenityGuildApi::new(ctx);
    role_decay
        .manager
        .handle_member_update(&api, event.guild_id, event.user.id, &event.roles, Utc::now())
        .await;
}
