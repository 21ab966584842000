use serenity::all::{Context, Message};

use crate::server::{
    bot::handler::Handler, discord::SerenityGuildApi, model::role_decay::MessageActivity,
};

/// Handle message creation in a channel
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    let Some(role_decay) = &handler.role_decay else {
        return;
    };

    // Only guild messages count as activity
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let activity = MessageActivity {
        guild_id,
        channel_id: message.channel_id,
        author_id: message.author.id,
        author_is_bot: message.author.bot,
        author_roles: message.member.as_ref().map(|member| member.roles.clone()),
        timestamp: message.timestamp.to_utc(),
    };

    let api = SerenityGuildApi::new(ctx);
    role_decay.manager.handle_message(&api, activity).await;
}
