use serenity::all::GuildChannel;

use crate::server::bot::handler::Handler;

/// Handles a channel being deleted, dropping it from join-to-create tracking
pub async fn handle_channel_delete(handler: &Handler, channel: GuildChannel) {
    if handler
        .join_to_create
        .forget_channel(channel.guild_id, channel.id)
        .await
    {
        tracing::debug!(
            "Managed channel {} in guild {} was deleted",
            channel.id,
            channel.guild_id
        );
    }
}
