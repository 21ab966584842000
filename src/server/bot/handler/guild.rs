use serenity::all::{Context, Guild, UnavailableGuild};
use std::sync::Arc;

use crate::server::{
    bot::handler::Handler,
    discord::{GuildApi, SerenityGuildApi},
};

/// Handles a guild becoming available.
///
/// Seeds role decay state from the settings service, subscribes the enabled services to
/// the guild and repairs join-to-create channels whose events were missed while the guild
/// was unavailable. Resubscribing replaces the previous handles.
pub async fn handle_guild_create(handler: &Handler, ctx: Context, guild: Guild) {
    let guild_id = guild.id;
    let api: Arc<dyn GuildApi> = Arc::new(SerenityGuildApi::new(ctx));
    let mut handles = Vec::new();

    tracing::debug!("Guild create event: {} ({})", guild.name, guild_id);

    if let Some(role_decay) = &handler.role_decay {
        if let Some(settings) = &handler.settings {
            match settings.role_decay_seed(guild_id).await {
                Ok(seed) => role_decay.manager.seed(guild_id, &seed).await,
                Err(e) => tracing::error!(
                    "Failed to fetch role decay state for guild {}: {}",
                    guild_id,
                    e
                ),
            }
        }

        handles.push(
            role_decay
                .manager
                .monitor(api.clone(), guild_id, role_decay.scope.clone())
                .await,
        );
    }

    if handler.join_to_create.has_templates().await {
        handles.push(handler.join_to_create.monitor(guild_id).await);

        match handler
            .join_to_create
            .cleanup_orphans(api.as_ref(), guild_id)
            .await
        {
            Ok(report) => tracing::debug!(
                "Join-to-create cleanup in guild {}: {:?}",
                guild_id,
                report
            ),
            Err(e) => tracing::error!(
                "Failed to clean up join-to-create channels in guild {}: {}",
                guild_id,
                e
            ),
        }
    }

    let previous = handler.monitors.lock().await.insert(guild_id, handles);
    for handle in previous.into_iter().flatten() {
        handle.unsubscribe();
    }
}

/// Handles the bot leaving a guild or the guild going offline.
pub async fn handle_guild_delete(handler: &Handler, guild: UnavailableGuild) {
    let Some(handles) = handler.monitors.lock().await.remove(&guild.id) else {
        return;
    };

    tracing::info!(
        "Unsubscribing {} services from guild {} (unavailable: {})",
        handles.len(),
        guild.id,
        guild.unavailable
    );

    for handle in handles {
        handle.unsubscribe();
    }
}
