use serenity::all::{
    Context, EventHandler, Guild, GuildChannel, GuildId, GuildMemberUpdateEvent, Interaction,
    Member, Message, Ready, UnavailableGuild, VoiceState,
};
use serenity::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::server::{
    config::Config,
    model::role_decay::ChannelScope,
    service::{
        join_to_create::JoinToCreateManager,
        monitor::MonitorHandle,
        role_decay::RoleDecayManager,
        upstream::{accounts::AccountsClient, destiny::DestinyClient, settings::SettingsClient},
    },
    startup::Upstreams,
};

pub mod channel;
pub mod guild;
pub mod interaction;
pub mod member;
pub mod message;
pub mod ready;
pub mod voice;

/// Role decay manager with the channels whose messages count as activity.
pub struct RoleDecayFeature {
    pub manager: Arc<RoleDecayManager>,
    pub scope: ChannelScope,
}

/// Discord bot event handler
pub struct Handler {
    pub role_decay: Option<RoleDecayFeature>,
    pub join_to_create: Arc<JoinToCreateManager>,
    pub destiny: Option<DestinyClient>,
    pub accounts: Option<AccountsClient>,
    pub settings: Option<SettingsClient>,
    /// Active service subscriptions per available guild.
    pub monitors: Mutex<HashMap<GuildId, Vec<MonitorHandle>>>,
}

impl Handler {
    /// Builds the handler from configuration and the upstream clients.
    ///
    /// Join-to-create templates are applied before the first guild becomes available.
    pub async fn new(config: &Config, upstreams: Upstreams) -> Self {
        let role_decay = config.role_decay.as_ref().map(|role_decay| RoleDecayFeature {
            manager: Arc::new(RoleDecayManager::new(role_decay.settings.clone())),
            scope: role_decay.scope.clone(),
        });

        let join_to_create = Arc::new(JoinToCreateManager::new());
        join_to_create.configure(config.join_to_create.clone()).await;

        Self {
            role_decay,
            join_to_create,
            destiny: upstreams.destiny,
            accounts: upstreams.accounts,
            settings: upstreams.settings,
            monitors: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(self, ctx, ready).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        guild::handle_guild_create(self, ctx, guild).await;
    }

    /// Called when the bot leaves a guild or the guild becomes unavailable
    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        guild::handle_guild_delete(self, incomplete).await;
    }

    /// Called when a member is updated in a guild (roles, nickname, etc.)
    async fn guild_member_update(
        &self,
        ctx: Context,
        _old: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        member::handle_guild_member_update(self, ctx, event).await;
    }

    /// Called when a channel is deleted from a guild
    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        channel::handle_channel_delete(self, channel).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }

    /// Called when a member joins, leaves or moves between voice channels
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(self, ctx, old, new).await;
    }

    /// Called for slash commands and other interactions
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(self, ctx, interaction).await;
    }
}
