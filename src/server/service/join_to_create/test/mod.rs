use super::*;
use crate::server::discord::test::{Call, FakeGuildApi};
use serenity::all::ChannelType;


const LOBBY: u64 = 20;
const CREATE_PARTY: u64 = 21;
const CREATE_SQUAD: u64 = 22;
const GENERAL: u64 = 23;

fn guild() -> GuildId {
    GuildId::new(1)
}

fn user(id: u64) -> UserId {
    UserId::new(id)
}

fn channel(id: u64) -> ChannelId {
    ChannelId::new(id)
}

/// "Lobby" category holding two template channels and a regular voice channel.
fn guild_api() -> FakeGuildApi {
    FakeGuildApi::new()
        .with_channel(LOBBY, "Lobby", ChannelType::Category, None)
        .with_channel(CREATE_PARTY, "Create Party", ChannelType::Voice, Some(LOBBY))
        .with_channel(CREATE_SQUAD, "Create Squad", ChannelType::Voice, Some(LOBBY))
        .with_channel(GENERAL, "General", ChannelType::Voice, Some(LOBBY))
}

fn templates() -> HashMap<String, ChannelTemplate> {
    HashMap::from([
        (
            "Create Party".to_string(),
            ChannelTemplate {
                name: "Party-{$counter}".to_string(),
                amount: Some(4),
            },
        ),
        (
            "Create Squad".to_string(),
            ChannelTemplate {
                name: "{$username}'s Squad".to_string(),
                amount: None,
            },
        ),
    ])
}

async fn manager() -> JoinToCreateManager {
    let manager = JoinToCreateManager::new();
    manager.configure(templates()).await;
    manager
}

fn transition(user_id: u64, old: Option<u64>, new: Option<u64>) -> VoiceTransition {
    VoiceTransition {
        guild_id: guild(),
        user_id: user(user_id),
        username: format!("user{}", user_id),
        old_channel: old.map(ChannelId::new),
        new_channel: new.map(ChannelId::new),
    }
}

/// Connects the member in the fake and forwards the transition to the manager.
async fn join(manager: &JoinToCreateManager, api: &FakeGuildApi, user_id: u64, channel_id: u64) {
    let old = api.voice_channel_of(user(user_id)).map(|c| c.get());
    api.set_voice(user(user_id), Some(channel(channel_id)));
    manager
        .handle_voice_update(api, transition(user_id, old, Some(channel_id)))
        .await;
}

/// Disconnects the member in the fake and forwards the transition to the manager.
async fn leave(manager: &JoinToCreateManager, api: &FakeGuildApi, user_id: u64) {
    let old = api.voice_channel_of(user(user_id)).map(|c| c.get());
    api.set_voice(user(user_id), None);
    manager
        .handle_voice_update(api, transition(user_id, old, None))
        .await;
}
