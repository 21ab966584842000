//! In-memory [`GuildApi`] used by service tests.
//!
//! Mirrors the Discord state the services observe (roles, channels, voice connections,
//! owner overwrites) and records every mutation in call order.

use serenity::all::{ChannelId, ChannelType, GuildId, Role, RoleId, UserId};
use serenity::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::server::{
    discord::api::GuildApi,
    error::AppError,
    model::discord::{ChannelInfo, NewVoiceChannel},
};

/// Mutation recorded by [`FakeGuildApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddRole(UserId, RoleId),
    RemoveRole(UserId, RoleId),
    CreateChannel(NewVoiceChannel),
    DeleteChannel(ChannelId),
    Move(UserId, ChannelId),
    GrantOwner(ChannelId, UserId),
    RevokeOwner(ChannelId, UserId),
}

#[derive(Default)]
struct FakeState {
    roles: Vec<Role>,
    member_roles: HashMap<UserId, HashSet<RoleId>>,
    channels: Vec<ChannelInfo>,
    voice: HashMap<UserId, ChannelId>,
    owners: HashMap<ChannelId, Vec<UserId>>,
    next_channel_id: u64,
    fail_role_mutations: bool,
    fail_moves: bool,
    calls: Vec<Call>,
}

pub struct FakeGuildApi {
    state: Mutex<FakeState>,
}

impl Default for FakeGuildApi {
    fn default() -> Self {
        Self::new()
    }
}

fn discord_failure(what: &str) -> AppError {
    AppError::InternalError(format!("simulated Discord failure: {}", what))
}

impl FakeGuildApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_channel_id: 9000,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_role(self, role: Role) -> Self {
        self.state.lock().unwrap().roles.push(role);
        self
    }

    pub fn with_member_role(self, user_id: UserId, role_id: RoleId) -> Self {
        self.state
            .lock()
            .unwrap()
            .member_roles
            .entry(user_id)
            .or_default()
            .insert(role_id);
        self
    }

    pub fn with_channel(self, id: u64, name: &str, kind: ChannelType, parent: Option<u64>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let parent_id = parent.map(ChannelId::new);
            let parent_name = parent_id.and_then(|parent_id| {
                state
                    .channels
                    .iter()
                    .find(|channel| channel.id == parent_id)
                    .map(|channel| channel.name.clone())
            });
            state.channels.push(ChannelInfo {
                id: ChannelId::new(id),
                name: name.to_string(),
                kind,
                parent_id,
                parent_name,
            });
        }
        self
    }

    pub fn with_voice(self, user_id: UserId, channel_id: ChannelId) -> Self {
        self.set_voice(user_id, Some(channel_id));
        self
    }

    pub fn with_owner(self, channel_id: ChannelId, user_id: UserId) -> Self {
        self.state
            .lock()
            .unwrap()
            .owners
            .entry(channel_id)
            .or_default()
            .push(user_id);
        self
    }

    pub fn failing_role_mutations(self) -> Self {
        self.state.lock().unwrap().fail_role_mutations = true;
        self
    }

    pub fn failing_moves(self) -> Self {
        self.state.lock().unwrap().fail_moves = true;
        self
    }

    /// Connects or disconnects a member from voice.
    pub fn set_voice(&self, user_id: UserId, channel_id: Option<ChannelId>) {
        let mut state = self.state.lock().unwrap();
        match channel_id {
            Some(channel_id) => state.voice.insert(user_id, channel_id),
            None => state.voice.remove(&user_id),
        };
    }

    pub fn has_role(&self, user_id: UserId, role_id: RoleId) -> bool {
        self.state
            .lock()
            .unwrap()
            .member_roles
            .get(&user_id)
            .is_some_and(|roles| roles.contains(&role_id))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn channel_named(&self, name: &str) -> Option<ChannelInfo> {
        self.state
            .lock()
            .unwrap()
            .channels
            .iter()
            .find(|channel| channel.name == name)
            .cloned()
    }

    pub fn channel_exists(&self, channel_id: ChannelId) -> bool {
        self.state
            .lock()
            .unwrap()
            .channels
            .iter()
            .any(|channel| channel.id == channel_id)
    }

    pub fn owners(&self, channel_id: ChannelId) -> Vec<UserId> {
        self.state
            .lock()
            .unwrap()
            .owners
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn voice_channel_of(&self, user_id: UserId) -> Option<ChannelId> {
        self.state.lock().unwrap().voice.get(&user_id).copied()
    }
}

#[async_trait]
impl GuildApi for FakeGuildApi {
    async fn roles(&self, _guild_id: GuildId) -> Result<Vec<Role>, AppError> {
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn role_holders(
        &self,
        _guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<Vec<UserId>, AppError> {
        let state = self.state.lock().unwrap();
        let mut holders: Vec<UserId> = state
            .member_roles
            .iter()
            .filter(|(_, roles)| roles.contains(&role_id))
            .map(|(user_id, _)| *user_id)
            .collect();
        holders.sort();
        Ok(holders)
    }

    async fn add_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AddRole(user_id, role_id));
        if state.fail_role_mutations {
            return Err(discord_failure("add role"));
        }
        state.member_roles.entry(user_id).or_default().insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RemoveRole(user_id, role_id));
        if state.fail_role_mutations {
            return Err(discord_failure("remove role"));
        }
        if let Some(roles) = state.member_roles.get_mut(&user_id) {
            roles.remove(&role_id);
        }
        Ok(())
    }

    async fn channel(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelInfo>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .channels
            .iter()
            .find(|channel| channel.id == channel_id)
            .cloned())
    }

    async fn channels(&self, _guild_id: GuildId) -> Result<Vec<ChannelInfo>, AppError> {
        Ok(self.state.lock().unwrap().channels.clone())
    }

    async fn create_voice_channel(
        &self,
        _guild_id: GuildId,
        channel: NewVoiceChannel,
    ) -> Result<ChannelId, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateChannel(channel.clone()));

        state.next_channel_id += 1;
        let id = ChannelId::new(state.next_channel_id);
        let parent_name = channel.parent_id.and_then(|parent_id| {
            state
                .channels
                .iter()
                .find(|existing| existing.id == parent_id)
                .map(|existing| existing.name.clone())
        });
        state.channels.push(ChannelInfo {
            id,
            name: channel.name,
            kind: ChannelType::Voice,
            parent_id: channel.parent_id,
            parent_name,
        });
        state.owners.insert(id, vec![channel.owner]);
        Ok(id)
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteChannel(channel_id));
        state.channels.retain(|channel| channel.id != channel_id);
        state.owners.remove(&channel_id);
        state.voice.retain(|_, connected| *connected != channel_id);
        Ok(())
    }

    async fn move_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Move(user_id, channel_id));
        if state.fail_moves {
            return Err(discord_failure("move member"));
        }
        state.voice.insert(user_id, channel_id);
        Ok(())
    }

    async fn voice_members(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError> {
        let state = self.state.lock().unwrap();
        let mut members: Vec<UserId> = state
            .voice
            .iter()
            .filter(|(_, connected)| **connected == channel_id)
            .map(|(user_id, _)| *user_id)
            .collect();
        members.sort();
        Ok(members)
    }

    async fn channel_owners(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError> {
        Ok(self.owners(channel_id))
    }

    async fn grant_owner(&self, channel_id: ChannelId, user_id: UserId) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GrantOwner(channel_id, user_id));
        let owners = state.owners.entry(channel_id).or_default();
        if !owners.contains(&user_id) {
            owners.push(user_id);
        }
        Ok(())
    }

    async fn revoke_owner(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RevokeOwner(channel_id, user_id));
        if let Some(owners) = state.owners.get_mut(&channel_id) {
            owners.retain(|owner| *owner != user_id);
        }
        Ok(())
    }
}
