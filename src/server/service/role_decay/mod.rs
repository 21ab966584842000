//! Activity-based role decay.
//!
//! Members posting in watched channels receive a configured role; a periodic sweep removes
//! the role from holders who have been inactive longer than the decay period or who opted
//! out of it. State is kept in memory per guild and owned by [`RoleDecayManager`]; event
//! handlers and the sweep timer only reach it through the manager's methods, which take the
//! state lock for bookkeeping and release it before calling Discord.
//!
//! Role mutations that fail are logged and not retried: the next message or sweep tries
//! again naturally.

pub mod state;

#[cfg(test)]
mod test;

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, Role, RoleId, UserId};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};
use tokio::sync::Mutex;

use crate::{
    model::settings::RoleDecaySeedDto,
    server::{
        discord::GuildApi,
        error::{command::CommandError, AppError},
        model::role_decay::{ChannelScope, MessageActivity, RoleCommandOutcome, RoleDecaySettings},
        service::monitor::{MonitorHandle, Subscription},
        util::parse::{datetime_from_unix, parse_u64_from_string},
    },
};

use self::state::GuildRoleState;

/// Shortest sweep period accepted, `tokio::time::interval` rejects zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Finds a role by case-insensitive name.
///
/// # Returns
/// - `Some(RoleId)` - First role whose name matches
/// - `None` - No role carries that name
pub fn find_role_by_name(roles: &[Role], name: &str) -> Option<RoleId> {
    roles
        .iter()
        .find(|role| role.name.eq_ignore_ascii_case(name))
        .map(|role| role.id)
}

/// Counts from one sweep of a guild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Members holding the role when the sweep started.
    pub holders: usize,
    pub removed: usize,
    pub failed: usize,
}

struct Registration {
    scope: ChannelScope,
    subscription: Subscription,
}

pub struct RoleDecayManager {
    settings: RoleDecaySettings,
    guilds: Mutex<HashMap<GuildId, GuildRoleState>>,
    registrations: Mutex<HashMap<GuildId, Registration>>,
}

impl RoleDecayManager {
    pub fn new(settings: RoleDecaySettings) -> Self {
        Self {
            settings,
            guilds: Mutex::new(HashMap::new()),
            registrations: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &RoleDecaySettings {
        &self.settings
    }

    /// Replaces the recorded interaction times of a guild.
    pub async fn set_last_interactions(
        &self,
        guild_id: GuildId,
        interactions: HashMap<UserId, DateTime<Utc>>,
    ) {
        self.guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .set_last_interactions(interactions);
    }

    /// Replaces the set of members who opted out of the role in a guild.
    pub async fn set_dont_want(&self, guild_id: GuildId, users: HashSet<UserId>) {
        self.guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .set_opted_out(users);
    }

    /// Seeds a guild from the settings service payload.
    ///
    /// The payload is merged into any state already held for the guild, so seeding again
    /// after a reconnect keeps newer interactions and opt-outs. Entries with malformed ids
    /// or timestamps are logged and skipped.
    pub async fn seed(&self, guild_id: GuildId, seed: &RoleDecaySeedDto) {
        let mut interactions = HashMap::new();
        for (user, timestamp) in &seed.last_interactions {
            match parse_u64_from_string(user).and_then(|id| {
                datetime_from_unix(*timestamp).map(|at| (UserId::new(id), at))
            }) {
                Ok((user_id, at)) => {
                    interactions.insert(user_id, at);
                }
                Err(e) => tracing::warn!("Skipping role decay seed entry in guild {}: {}", guild_id, e),
            }
        }

        let mut dont_want = HashSet::new();
        for user in &seed.dont_want {
            match parse_u64_from_string(user) {
                Ok(id) => {
                    dont_want.insert(UserId::new(id));
                }
                Err(e) => tracing::warn!("Skipping role decay opt-out in guild {}: {}", guild_id, e),
            }
        }

        tracing::debug!(
            "Seeded role decay for guild {} with {} interactions and {} opt-outs",
            guild_id,
            interactions.len(),
            dont_want.len()
        );

        self.guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .merge(interactions, dont_want);
    }

    /// Starts watching a guild.
    ///
    /// Messages in `scope` and member updates are handled while the returned handle is
    /// subscribed, and a sweep runs every configured interval. Monitoring a guild again
    /// replaces the previous subscription.
    ///
    /// # Arguments
    /// - `api` - Discord access used by the sweep timer
    /// - `guild_id` - Guild to watch
    /// - `scope` - Channels and categories whose messages count as activity
    ///
    /// # Returns
    /// - `MonitorHandle` - Handle that stops event routing and the sweep timer
    pub async fn monitor(
        self: &Arc<Self>,
        api: Arc<dyn GuildApi>,
        guild_id: GuildId,
        scope: ChannelScope,
    ) -> MonitorHandle {
        let subscription = Subscription::new();
        let interval = self.settings.interval.max(MIN_SWEEP_INTERVAL);

        let manager = Arc::clone(self);
        let timer_subscription = subscription.clone();
        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !timer_subscription.is_active() {
                    break;
                }
                match manager.sweep(api.as_ref(), guild_id, Utc::now()).await {
                    Ok(report) => tracing::debug!(
                        "Role decay sweep for guild {}: {} holders, {} removed, {} failed",
                        guild_id,
                        report.holders,
                        report.removed,
                        report.failed
                    ),
                    Err(e) => {
                        tracing::error!("Role decay sweep failed for guild {}: {}", guild_id, e)
                    }
                }
            }
        })
        .abort_handle();

        let previous = self.registrations.lock().await.insert(
            guild_id,
            Registration {
                scope,
                subscription: subscription.clone(),
            },
        );
        // The replaced timer exits on its next tick
        if let Some(previous) = previous {
            previous.subscription.cancel();
        }

        tracing::info!(
            "Monitoring role decay for '{}' in guild {}",
            self.settings.role_name,
            guild_id
        );

        MonitorHandle::new(guild_id, subscription, Some(timer))
    }

    /// Returns the watched scope if the guild has an active subscription.
    async fn active_scope(&self, guild_id: GuildId) -> Option<ChannelScope> {
        let mut registrations = self.registrations.lock().await;
        match registrations.get(&guild_id) {
            Some(registration) if registration.subscription.is_active() => {
                Some(registration.scope.clone())
            }
            Some(_) => {
                registrations.remove(&guild_id);
                None
            }
            None => None,
        }
    }

    /// Looks up the configured role in the guild's current role list.
    pub async fn resolve_role(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
    ) -> Result<Option<RoleId>, AppError> {
        let roles = api.roles(guild_id).await?;
        let role_id = find_role_by_name(&roles, &self.settings.role_name);

        if role_id.is_none() {
            tracing::error!(
                "Role '{}' not found in guild {}",
                self.settings.role_name,
                guild_id
            );
        }

        Ok(role_id)
    }

    /// Handles a guild message.
    ///
    /// Refreshes the author's last interaction and grants the role when missing, provided
    /// the guild is monitored, the channel is watched, and the author has not opted out.
    pub async fn handle_message(&self, api: &dyn GuildApi, activity: MessageActivity) {
        if activity.author_is_bot {
            return;
        }

        let guild_id = activity.guild_id;
        let Some(scope) = self.active_scope(guild_id).await else {
            return;
        };

        if !scope.is_empty() {
            match api.channel(guild_id, activity.channel_id).await {
                Ok(Some(channel)) if scope.contains(&channel) => {}
                Ok(_) => return,
                Err(e) => {
                    tracing::error!(
                        "Failed to resolve channel {} in guild {}: {}",
                        activity.channel_id,
                        guild_id,
                        e
                    );
                    return;
                }
            }
        }

        {
            let mut guilds = self.guilds.lock().await;
            let state = guilds.entry(guild_id).or_default();
            if state.is_opted_out(activity.author_id) {
                return;
            }
            state.touch(activity.author_id, activity.timestamp);
        }

        let role_id = match self.resolve_role(api, guild_id).await {
            Ok(Some(role_id)) => role_id,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Failed to fetch roles for guild {}: {}", guild_id, e);
                return;
            }
        };

        let has_role = activity
            .author_roles
            .as_ref()
            .is_some_and(|roles| roles.contains(&role_id));
        if has_role {
            return;
        }

        match api.add_role(guild_id, activity.author_id, role_id).await {
            Ok(()) => tracing::info!(
                "Granted '{}' to user {} in guild {}",
                self.settings.role_name,
                activity.author_id,
                guild_id
            ),
            Err(e) => tracing::error!(
                "Failed to grant '{}' to user {} in guild {}: {}",
                self.settings.role_name,
                activity.author_id,
                guild_id,
                e
            ),
        }
    }

    /// Handles a member's role list changing.
    ///
    /// A member who gains the role while opted out loses it again; a holder the state has
    /// never seen starts their decay clock at `now`.
    pub async fn handle_member_update(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        user_id: UserId,
        roles: &[RoleId],
        now: DateTime<Utc>,
    ) {
        if self.active_scope(guild_id).await.is_none() {
            return;
        }

        let role_id = match self.resolve_role(api, guild_id).await {
            Ok(Some(role_id)) => role_id,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Failed to fetch roles for guild {}: {}", guild_id, e);
                return;
            }
        };

        if !roles.contains(&role_id) {
            return;
        }

        let opted_out = {
            let mut guilds = self.guilds.lock().await;
            let state = guilds.entry(guild_id).or_default();
            if state.is_opted_out(user_id) {
                true
            } else {
                state.touch_if_unknown(user_id, now);
                false
            }
        };

        if opted_out {
            self.strip_role(api, guild_id, user_id, role_id).await;
        }
    }

    /// Removes the role from expired and opted-out holders.
    ///
    /// # Returns
    /// - `Ok(SweepReport)` - Sweep ran; individual removal failures are counted and logged
    /// - `Err(AppError)` - Roles or role holders could not be listed
    pub async fn sweep(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, AppError> {
        let Some(role_id) = self.resolve_role(api, guild_id).await? else {
            return Ok(SweepReport::default());
        };

        let holders = api.role_holders(guild_id, role_id).await?;
        let expired = self
            .guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .plan_sweep(&holders, now, self.settings.decay);

        let mut report = SweepReport {
            holders: holders.len(),
            ..SweepReport::default()
        };

        for user_id in expired {
            match api.remove_role(guild_id, user_id, role_id).await {
                Ok(()) => {
                    report.removed += 1;
                    self.guilds
                        .lock()
                        .await
                        .entry(guild_id)
                        .or_default()
                        .forget(user_id);
                    tracing::info!(
                        "Removed '{}' from user {} in guild {}",
                        self.settings.role_name,
                        user_id,
                        guild_id
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        "Failed to remove '{}' from user {} in guild {}: {}",
                        self.settings.role_name,
                        user_id,
                        guild_id,
                        e
                    );
                }
            }
        }

        Ok(report)
    }

    /// Opts a member out of the role and strips it if currently held.
    ///
    /// # Arguments
    /// - `member_roles` - Roles the member holds right now
    ///
    /// # Returns
    /// - `Ok(Applied)` - Member newly opted out
    /// - `Ok(Unchanged)` - Member was already opted out
    /// - `Err(AppError)` - Guild roles could not be fetched
    pub async fn opt_out(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        user_id: UserId,
        member_roles: &[RoleId],
    ) -> Result<RoleCommandOutcome, AppError> {
        let newly_opted_out = self
            .guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .opt_out(user_id);

        if let Some(role_id) = self.resolve_role(api, guild_id).await? {
            if member_roles.contains(&role_id) {
                self.strip_role(api, guild_id, user_id, role_id).await;
            }
        }

        Ok(if newly_opted_out {
            RoleCommandOutcome::Applied
        } else {
            RoleCommandOutcome::Unchanged
        })
    }

    /// Opts a member back in; the role returns with their next qualifying message.
    pub async fn opt_in(&self, guild_id: GuildId, user_id: UserId) -> RoleCommandOutcome {
        let was_opted_out = self
            .guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .opt_in(user_id);

        if was_opted_out {
            RoleCommandOutcome::Applied
        } else {
            RoleCommandOutcome::Unchanged
        }
    }

    /// Grants the role immediately and refreshes the member's last interaction.
    ///
    /// # Returns
    /// - `Ok(Applied)` - Role granted
    /// - `Ok(Unchanged)` - Member already holds the role
    /// - `Ok(RoleMissing)` - The configured role does not exist
    /// - `Err(AppError::CommandErr(OptedOut))` - Member opted out of the role
    /// - `Err(AppError)` - Discord rejected the role change
    pub async fn grant(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        user_id: UserId,
        member_roles: &[RoleId],
        now: DateTime<Utc>,
    ) -> Result<RoleCommandOutcome, AppError> {
        {
            let mut guilds = self.guilds.lock().await;
            let state = guilds.entry(guild_id).or_default();
            if state.is_opted_out(user_id) {
                return Err(CommandError::OptedOut.into());
            }
            state.touch(user_id, now);
        }

        let Some(role_id) = self.resolve_role(api, guild_id).await? else {
            return Ok(RoleCommandOutcome::RoleMissing);
        };

        if member_roles.contains(&role_id) {
            return Ok(RoleCommandOutcome::Unchanged);
        }

        api.add_role(guild_id, user_id, role_id).await?;
        Ok(RoleCommandOutcome::Applied)
    }

    async fn strip_role(&self, api: &dyn GuildApi, guild_id: GuildId, user_id: UserId, role_id: RoleId) {
        if let Err(e) = api.remove_role(guild_id, user_id, role_id).await {
            tracing::error!(
                "Failed to remove '{}' from opted-out user {} in guild {}: {}",
                self.settings.role_name,
                user_id,
                guild_id,
                e
            );
        }
    }

    #[cfg(test)]
    pub async fn last_interaction(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Option<DateTime<Utc>> {
        self.guilds
            .lock()
            .await
            .get(&guild_id)
            .and_then(|state| state.last_interaction(user_id))
    }

    #[cfg(test)]
    pub async fn is_opted_out(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.guilds
            .lock()
            .await
            .get(&guild_id)
            .is_some_and(|state| state.is_opted_out(user_id))
    }
}
