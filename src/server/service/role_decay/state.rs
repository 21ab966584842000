//! Per-guild bookkeeping for role decay.

use chrono::{DateTime, TimeDelta, Utc};
use serenity::all::UserId;
use std::collections::{HashMap, HashSet};

/// In-memory role decay state of one guild, lost on restart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildRoleState {
    last_interaction: HashMap<UserId, DateTime<Utc>>,
    opted_out: HashSet<UserId>,
}

impl GuildRoleState {
    pub fn set_last_interactions(&mut self, interactions: HashMap<UserId, DateTime<Utc>>) {
        self.last_interaction = interactions;
    }

    pub fn set_opted_out(&mut self, users: HashSet<UserId>) {
        self.opted_out = users;
    }

    /// Merges persisted state into the live state.
    ///
    /// Opt-outs are united and each member keeps the later of the two timestamps, so a
    /// repeated seed never undoes activity or opt-outs recorded since the first one.
    pub fn merge(
        &mut self,
        interactions: HashMap<UserId, DateTime<Utc>>,
        opted_out: HashSet<UserId>,
    ) {
        for (user_id, at) in interactions {
            self.touch(user_id, at);
        }
        self.opted_out.extend(opted_out);
    }

    pub fn last_interaction(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.last_interaction.get(&user_id).copied()
    }

    /// Records activity, never moving a timestamp backwards.
    pub fn touch(&mut self, user_id: UserId, at: DateTime<Utc>) {
        let entry = self.last_interaction.entry(user_id).or_insert(at);
        if *entry < at {
            *entry = at;
        }
    }

    /// Starts the decay clock for a holder the state has never seen.
    pub fn touch_if_unknown(&mut self, user_id: UserId, at: DateTime<Utc>) {
        self.last_interaction.entry(user_id).or_insert(at);
    }

    pub fn forget(&mut self, user_id: UserId) {
        self.last_interaction.remove(&user_id);
    }

    pub fn is_opted_out(&self, user_id: UserId) -> bool {
        self.opted_out.contains(&user_id)
    }

    /// Returns `true` if the user was not already opted out.
    pub fn opt_out(&mut self, user_id: UserId) -> bool {
        self.opted_out.insert(user_id)
    }

    /// Returns `true` if the user was opted out.
    pub fn opt_in(&mut self, user_id: UserId) -> bool {
        self.opted_out.remove(&user_id)
    }

    /// Selects role holders whose role must be removed.
    ///
    /// A holder is selected when opted out or when more than `decay` has passed since their
    /// last interaction. Holders without a recorded interaction are stamped with `now`.
    ///
    /// # Arguments
    /// - `holders` - Members currently holding the role
    /// - `now` - Sweep time
    /// - `decay` - Inactivity period after which the role is removed
    ///
    /// # Returns
    /// - `Vec<UserId>` - Holders to demote, in `holders` order
    pub fn plan_sweep(
        &mut self,
        holders: &[UserId],
        now: DateTime<Utc>,
        decay: TimeDelta,
    ) -> Vec<UserId> {
        let mut expired = Vec::new();

        for user_id in holders {
            if self.opted_out.contains(user_id) {
                expired.push(*user_id);
                continue;
            }

            match self.last_interaction.get(user_id) {
                Some(last) if now - *last > decay => expired.push(*user_id),
                Some(_) => {}
                None => {
                    self.last_interaction.insert(*user_id, now);
                }
            }
        }

        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    /// Tests that sweep planning selects expired and opted-out holders only.
    ///
    /// Expected: stale and opted-out holders selected, fresh holder kept
    #[test]
    fn plans_expired_and_opted_out_holders() {
        let fresh = UserId::new(1);
        let stale = UserId::new(2);
        let opted = UserId::new(3);

        let mut state = GuildRoleState::default();
        state.touch(fresh, at(950));
        state.touch(stale, at(100));
        state.touch(opted, at(990));
        state.opt_out(opted);

        let expired = state.plan_sweep(&[fresh, stale, opted], at(1000), TimeDelta::seconds(500));
        assert_eq!(expired, vec![stale, opted]);
    }

    /// Tests the boundary of the decay comparison.
    ///
    /// Expected: exactly `decay` elapsed keeps the role, one second more removes it
    #[test]
    fn decay_boundary_is_exclusive() {
        let user = UserId::new(1);
        let mut state = GuildRoleState::default();
        state.touch(user, at(0));

        assert!(state
            .plan_sweep(&[user], at(500), TimeDelta::seconds(500))
            .is_empty());
        assert_eq!(
            state.plan_sweep(&[user], at(501), TimeDelta::seconds(500)),
            vec![user]
        );
    }

    /// Tests that unknown holders get their decay clock started instead of being removed.
    ///
    /// Expected: no removal, last interaction set to sweep time
    #[test]
    fn stamps_unknown_holders() {
        let user = UserId::new(7);
        let mut state = GuildRoleState::default();

        assert!(state
            .plan_sweep(&[user], at(1000), TimeDelta::seconds(10))
            .is_empty());
        assert_eq!(state.last_interaction(user), Some(at(1000)));
    }

    /// Tests opt-out bookkeeping.
    ///
    /// Expected: a user is stored at most once and opt-in reports prior membership
    #[test]
    fn opt_out_is_idempotent() {
        let user = UserId::new(4);
        let mut state = GuildRoleState::default();

        assert!(state.opt_out(user));
        assert!(!state.opt_out(user));
        assert!(state.is_opted_out(user));
        assert!(state.opt_in(user));
        assert!(!state.opt_in(user));
        assert!(!state.is_opted_out(user));
    }

    /// Tests that touching never moves a timestamp backwards.
    ///
    /// Expected: later timestamp kept when an older message is processed late
    #[test]
    fn touch_keeps_latest_timestamp() {
        let user = UserId::new(5);
        let mut state = GuildRoleState::default();

        state.touch(user, at(200));
        state.touch(user, at(100));
        assert_eq!(state.last_interaction(user), Some(at(200)));
    }
}
