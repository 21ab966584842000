use super::*;
use crate::server::discord::test::{Call, FakeGuildApi};
use crate::server::model::role_decay::RoleCommandOutcome;
use chrono::TimeDelta;
use serenity::all::{ChannelId, ChannelType};
use test_utils::serenity::create_test_role;

mod sweep;

const ROLE: u64 = 500;

fn guild() -> GuildId {
    GuildId::new(1)
}

fn role() -> RoleId {
    RoleId::new(ROLE)
}

fn user(id: u64) -> UserId {
    UserId::new(id)
}

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap()
}

fn manager() -> Arc<RoleDecayManager> {
    Arc::new(RoleDecayManager::new(RoleDecaySettings {
        role_name: "Active".to_string(),
        decay: TimeDelta::hours(1),
        interval: Duration::from_secs(60),
    }))
}

/// Guild with the decaying role (named in lowercase to exercise case-insensitive lookup),
/// a "Raids" category holding `#lfg`, and an uncategorized `#off-topic`.
fn guild_api() -> FakeGuildApi {
    FakeGuildApi::new()
        .with_role(create_test_role(ROLE, "active", 0x2ecc71, 2))
        .with_role(create_test_role(501, "Moderator", 0xe74c3c, 5))
        .with_channel(10, "Raids", ChannelType::Category, None)
        .with_channel(11, "lfg", ChannelType::Text, Some(10))
        .with_channel(12, "off-topic", ChannelType::Text, None)
}

fn raids_scope() -> ChannelScope {
    ChannelScope::new(vec!["raids".to_string()], vec![])
}

fn message(author: u64, channel: u64, roles: Vec<RoleId>, seconds: i64) -> MessageActivity {
    MessageActivity {
        guild_id: guild(),
        channel_id: ChannelId::new(channel),
        author_id: user(author),
        author_is_bot: false,
        author_roles: Some(roles),
        timestamp: at(seconds),
    }
}

/// Tests case-insensitive role lookup by name.
///
/// Expected: "ACTIVE" resolves to the role named "active", unknown names resolve to None
#[test]
fn finds_roles_case_insensitively() {
    let roles = vec![
        create_test_role(ROLE, "active", 0, 1),
        create_test_role(501, "Moderator", 0, 2),
    ];

    assert_eq!(find_role_by_name(&roles, "ACTIVE"), Some(role()));
    assert_eq!(find_role_by_name(&roles, "moderator"), Some(RoleId::new(501)));
    assert_eq!(find_role_by_name(&roles, "Veteran"), None);
}
