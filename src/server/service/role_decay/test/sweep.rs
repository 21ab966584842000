use super::*;

/// Tests that a sweep demotes stale and opted-out holders.
///
/// Verifies that for every holder, the role is removed when more than the decay period has
/// passed since their last interaction or when they opted out, and kept otherwise.
///
/// Expected: Ok with two removals, fresh holder keeps the role
#[tokio::test]
async fn removes_expired_and_opted_out_holders() {
    let api = guild_api()
        .with_member_role(user(1), role())
        .with_member_role(user(2), role())
        .with_member_role(user(3), role());
    let manager = manager();
    manager
        .set_last_interactions(
            guild(),
            HashMap::from([
                (user(1), at(10_000 - 60)),
                (user(2), at(10_000 - 7_200)),
                (user(3), at(10_000 - 60)),
            ]),
        )
        .await;
    manager.set_dont_want(guild(), HashSet::from([user(3)])).await;

    let report = manager.sweep(&api, guild(), at(10_000)).await.unwrap();

    assert_eq!(
        report,
        SweepReport {
            holders: 3,
            removed: 2,
            failed: 0
        }
    );
    assert!(api.has_role(user(1), role()));
    assert!(!api.has_role(user(2), role()));
    assert!(!api.has_role(user(3), role()));
    assert_eq!(manager.last_interaction(guild(), user(2)).await, None);
}

/// Tests that holders without a recorded interaction are not demoted on first sight.
///
/// Expected: no removal on the first sweep, removal once the decay period has passed
#[tokio::test]
async fn starts_decay_clock_for_unknown_holders() {
    let api = guild_api().with_member_role(user(1), role());
    let manager = manager();

    let first = manager.sweep(&api, guild(), at(10_000)).await.unwrap();
    assert_eq!(first.removed, 0);
    assert_eq!(manager.last_interaction(guild(), user(1)).await, Some(at(10_000)));

    let second = manager
        .sweep(&api, guild(), at(10_000 + 3_601))
        .await
        .unwrap();
    assert_eq!(second.removed, 1);
    assert!(!api.has_role(user(1), role()));
}

/// Tests that removal failures are counted and retried only by the next sweep.
///
/// Expected: one RemoveRole attempt per sweep, failures reported
#[tokio::test]
async fn failed_removals_wait_for_next_sweep() {
    let api = guild_api()
        .with_member_role(user(2), role())
        .failing_role_mutations();
    let manager = manager();
    manager
        .set_last_interactions(guild(), HashMap::from([(user(2), at(0))]))
        .await;

    let report = manager.sweep(&api, guild(), at(10_000)).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(api.calls(), vec![Call::RemoveRole(user(2), role())]);

    manager.sweep(&api, guild(), at(10_001)).await.unwrap();
    assert_eq!(
        api.calls(),
        vec![
            Call::RemoveRole(user(2), role()),
            Call::RemoveRole(user(2), role())
        ]
    );
}

/// Tests sweeping a guild without the configured role.
///
/// Expected: Ok with an empty report and no Discord calls
#[tokio::test]
async fn missing_role_skips_sweep() {
    let api = FakeGuildApi::new();
    let manager = manager();

    let report = manager.sweep(&api, guild(), at(10_000)).await.unwrap();

    assert_eq!(report, SweepReport::default());
    assert!(api.calls().is_empty());
}

/// Tests that a message after a sweep keeps an active member's role.
///
/// Expected: member refreshed by a message survives the sweep
#[tokio::test]
async fn message_activity_defers_decay() {
    let api = Arc::new(guild_api().with_member_role(user(1), role()));
    let manager = manager();
    let _handle = manager.monitor(api.clone(), guild(), raids_scope()).await;
    manager
        .set_last_interactions(guild(), HashMap::from([(user(1), at(0))]))
        .await;

    manager
        .handle_message(api.as_ref(), message(1, 11, vec![role()], 9_000))
        .await;
    let report = manager.sweep(api.as_ref(), guild(), at(10_000)).await.unwrap();

    assert_eq!(report.removed, 0);
    assert!(api.has_role(user(1), role()));
}
