//! Ownership decisions for join-to-create channels.

use serenity::all::UserId;

/// What to do with a managed channel after a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveAction {
    /// Nobody is left, delete the channel.
    Delete,
    /// The leaver was one of several present owners, strip only their permissions.
    RevokeOwner { user: UserId },
    /// The leaver was the only present owner, hand ownership to a remaining member.
    TransferOwner { from: UserId, to: UserId },
    /// No remaining member owns the channel, promote one.
    PromoteMember { to: UserId },
    /// Ownership is still held by a present member.
    Keep,
}

/// Decides how a managed channel reacts to `leaver` disconnecting.
///
/// # Arguments
/// - `leaver` - Member who left the channel
/// - `remaining` - Members still connected; the leaver is ignored if listed
/// - `owners` - Members holding owner overwrites on the channel
///
/// # Returns
/// - `LeaveAction` - Action to apply; promotions pick the first remaining member
pub fn plan_leave(leaver: UserId, remaining: &[UserId], owners: &[UserId]) -> LeaveAction {
    let remaining: Vec<UserId> = remaining
        .iter()
        .copied()
        .filter(|member| *member != leaver)
        .collect();

    let Some(first) = remaining.first().copied() else {
        return LeaveAction::Delete;
    };

    let owner_present = remaining.iter().any(|member| owners.contains(member));

    if owners.contains(&leaver) {
        if owner_present {
            LeaveAction::RevokeOwner { user: leaver }
        } else {
            LeaveAction::TransferOwner {
                from: leaver,
                to: first,
            }
        }
    } else if owner_present {
        LeaveAction::Keep
    } else {
        LeaveAction::PromoteMember { to: first }
    }
}

/// Decides how a managed channel found during cleanup should be repaired.
///
/// # Returns
/// - `Delete` - Channel is empty
/// - `PromoteMember` - Channel has members but none of them owns it
/// - `Keep` - A connected member owns the channel
pub fn plan_orphan(members: &[UserId], owners: &[UserId]) -> LeaveAction {
    match members.first() {
        None => LeaveAction::Delete,
        Some(_) if members.iter().any(|member| owners.contains(member)) => LeaveAction::Keep,
        Some(first) => LeaveAction::PromoteMember { to: *first },
    }
}
