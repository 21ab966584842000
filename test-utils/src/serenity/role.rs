//! Serenity `Role` factory.

use serenity::all::Role;

/// Creates a guild role as returned by `GET /guilds/{guild.id}/roles`.
///
/// The role is not hoisted, managed or mentionable and grants no permissions, which is
/// what the role decay tests expect of a cosmetic activity role.
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name, matched case-insensitively by the role decay manager
/// - `color` - Role color as a 24-bit RGB integer
/// - `position` - Role position in the hierarchy
///
/// # Panics
/// - If the JSON no longer matches Serenity's `Role` layout
///
/// # Examples
///
/// ```rust,ignore
/// use test_utils::serenity::create_test_role;
///
/// let role = create_test_role(500, "Active", 0x2ecc71, 2);
/// assert_eq!(role.name, "Active");
/// ```
pub fn create_test_role(role_id: u64, name: &str, color: u32, position: i16) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": color,
        "colors": {
            "primary_color": color,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    }))
    .expect("role JSON should match serenity's Role")
}
