use serenity::all::{Context, VoiceState};

use crate::server::{
    bot::handler::Handler, discord::SerenityGuildApi, model::voice::VoiceTransition,
};

/// Handles a member joining, leaving or moving between voice channels
pub async fn handle_voice_state_update(
    handler: &Handler,
    ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    let Some(guild_id) = new.guild_id else {
        return;
    };

    let username = match &new.member {
        Some(member) => member.display_name().to_string(),
        None => new.user_id.to_string(),
    };

    let transition = VoiceTransition {
        guild_id,
        user_id: new.user_id,
        username,
        old_channel: old.and_then(|old| old.channel_id),
        new_channel: new.channel_id,
    };

    let api = SerenityGuildApi::new(ctx);
    handler
        .join_to_create
        .handle_voice_update(&api, transition)
        .await;
}
