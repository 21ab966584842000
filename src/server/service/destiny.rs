//! Destiny lookups backing the `/destiny` and `/leaderboard` commands.
//!
//! Input is validated before any upstream request. Replies are rendered as plain Discord
//! markdown.

use serenity::all::UserId;

use crate::{
    model::destiny::{LeaderboardDto, PlayerSummaryDto},
    server::{
        error::{command::CommandError, AppError},
        service::upstream::{accounts::AccountsClient, destiny::DestinyClient},
    },
};

/// Number of digits in the numeric suffix of a bungie name.
const BUNGIE_CODE_DIGITS: usize = 4;
/// Entries shown in a leaderboard reply.
const LEADERBOARD_LIMIT: usize = 10;

/// Validates a bungie name of the form `Name#1234`.
///
/// # Arguments
/// - `input` - Raw command option, surrounding whitespace is ignored
///
/// # Returns
/// - `Ok(String)` - Trimmed bungie name
/// - `Err(CommandError::EmptyBungieName)` - Input is empty
/// - `Err(CommandError::InvalidBungieName)` - Missing name or four digit code
pub fn validate_bungie_name(input: &str) -> Result<String, CommandError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(CommandError::EmptyBungieName);
    }

    let valid = match name.rsplit_once('#') {
        Some((display, code)) => {
            !display.trim().is_empty()
                && code.len() == BUNGIE_CODE_DIGITS
                && code.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    };

    if valid {
        Ok(name.to_string())
    } else {
        Err(CommandError::InvalidBungieName(name.to_string()))
    }
}

/// Validates the optional bungie name option of `/destiny`.
///
/// # Returns
/// - `Ok(None)` - Option omitted, the linked account is used
/// - `Ok(Some(String))` - Trimmed bungie name
/// - `Err(CommandError)` - Option given but blank or malformed
pub fn validate_bungie_name_option(input: Option<&str>) -> Result<Option<String>, CommandError> {
    input.map(validate_bungie_name).transpose()
}

pub fn validate_leaderboard_match(input: &str) -> Result<String, CommandError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(CommandError::EmptyLeaderboardMatch);
    }
    Ok(name.to_string())
}

pub struct DestinyService<'a> {
    destiny: &'a DestinyClient,
    accounts: Option<&'a AccountsClient>,
}

impl<'a> DestinyService<'a> {
    pub fn new(destiny: &'a DestinyClient, accounts: Option<&'a AccountsClient>) -> Self {
        Self { destiny, accounts }
    }

    /// Looks up a player, falling back to the invoking user's linked account.
    ///
    /// # Arguments
    /// - `bungie_name` - Name given to the command, if any
    /// - `user_id` - Invoking Discord user
    ///
    /// # Returns
    /// - `Ok(PlayerSummaryDto)` - Player found upstream
    /// - `Err(AppError::CommandErr)` - Invalid name, or no name and no linked account
    /// - `Err(AppError::ReqwestErr)` - Upstream failure
    pub async fn player(
        &self,
        bungie_name: Option<&str>,
        user_id: UserId,
    ) -> Result<PlayerSummaryDto, AppError> {
        let bungie_name = match bungie_name {
            Some(name) => validate_bungie_name(name)?,
            None => {
                let accounts = self.accounts.ok_or(CommandError::NoLinkedAccount)?;
                let linked = accounts
                    .linked_bungie_name(user_id)
                    .await?
                    .ok_or(CommandError::NoLinkedAccount)?;
                validate_bungie_name(&linked)?
            }
        };

        self.destiny.player(&bungie_name).await
    }

    pub async fn leaderboard(&self, match_name: &str) -> Result<LeaderboardDto, AppError> {
        let match_name = validate_leaderboard_match(match_name)?;
        self.destiny.leaderboard(&match_name).await
    }
}

pub fn format_player(player: &PlayerSummaryDto) -> String {
    let mut reply = format!("**{}**", player.bungie_name);

    if player.characters.is_empty() {
        reply.push_str("\nNo characters found.");
    }
    for character in &player.characters {
        reply.push_str(&format!("\n{}: {}", character.class_name, character.light));
    }

    reply
}

pub fn format_leaderboard(leaderboard: &LeaderboardDto) -> String {
    let mut reply = format!("**{}**", leaderboard.name);

    if leaderboard.entries.is_empty() {
        reply.push_str("\nNo entries yet.");
    }
    for entry in leaderboard.entries.iter().take(LEADERBOARD_LIMIT) {
        reply.push_str(&format!(
            "\n{}. {} ({})",
            entry.rank, entry.bungie_name, entry.value
        ));
    }

    reply
}
