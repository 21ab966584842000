use thiserror::Error;

/// Slash command input rejected before any external call is made.
///
/// The `Display` output of each variant is shown to the invoking user as an ephemeral
/// message, so messages are written for end users rather than operators.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Please provide a Bungie name, for example `Guardian#1234`.")]
    EmptyBungieName,

    #[error("`{0}` is not a valid Bungie name, expected `Name#1234`.")]
    InvalidBungieName(String),

    #[error("Please provide a leaderboard to look up.")]
    EmptyLeaderboardMatch,

    /// Command was invoked in a DM or another context without a guild.
    #[error("This command can only be used inside a server.")]
    NotInGuild,

    /// The feature backing the command is not configured for this deployment.
    #[error("This command is not enabled on this server.")]
    FeatureDisabled,

    #[error("You have opted out of this role, use `/role-allow` first.")]
    OptedOut,

    #[error("No Bungie account is linked to your Discord account, please provide a Bungie name.")]
    NoLinkedAccount,

    #[error("Unknown command `{0}`.")]
    UnknownCommand(String),
}
