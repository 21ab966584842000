//! Discord bot integration for role decay, join-to-create channels and slash commands.
//!
//! The bot is initialized during startup and runs in a separate tokio task so it does not
//! block the HTTP server or the job scheduler. Gateway events are translated into the
//! domain models of [`crate::server::model`] and forwarded to the services, which talk back
//! to Discord through [`crate::server::discord::SerenityGuildApi`].
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild availability, channels and roles
//! - `GUILD_MESSAGES` - Message activity for role decay
//! - `GUILD_MEMBERS` - Member role updates (privileged intent)
//! - `GUILD_VOICE_STATES` - Voice joins and leaves for join-to-create
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
