//! Boundary between the automation services and Discord.
//!
//! Role decay and join-to-create never call Serenity directly. They go through the
//! [`GuildApi`] trait, implemented for a live gateway connection by [`SerenityGuildApi`]
//! and for tests by an in-memory fake. This keeps the event bookkeeping testable without a
//! bot token and confines cache-versus-REST decisions to one place.

pub mod api;
pub mod gateway;

#[cfg(test)]
pub mod test;

pub use api::GuildApi;
pub use gateway::SerenityGuildApi;
