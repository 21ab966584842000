//! Service layer for business logic and orchestration.
//!
//! Services sit between the event sources (Discord gateway, HTTP controllers, cron
//! scheduler) and the external systems (Discord through [`GuildApi`], internal HTTP services,
//! Google Docs). They are responsible for:
//!
//! - **Guild state**: Role decay timestamps, opt-outs and managed voice channels, held in
//!   memory behind per-manager locks
//! - **Orchestration**: Coordinating Discord mutations and upstream requests
//! - **Validation**: Rejecting malformed command input before any external call
//!
//! [`GuildApi`]: crate::server::discord::GuildApi

pub mod destiny;
pub mod document;
pub mod job;
pub mod join_to_create;
pub mod monitor;
pub mod role_decay;
pub mod upstream;
