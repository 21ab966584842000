//! Server-side domain models and parameter types.
//!
//! This module contains domain models used throughout the service layer, representing
//! Discord state snapshots, feature settings and upstream API payloads. Serenity types are
//! converted into these models at the bot boundary so that services can be exercised without
//! a gateway connection.

pub mod discord;
pub mod google_doc;
pub mod role_decay;
pub mod voice;
