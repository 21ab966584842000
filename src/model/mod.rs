//! Response types shared between the HTTP API, the bot and upstream services.

pub mod api;
pub mod content;
pub mod destiny;
pub mod settings;
