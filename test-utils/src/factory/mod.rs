//! Factory methods for creating upstream API payloads.
//!
//! Payloads are produced as `serde_json::Value` so that tests deserialize them into the
//! application's own models.

pub mod google_doc;
