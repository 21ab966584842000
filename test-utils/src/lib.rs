//! Guildhall Test Utils
//!
//! Shared fixtures for the guildhall test suites. Everything here is built by deserializing
//! JSON shaped like the real API payloads, so tests exercise the same serde paths as
//! production code.
//!
//! # Overview
//!
//! - **serenity**: Discord objects (roles) as returned by the Discord API
//! - **factory**: Google Docs API document payloads for the content parser
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::factory::google_doc::{heading, paragraph, DocumentFactory};
//!
//! let json = DocumentFactory::new("Handbook")
//!     .element(heading("HEADING_2", "Raids"))
//!     .element(paragraph("Bring snacks."))
//!     .build();
//! let document: Document = serde_json::from_value(json).unwrap();
//! ```

pub mod factory;
pub mod serenity;
