//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity objects by deserializing JSON, simulating what
//! Discord's API would return.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::create_test_role;
//!
//! let active = create_test_role(111111111, "Active", 0x2ecc71, 2);
//! ```

pub mod role;

pub use role::create_test_role;
