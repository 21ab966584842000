use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse a Discord snowflake id from String
    ///
    /// Occurs when upstream services hand back ids that are not numeric or are
    /// zero, which Discord never issues.
    #[error("Failed to parse ID from String '{value}': {reason}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// Description of the parse failure
        reason: String,
    },

    /// Failure to convert a Unix timestamp into a UTC datetime
    #[error("Failed to convert Unix timestamp {timestamp} to a datetime")]
    InvalidTimestamp {
        /// The Unix timestamp that failed to convert
        timestamp: i64,
    },
}

impl InternalError {
    pub fn parse_id(value: &str, source: ParseIntError) -> Self {
        Self::ParseStringId {
            value: value.to_string(),
            reason: source.to_string(),
        }
    }
}
