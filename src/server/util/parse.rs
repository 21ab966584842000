use chrono::{DateTime, Utc};

use crate::server::error::{internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// Discord snowflakes are never zero, so a zero value is rejected as well.
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a non-zero u64
pub fn parse_u64_from_string(value: &str) -> Result<u64, AppError> {
    let result = value
        .trim()
        .parse::<u64>()
        .map_err(|e| InternalError::parse_id(value, e))?;

    if result == 0 {
        return Err(InternalError::ParseStringId {
            value: value.to_string(),
            reason: "snowflake ids are never zero".to_string(),
        }
        .into());
    }

    Ok(result)
}

/// Converts Unix seconds into a UTC datetime
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Timestamp within chrono's representable range
/// - `Err(AppError::InternalErr(InvalidTimestamp))` - Timestamp out of range
pub fn datetime_from_unix(timestamp: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| InternalError::InvalidTimestamp { timestamp }.into())
}

/// Splits a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
