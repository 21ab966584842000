use chrono::TimeDelta;
use std::{collections::HashMap, path::PathBuf, time::Duration};
use url::Url;

use crate::server::{
    error::{config::ConfigError, AppError},
    model::{
        role_decay::{ChannelScope, RoleDecaySettings},
        voice::ChannelTemplate,
    },
    util::parse::parse_list,
};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_ROLE_DECAY_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_ROLE_DECAY_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_DOCUMENT_SYNC_SCHEDULE: &str = "0 */15 * * * *";
const DEFAULT_DESTINY_REPORT_SCHEDULE: &str = "0 0 * * * *";
const DEFAULT_REPORT_POLL_ATTEMPTS: u32 = 30;

/// Role decay configuration, present only when `ROLE_DECAY_ROLE` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDecayConfig {
    pub settings: RoleDecaySettings,
    pub scope: ChannelScope,
}

/// Google Doc published as site content.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleDocConfig {
    pub document_id: String,
    pub api_key: String,
}

pub struct Config {
    pub discord_bot_token: String,
    /// Application id, only needed to print the invite URL.
    pub discord_client_id: Option<String>,

    pub bind_address: String,
    pub assets_dir: PathBuf,

    pub host_discord: Option<Url>,
    pub host_destiny: Option<Url>,
    pub host_accounts: Option<Url>,
    pub host_api_feed: Option<Url>,

    pub google_doc: Option<GoogleDocConfig>,

    pub role_decay: Option<RoleDecayConfig>,
    pub join_to_create: HashMap<String, ChannelTemplate>,

    pub document_sync_schedule: String,
    pub destiny_report_schedule: String,
    pub report_poll_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Arguments
    /// - `lookup` - Returns the value of a variable by name
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and all values parsed
    /// - `Err(AppError::ConfigErr)` - Missing required variable or unparsable value
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let role_decay = match var("ROLE_DECAY_ROLE") {
            Some(role_name) => Some(RoleDecayConfig {
                settings: RoleDecaySettings {
                    role_name,
                    decay: parse_seconds(
                        "ROLE_DECAY_DURATION_SECS",
                        var("ROLE_DECAY_DURATION_SECS"),
                        DEFAULT_ROLE_DECAY_SECS,
                    )?,
                    interval: Duration::from_secs(parse_number(
                        "ROLE_DECAY_INTERVAL_SECS",
                        var("ROLE_DECAY_INTERVAL_SECS"),
                        DEFAULT_ROLE_DECAY_INTERVAL_SECS,
                    )?),
                },
                scope: ChannelScope::new(
                    var("ROLE_DECAY_CATEGORIES")
                        .map(|v| parse_list(&v))
                        .unwrap_or_default(),
                    var("ROLE_DECAY_CHANNELS")
                        .map(|v| parse_list(&v))
                        .unwrap_or_default(),
                ),
            }),
            None => None,
        };

        let join_to_create = match var("JOIN_TO_CREATE") {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                var: "JOIN_TO_CREATE".to_string(),
                reason: e.to_string(),
            })?,
            None => HashMap::new(),
        };

        let google_doc = match (var("GOOGLE_DOC_ID"), var("GOOGLE_API_KEY")) {
            (Some(document_id), Some(api_key)) => Some(GoogleDocConfig {
                document_id,
                api_key,
            }),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()).into())
            }
            _ => None,
        };

        Ok(Self {
            discord_bot_token: var("DISCORD_BOT_TOKEN")
                .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            discord_client_id: var("DISCORD_CLIENT_ID"),
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            assets_dir: PathBuf::from(
                var("ASSETS_DIR").unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()),
            ),
            host_discord: parse_url("HOST_DISCORD", var("HOST_DISCORD"))?,
            host_destiny: parse_url("HOST_DESTINY", var("HOST_DESTINY"))?,
            host_accounts: parse_url("HOST_ACCOUNTS", var("HOST_ACCOUNTS"))?,
            host_api_feed: parse_url("HOST_API_FEED", var("HOST_API_FEED"))?,
            google_doc,
            role_decay,
            join_to_create,
            document_sync_schedule: var("DOCUMENT_SYNC_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_DOCUMENT_SYNC_SCHEDULE.to_string()),
            destiny_report_schedule: var("DESTINY_REPORT_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_DESTINY_REPORT_SCHEDULE.to_string()),
            report_poll_attempts: parse_number(
                "REPORT_POLL_ATTEMPTS",
                var("REPORT_POLL_ATTEMPTS"),
                DEFAULT_REPORT_POLL_ATTEMPTS,
            )?,
        })
    }
}

fn parse_url(var: &str, value: Option<String>) -> Result<Option<Url>, ConfigError> {
    value
        .map(|value| {
            Url::parse(&value).map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_number<T>(var: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// Parses a whole number of seconds into a `TimeDelta`, rejecting out of range values.
fn parse_seconds(var: &str, value: Option<String>, default: u64) -> Result<TimeDelta, ConfigError> {
    let seconds = parse_number(var, value, default)?;

    i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| ConfigError::InvalidValue {
            var: var.to_string(),
            reason: format!("{} seconds is out of range", seconds),
        })
}
