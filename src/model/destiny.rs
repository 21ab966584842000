use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummaryDto {
    pub bungie_name: String,
    pub membership_id: String,
    #[serde(default)]
    pub characters: Vec<CharacterDto>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDto {
    pub class_name: String,
    pub light: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct LeaderboardDto {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LeaderboardEntryDto>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub rank: u32,
    pub bungie_name: String,
    pub value: f64,
}

/// Handle returned when a report generation job is queued upstream.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ReportTicketDto {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ReportStatusDto {
    pub id: String,
    pub state: ReportState,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReportState {
    Pending,
    Running,
    Complete,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ReportDto {
    pub id: String,
    #[serde(default)]
    pub leaderboards: Vec<LeaderboardDto>,
}

/// Discord account link as stored by the accounts service.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccountDto {
    pub discord_id: String,
    pub bungie_name: Option<String>,
}
