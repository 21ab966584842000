use crate::{
    model::destiny::{
        LeaderboardDto, PlayerSummaryDto, ReportDto, ReportStatusDto, ReportTicketDto,
    },
    server::{error::AppError, service::upstream::UpstreamClient},
};

/// Client for the Destiny stats service (`HOST_DESTINY`).
pub struct DestinyClient {
    client: UpstreamClient,
}

impl DestinyClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Looks up a player by full bungie name (`Name#1234`).
    pub async fn player(&self, bungie_name: &str) -> Result<PlayerSummaryDto, AppError> {
        self.client.get(&["players", bungie_name]).await
    }

    pub async fn leaderboard(&self, match_name: &str) -> Result<LeaderboardDto, AppError> {
        self.client.get(&["leaderboards", match_name]).await
    }

    /// Queues generation of the clan leaderboard report.
    pub async fn request_report(&self) -> Result<ReportTicketDto, AppError> {
        self.client
            .post(&["reports"], &serde_json::json!({}))
            .await
    }

    pub async fn report_status(&self, report_id: &str) -> Result<ReportStatusDto, AppError> {
        self.client.get(&["reports", report_id, "status"]).await
    }

    pub async fn report(&self, report_id: &str) -> Result<ReportDto, AppError> {
        self.client.get(&["reports", report_id]).await
    }
}
