use crate::{
    model::{content::DocumentContent, destiny::ReportDto},
    server::{error::AppError, service::upstream::UpstreamClient},
};

/// Client for the public API feed (`HOST_API_FEED`) that serves site content.
pub struct FeedClient {
    client: UpstreamClient,
}

impl FeedClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    pub async fn publish_content(&self, content: &DocumentContent) -> Result<(), AppError> {
        self.client.post_empty(&["content"], content).await
    }

    pub async fn publish_report(&self, report: &ReportDto) -> Result<(), AppError> {
        self.client.post_empty(&["reports"], report).await
    }
}
