//! Background jobs run on a schedule or dispatched over HTTP.
//!
//! - `document-sync` fetches the community Google Doc, parses it, caches the result for
//!   `GET /api/content` and publishes it to the feed.
//! - `destiny-report` asks the Destiny service for a leaderboard report, polls until it is
//!   ready and publishes it to the feed.

pub mod poll;

#[cfg(test)]
mod test;

use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::{
    model::{api::JobRunDto, content::DocumentContent},
    server::{
        error::AppError,
        service::{
            document::parse_document,
            upstream::{destiny::DestinyClient, feed::FeedClient, google_docs::GoogleDocsClient},
        },
    },
};

use self::poll::{poll_until_complete, REPORT_POLL_INTERVAL};

/// Most recently parsed document, shared with the HTTP layer.
pub type ContentCache = Arc<RwLock<Option<DocumentContent>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    DocumentSync,
    DestinyReport,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [JobKind::DocumentSync, JobKind::DestinyReport];

    pub fn name(self) -> &'static str {
        match self {
            JobKind::DocumentSync => "document-sync",
            JobKind::DestinyReport => "destiny-report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Google Doc source for the `document-sync` job.
pub struct DocumentSource {
    pub client: GoogleDocsClient,
    pub document_id: String,
}

pub struct JobRunner {
    document: Option<DocumentSource>,
    destiny: Option<DestinyClient>,
    feed: Option<FeedClient>,
    content: ContentCache,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl JobRunner {
    pub fn new(
        document: Option<DocumentSource>,
        destiny: Option<DestinyClient>,
        feed: Option<FeedClient>,
        poll_attempts: u32,
    ) -> Self {
        Self {
            document,
            destiny,
            feed,
            content: ContentCache::default(),
            poll_attempts,
            poll_interval: REPORT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn content(&self) -> ContentCache {
        self.content.clone()
    }

    /// Whether the upstreams a job needs are configured.
    pub fn is_configured(&self, kind: JobKind) -> bool {
        match kind {
            JobKind::DocumentSync => self.document.is_some(),
            JobKind::DestinyReport => self.destiny.is_some(),
        }
    }

    /// Runs a job to completion.
    ///
    /// # Arguments
    /// - `kind` - Job to run
    ///
    /// # Returns
    /// - `Ok(JobRunDto)` - Job finished, with a one-line summary
    /// - `Err(AppError::BadRequest)` - Upstreams for the job are not configured
    /// - `Err(AppError)` - Upstream request or polling failed
    pub async fn run(&self, kind: JobKind) -> Result<JobRunDto, AppError> {
        tracing::info!("Running job {}", kind);

        let summary = match kind {
            JobKind::DocumentSync => self.sync_document().await?,
            JobKind::DestinyReport => self.destiny_report().await?,
        };

        tracing::info!("Job {} finished: {}", kind, summary);

        Ok(JobRunDto {
            job: kind.name().to_string(),
            summary,
        })
    }

    async fn sync_document(&self) -> Result<String, AppError> {
        let source = self.document.as_ref().ok_or_else(|| not_configured(JobKind::DocumentSync))?;

        let document = source.client.fetch(&source.document_id).await?;
        let content = parse_document(&document);

        let summary = format!(
            "Parsed '{}': {} chapters, {} sections, {} assets",
            content.title,
            content.chapters.len(),
            content
                .chapters
                .iter()
                .map(|chapter| chapter.sections.len())
                .sum::<usize>(),
            content.assets.len()
        );

        // Served over HTTP even when publishing fails
        *self.content.write().await = Some(content.clone());

        if let Some(feed) = &self.feed {
            feed.publish_content(&content).await?;
        }

        Ok(summary)
    }

    async fn destiny_report(&self) -> Result<String, AppError> {
        let destiny = self.destiny.as_ref().ok_or_else(|| not_configured(JobKind::DestinyReport))?;

        let ticket = destiny.request_report().await?;
        tracing::debug!("Requested Destiny report {}", ticket.id);

        let attempts = poll_until_complete(self.poll_attempts, self.poll_interval, || async {
            Ok(destiny.report_status(&ticket.id).await?.state)
        })
        .await?;

        let report = destiny.report(&ticket.id).await?;

        if let Some(feed) = &self.feed {
            feed.publish_report(&report).await?;
        }

        Ok(format!(
            "Report {} ready after {} checks with {} leaderboards",
            report.id,
            attempts,
            report.leaderboards.len()
        ))
    }
}

fn not_configured(kind: JobKind) -> AppError {
    AppError::BadRequest(format!("Job {} is not configured", kind))
}
