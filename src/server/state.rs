//! Application state shared across all request handlers.
//!
//! The state is initialized once during startup and cloned for each request handler
//! through Axum's state extraction. Both fields are reference counted, so clones share
//! the same content cache and job runner as the scheduler.

use std::sync::Arc;

use crate::server::service::job::{ContentCache, JobRunner};

#[derive(Clone)]
pub struct AppState {
    /// Last document parsed by `document-sync`, empty until the first successful run.
    pub content: ContentCache,

    /// Runner shared with the cron scheduler so HTTP dispatch and scheduled runs behave
    /// the same.
    pub jobs: Arc<JobRunner>,
}

impl AppState {
    pub fn new(jobs: Arc<JobRunner>) -> Self {
        Self {
            content: jobs.content(),
            jobs,
        }
    }
}
