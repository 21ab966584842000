use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::AppError,
    service::job::{JobKind, JobRunner},
};

/// Cron schedule for one job kind.
pub struct JobSchedule {
    pub kind: JobKind,
    pub cron: String,
}

/// Starts the job scheduler
///
/// Registers every job whose upstreams are configured; unconfigured jobs are skipped with
/// a log line. A failing run is logged and the next run proceeds on schedule.
///
/// # Arguments
/// - `runner`: Job runner shared with the HTTP dispatch endpoint
/// - `schedules`: Cron expression per job (six fields, seconds first)
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler, kept alive by the caller
/// - `Err(AppError::SchedulerErr)` - Invalid cron expression or scheduler failure
pub async fn start_scheduler(
    runner: Arc<JobRunner>,
    schedules: Vec<JobSchedule>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    for schedule in schedules {
        let kind = schedule.kind;
        if !runner.is_configured(kind) {
            tracing::info!("Job {} is not configured, not scheduling it", kind);
            continue;
        }

        let job_runner = runner.clone();
        let job = Job::new_async(schedule.cron.as_str(), move |_uuid, _lock| {
            let runner = job_runner.clone();

            Box::pin(async move {
                if let Err(e) = runner.run(kind).await {
                    tracing::error!("Error running job {}: {}", kind, e);
                }
            })
        })?;

        scheduler.add(job).await?;
        tracing::info!("Scheduled job {} with '{}'", kind, schedule.cron);
    }

    scheduler.start().await?;

    tracing::info!("Job scheduler started");

    Ok(scheduler)
}
