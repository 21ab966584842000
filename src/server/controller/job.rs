use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::server::{error::AppError, service::job::JobKind, state::AppState};

/// Run a job immediately.
///
/// Runs the job on the request task and answers once it finishes, so long polls (such as
/// `destiny-report`) keep the request open.
///
/// # Arguments
/// - `state` - Application state containing the job runner
/// - `name` - Job name, `document-sync` or `destiny-report`
///
/// # Returns
/// - `200 OK` - `JobRunDto` with the run summary
/// - `400 Bad Request` - Job upstreams are not configured
/// - `404 Not Found` - Unknown job name
/// - `500 Internal Server Error` - Upstream failure while running the job
pub async fn run_job(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(kind) = JobKind::from_name(&name) else {
        return Err(AppError::NotFound(format!("Job {} not found", name)));
    };

    let run = state.jobs.run(kind).await?;

    Ok((StatusCode::OK, Json(run)))
}
