mod model;
mod server;

use tokio::net::TcpListener;

use crate::server::{
    bot::{self, handler::Handler},
    config::Config,
    error::AppError,
    router,
    scheduler::jobs::{start_scheduler, JobSchedule},
    service::job::JobKind,
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    if std::env::args().skip(1).any(|arg| arg == "--invite") {
        return bot::start::print_invite(&config);
    }

    let http_client = startup::setup_reqwest_client()?;
    let jobs = startup::setup_job_runner(&config, &http_client)?;
    let upstreams = startup::setup_upstreams(&config, &http_client);

    tracing::info!("Starting server");

    let handler = Handler::new(&config, upstreams).await;
    let bot_client = bot::start::init_bot(&config, handler).await?;

    // Start Discord bot in a separate task
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    // Dropping the scheduler stops it
    let _scheduler = start_scheduler(
        jobs.clone(),
        vec![
            JobSchedule {
                kind: JobKind::DocumentSync,
                cron: config.document_sync_schedule.clone(),
            },
            JobSchedule {
                kind: JobKind::DestinyReport,
                cron: config.destiny_report_schedule.clone(),
            },
        ],
    )
    .await?;

    let app = router::router(&config.assets_dir).with_state(AppState::new(jobs));

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
