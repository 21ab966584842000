use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::server::{
    config::Config,
    error::AppError,
    service::{
        job::{DocumentSource, JobRunner},
        upstream::{
            accounts::AccountsClient, destiny::DestinyClient, feed::FeedClient,
            google_docs::GoogleDocsClient, settings::SettingsClient, UpstreamClient,
        },
    },
};

const DEFAULT_LOG_FILTER: &str = "info,guildhall=debug";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Installs the global tracing subscriber.
///
/// Honours `RUST_LOG` when set, otherwise logs `info` and above plus `debug` for this
/// crate.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds the HTTP client shared by every upstream client.
///
/// Redirects are disabled so that a misconfigured upstream cannot bounce requests to an
/// unexpected host.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ReqwestErr)` - TLS backend failed to initialise
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()?;

    Ok(client)
}

/// Upstream service clients, present for each configured `HOST_*` variable.
pub struct Upstreams {
    pub destiny: Option<DestinyClient>,
    pub accounts: Option<AccountsClient>,
    pub feed: Option<FeedClient>,
    pub settings: Option<SettingsClient>,
}

pub fn setup_upstreams(config: &Config, http_client: &reqwest::Client) -> Upstreams {
    let client = |base: &Option<Url>| {
        base.clone()
            .map(|base| UpstreamClient::new(http_client.clone(), base))
    };

    Upstreams {
        destiny: client(&config.host_destiny).map(DestinyClient::new),
        accounts: client(&config.host_accounts).map(AccountsClient::new),
        feed: client(&config.host_api_feed).map(FeedClient::new),
        settings: client(&config.host_discord).map(SettingsClient::new),
    }
}

/// Builds the job runner from the configured upstreams.
///
/// The Destiny and feed clients are built separately from [`setup_upstreams`] since the
/// bot keeps its own copies for slash commands.
pub fn setup_job_runner(
    config: &Config,
    http_client: &reqwest::Client,
) -> Result<Arc<JobRunner>, AppError> {
    let document = match &config.google_doc {
        Some(google_doc) => Some(DocumentSource {
            client: GoogleDocsClient::new(http_client.clone(), google_doc.api_key.clone())?,
            document_id: google_doc.document_id.clone(),
        }),
        None => None,
    };

    let upstreams = setup_upstreams(config, http_client);

    Ok(Arc::new(JobRunner::new(
        document,
        upstreams.destiny,
        upstreams.feed,
        config.report_poll_attempts,
    )))
}
