use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::atomic::{AtomicU32, Ordering};
use test_utils::factory::google_doc::{heading, paragraph, DocumentFactory};
use url::Url;

use crate::{
    model::destiny::{ReportDto, ReportState, ReportStatusDto, ReportTicketDto},
    server::service::upstream::UpstreamClient,
};

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}/", address)).unwrap()
}

/// Tests job name resolution.
///
/// Expected: known names resolve, others do not
#[test]
fn resolves_job_names() {
    assert_eq!(JobKind::from_name("document-sync"), Some(JobKind::DocumentSync));
    assert_eq!(JobKind::from_name("destiny-report"), Some(JobKind::DestinyReport));
    assert_eq!(JobKind::from_name("calendar-sync"), None);
}

/// Tests running a job whose upstream is not configured.
///
/// Expected: Err(BadRequest)
#[tokio::test]
async fn unconfigured_job_is_rejected() {
    let runner = JobRunner::new(None, None, None, 3);

    assert!(!runner.is_configured(JobKind::DocumentSync));
    assert!(matches!(
        runner.run(JobKind::DestinyReport).await,
        Err(AppError::BadRequest(_))
    ));
}

/// Tests syncing the Google Doc.
///
/// Expected: content cached and summary counting chapters and sections
#[tokio::test]
async fn document_sync_caches_content() {
    let document = DocumentFactory::new("doc")
        .element(heading("HEADING_1", "Handbook"))
        .element(heading("HEADING_2", "Raids"))
        .element(heading("HEADING_3", "Schedule"))
        .element(paragraph("Friday."))
        .element(heading("HEADING_2", "Crucible"))
        .build();
    let base = serve(Router::new().route(
        "/doc-1",
        get(move || {
            let document = document.clone();
            async move { Json(document) }
        }),
    ))
    .await;

    let runner = JobRunner::new(
        Some(DocumentSource {
            client: GoogleDocsClient::with_base(reqwest::Client::new(), "key".to_string(), base),
            document_id: "doc-1".to_string(),
        }),
        None,
        None,
        3,
    );

    let run = runner.run(JobKind::DocumentSync).await.unwrap();

    assert_eq!(run.job, "document-sync");
    assert_eq!(
        run.summary,
        "Parsed 'Handbook': 2 chapters, 1 sections, 0 assets"
    );
    let cached = runner.content();
    let cached = cached.read().await;
    assert_eq!(cached.as_ref().unwrap().chapters[0].title, "Raids");
}

/// Tests syncing while the feed rejects the publication.
///
/// Expected: error returned, parsed content still cached
#[tokio::test]
async fn document_sync_caches_before_publishing() {
    let document = DocumentFactory::new("doc")
        .element(heading("TITLE", "Handbook"))
        .element(heading("HEADING_2", "Raids"))
        .build();
    let base = serve(
        Router::new()
            .route(
                "/doc-1",
                get(move || {
                    let document = document.clone();
                    async move { Json(document) }
                }),
            )
            .route("/content", post(|| async { StatusCode::SERVICE_UNAVAILABLE })),
    )
    .await;

    let runner = JobRunner::new(
        Some(DocumentSource {
            client: GoogleDocsClient::with_base(
                reqwest::Client::new(),
                "key".to_string(),
                base.clone(),
            ),
            document_id: "doc-1".to_string(),
        }),
        None,
        Some(FeedClient::new(UpstreamClient::new(reqwest::Client::new(), base))),
        3,
    );

    assert!(runner.run(JobKind::DocumentSync).await.is_err());
    let cached = runner.content();
    let cached = cached.read().await;
    assert_eq!(cached.as_ref().unwrap().title, "Handbook");
}

/// Tests a failed document fetch.
///
/// Expected: error returned and cache left empty
#[tokio::test]
async fn document_sync_failure_keeps_cache_empty() {
    let base = serve(Router::new().route("/doc-1", get(|| async { StatusCode::NOT_FOUND }))).await;

    let runner = JobRunner::new(
        Some(DocumentSource {
            client: GoogleDocsClient::with_base(reqwest::Client::new(), "key".to_string(), base),
            document_id: "doc-1".to_string(),
        }),
        None,
        None,
        3,
    );

    assert!(runner.run(JobKind::DocumentSync).await.is_err());
    let cached = runner.content();
    assert!(cached.read().await.is_none());
}

/// Tests the report job polling until the report is ready, then publishing it.
///
/// Expected: summary after 3 status checks and one published report
#[tokio::test]
async fn destiny_report_polls_and_publishes() {
    #[derive(Default)]
    struct Upstream {
        checks: AtomicU32,
        published: AtomicU32,
    }
    let upstream = Arc::new(Upstream::default());

    let base = serve(
        Router::new()
            .route(
                "/reports",
                post(|State(upstream): State<Arc<Upstream>>, body: Json<serde_json::Value>| async move {
                    // Destiny requests carry an empty object, feed publications a report
                    if body.0.get("leaderboards").is_some() {
                        upstream.published.fetch_add(1, Ordering::SeqCst);
                        return Json(serde_json::json!({}));
                    }
                    Json(serde_json::to_value(ReportTicketDto { id: "r-1".to_string() }).unwrap())
                }),
            )
            .route(
                "/reports/{id}/status",
                get(|State(upstream): State<Arc<Upstream>>, Path(id): Path<String>| async move {
                    let check = upstream.checks.fetch_add(1, Ordering::SeqCst);
                    let state = if check < 2 {
                        ReportState::Running
                    } else {
                        ReportState::Complete
                    };
                    Json(ReportStatusDto { id, state })
                }),
            )
            .route(
                "/reports/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(ReportDto {
                        id,
                        leaderboards: vec![],
                    })
                }),
            )
            .with_state(upstream.clone()),
    )
    .await;

    let client = UpstreamClient::new(reqwest::Client::new(), base);
    let runner = JobRunner::new(
        None,
        Some(DestinyClient::new(client.clone())),
        Some(FeedClient::new(client)),
        5,
    )
    .with_poll_interval(Duration::from_millis(1));

    let run = runner.run(JobKind::DestinyReport).await.unwrap();

    assert_eq!(
        run.summary,
        "Report r-1 ready after 3 checks with 0 leaderboards"
    );
    assert_eq!(upstream.checks.load(Ordering::SeqCst), 3);
    assert_eq!(upstream.published.load(Ordering::SeqCst), 1);
}
