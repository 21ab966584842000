//! Clients exercised against a local axum server standing in for the upstream services.

use super::*;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serenity::all::{GuildId, UserId};
use std::collections::HashMap;

use crate::model::{
    content::DocumentContent,
    destiny::{LinkedAccountDto, PlayerSummaryDto, ReportState, ReportStatusDto},
    settings::RoleDecaySeedDto,
};

use self::{
    accounts::AccountsClient, destiny::DestinyClient, feed::FeedClient,
    google_docs::GoogleDocsClient, settings::SettingsClient,
};

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}/api/", address)).unwrap()
}

fn upstream(base: Url) -> UpstreamClient {
    UpstreamClient::new(reqwest::Client::new(), base)
}

/// Tests that path segments are percent-encoded individually.
///
/// Expected: `#` and spaces encoded, base path kept
#[test]
fn encodes_path_segments() {
    let client = upstream(Url::parse("http://destiny.internal/api").unwrap());

    let url = client.endpoint(&["players", "Guardian Prime#0042"]).unwrap();

    assert_eq!(
        url.as_str(),
        "http://destiny.internal/api/players/Guardian%20Prime%230042"
    );
}

/// Tests a player lookup round trip through the Destiny client.
///
/// Expected: the server receives the decoded bungie name and the DTO is decoded
#[tokio::test]
async fn destiny_player_lookup() {
    let base = serve(Router::new().route(
        "/api/players/{name}",
        get(|Path(name): Path<String>| async move {
            Json(PlayerSummaryDto {
                bungie_name: name,
                membership_id: "4611686018".to_string(),
                characters: vec![],
            })
        }),
    ))
    .await;

    let player = DestinyClient::new(upstream(base))
        .player("Guardian#0042")
        .await
        .unwrap();

    assert_eq!(player.bungie_name, "Guardian#0042");
    assert_eq!(player.membership_id, "4611686018");
}

/// Tests report status decoding.
///
/// Expected: lowercase state decoded into ReportState::Running
#[tokio::test]
async fn destiny_report_status() {
    let base = serve(Router::new().route(
        "/api/reports/{id}/status",
        get(|Path(id): Path<String>| async move {
            Json(serde_json::json!({ "id": id, "state": "running" }))
        }),
    ))
    .await;

    let status = DestinyClient::new(upstream(base))
        .report_status("r-1")
        .await
        .unwrap();

    assert_eq!(
        status,
        ReportStatusDto {
            id: "r-1".to_string(),
            state: ReportState::Running,
        }
    );
}

/// Tests that non-2xx responses become errors.
///
/// Expected: Err(AppError::ReqwestErr) with the status attached
#[tokio::test]
async fn non_success_status_is_error() {
    let base = serve(Router::new().route(
        "/api/leaderboards/{name}",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let result = DestinyClient::new(upstream(base)).leaderboard("trials").await;

    match result {
        Err(AppError::ReqwestErr(e)) => {
            assert_eq!(e.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
        other => panic!("expected request error, got {:?}", other.map(|_| ())),
    }
}

/// Tests resolving a linked bungie name.
///
/// Expected: Some for a linked account, None for a blank name
#[tokio::test]
async fn accounts_linked_name() {
    let base = serve(Router::new().route(
        "/api/accounts/discord/{id}",
        get(|Path(id): Path<String>| async move {
            let bungie_name = (id == "7").then(|| "Guardian#0042".to_string());
            Json(LinkedAccountDto {
                discord_id: id,
                bungie_name: bungie_name.or_else(|| Some(" ".to_string())),
            })
        }),
    ))
    .await;
    let accounts = AccountsClient::new(upstream(base));

    assert_eq!(
        accounts.linked_bungie_name(UserId::new(7)).await.unwrap(),
        Some("Guardian#0042".to_string())
    );
    assert_eq!(accounts.linked_bungie_name(UserId::new(8)).await.unwrap(), None);
}

/// Tests fetching the role decay seed for a guild.
///
/// Expected: camelCase payload decoded into RoleDecaySeedDto
#[tokio::test]
async fn settings_role_decay_seed() {
    let base = serve(Router::new().route(
        "/api/role-decay/{guild}",
        get(|Path(guild): Path<String>| async move {
            assert_eq!(guild, "42");
            Json(serde_json::json!({
                "lastInteractions": { "7": 1_700_000_000 },
                "dontWant": ["8"],
            }))
        }),
    ))
    .await;

    let seed = SettingsClient::new(upstream(base))
        .role_decay_seed(GuildId::new(42))
        .await
        .unwrap();

    assert_eq!(
        seed,
        RoleDecaySeedDto {
            last_interactions: HashMap::from([("7".to_string(), 1_700_000_000)]),
            dont_want: vec!["8".to_string()],
        }
    );
}

/// Tests publishing parsed content to the feed.
///
/// Expected: Ok after a 204 response
#[tokio::test]
async fn feed_publish_content() {
    let base = serve(Router::new().route(
        "/api/content",
        post(|Json(content): Json<DocumentContent>| async move {
            assert_eq!(content.title, "Handbook");
            StatusCode::NO_CONTENT
        }),
    ))
    .await;

    let content = DocumentContent {
        title: "Handbook".to_string(),
        ..DocumentContent::default()
    };

    FeedClient::new(upstream(base))
        .publish_content(&content)
        .await
        .unwrap();
}

/// Tests that the Docs client sends the API key as a query parameter.
///
/// Expected: document decoded when the key matches
#[tokio::test]
async fn google_docs_fetch_with_key() {
    let base = serve(Router::new().route(
        "/api/{id}",
        get(
            |Path(id): Path<String>, Query(query): Query<HashMap<String, String>>| async move {
                if query.get("key").map(String::as_str) != Some("secret") {
                    return Err(StatusCode::FORBIDDEN);
                }
                Ok(Json(serde_json::json!({ "documentId": id, "title": "Handbook" })))
            },
        ),
    ))
    .await;

    let client = GoogleDocsClient::with_base(reqwest::Client::new(), "secret".to_string(), base);
    let document = client.fetch("doc-1").await.unwrap();

    assert_eq!(document.title, "Handbook");
}
