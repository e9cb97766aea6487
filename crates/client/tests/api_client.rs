//! Integration tests for [`codejudge_client::ApiClient`] against an
//! in-process mock server.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use codejudge_client::{ApiClient, ClientError};

/// Serve `router` on an ephemeral port, returning its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{addr}"))
}

#[tokio::test]
async fn list_challenges_deserializes_wire_models() {
    let id = Uuid::new_v4();
    let router = Router::new().route(
        "/challenges",
        get(move || async move {
            Json(serde_json::json!([{
                "id": id,
                "name": "Rust CLI",
                "description": "Build a CLI tool",
                "expected_outcome": "Working binary",
                "active": true,
                "created_at": Utc::now(),
                "criteria": [],
            }]))
        }),
    );
    let addr = serve(router).await;

    let challenges = client_for(addr).list_challenges().await.unwrap();
    assert_eq!(challenges.len(), 1);
    assert_eq!(challenges[0].id, id);
    assert_eq!(challenges[0].name, "Rust CLI");
    assert!(challenges[0].criteria.is_empty());
}

#[tokio::test]
async fn configured_locale_is_sent_as_accept_language() {
    let router = Router::new().route(
        "/challenges",
        get(|headers: HeaderMap| async move {
            let locale = headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            assert_eq!(locale, "pt");
            Json(serde_json::json!([]))
        }),
    );
    let addr = serve(router).await;

    let client = client_for(addr).with_locale("pt");
    let challenges = client.list_challenges().await.unwrap();
    assert!(challenges.is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let router = Router::new().route(
        "/evaluations/rank/{challenge_id}",
        get(|Path(_challenge_id): Path<Uuid>| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "No repositories registered",
                    "code": "NOT_FOUND",
                })),
            )
        }),
    );
    let addr = serve(router).await;

    let error = client_for(addr).rank(Uuid::new_v4()).await.unwrap_err();
    match error {
        ClientError::Api { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("No repositories registered"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn evaluation_history_hits_the_nested_path() {
    let challenge_id = Uuid::new_v4();
    let repository_id = Uuid::new_v4();
    let router = Router::new().route(
        "/evaluations/repository/{challenge_id}/{repository_id}",
        get(
            move |Path((c, r)): Path<(Uuid, Uuid)>| async move {
                Json(serde_json::json!({
                    "repository": {
                        "id": r,
                        "challenge_id": c,
                        "name": "candidate",
                        "url": "https://github.com/acme/candidate",
                        "created_at": Utc::now(),
                    },
                    "evaluations": [],
                }))
            },
        ),
    );
    let addr = serve(router).await;

    let history = client_for(addr)
        .evaluation_history(challenge_id, repository_id)
        .await
        .unwrap();
    assert_eq!(history.repository.id, repository_id);
    assert_eq!(history.repository.challenge_id, challenge_id);
    assert!(history.evaluations.is_empty());
}
