//! Provider adapter tests against a mock HTTP server.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use seatsweep::config::{ProviderConfig, SeatsweepConfig};
use seatsweep::directory::DirectoryReader;
use seatsweep::errors::SweepError;
use seatsweep::provider::{build_sweeper, HttpDirectoryReader, HttpSeatRegistry, ProviderClient};
use seatsweep::revoker::{SeatRegistry, SeatRevocation};

const USERS: &str = "/accounts/acc-1/access/users";
const SEATS: &str = "/accounts/acc-1/access/seats";

fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        api_base_url: server.base_url(),
        account_id: "acc-1".to_string(),
        auth_email: "ops@example.com".to_string(),
        api_key: "secret-key".to_string(),
        per_page: 2,
        timeout_secs: 5,
    }
}

fn client(server: &MockServer) -> Arc<ProviderClient> {
    Arc::new(ProviderClient::new(&provider_config(server)).unwrap())
}

#[tokio::test]
async fn fetch_sends_auth_headers_and_decodes_users() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(USERS)
            .query_param("page", "1")
            .query_param("per_page", "2")
            .header("X-Auth-Email", "ops@example.com")
            .header("X-Auth-Key", "secret-key");
        then.status(200).json_body(json!({
            "success": true,
            "errors": [],
            "result": [
                { "id": "1", "email": "a@example.com", "seat_uid": "s-1",
                  "last_successful_login": "2024-01-01T00:00:00Z" },
                { "id": "2", "email": "b@example.com" }
            ]
        }));
    });

    let users = HttpDirectoryReader::new(client(&server)).fetch().await.unwrap();

    mock.assert();
    assert_eq!(users.len(), 2);
    assert!(users[0].last_successful_login.is_some());
    assert_eq!(users[1].seat_id_or_unavailable(), "unavailable");
    assert!(users[1].last_successful_login.is_none());
}

#[tokio::test]
async fn fetch_follows_pagination() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path(USERS).query_param("page", "1");
        then.status(200).json_body(json!({
            "success": true,
            "result": [{ "email": "a@example.com" }, { "email": "b@example.com" }],
            "result_info": { "page": 1, "per_page": 2, "total_pages": 2, "total_count": 3 }
        }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path(USERS).query_param("page", "2");
        then.status(200).json_body(json!({
            "success": true,
            "result": [{ "email": "c@example.com" }],
            "result_info": { "page": 2, "per_page": 2, "total_pages": 2, "total_count": 3 }
        }));
    });

    let users = HttpDirectoryReader::new(client(&server)).fetch().await.unwrap();

    page1.assert();
    page2.assert();
    let emails: Vec<_> = users.iter().map(|u| u.email_or_unknown().to_string()).collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com", "c@example.com"]);
}

#[tokio::test]
async fn fetch_failure_carries_errors_verbatim() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS);
        then.status(403).json_body(json!({
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "result": null
        }));
    });

    let err = HttpDirectoryReader::new(client(&server))
        .fetch()
        .await
        .unwrap_err();

    match err {
        SweepError::DirectoryFetch { errors } => {
            assert_eq!(errors, json!([{ "code": 10000, "message": "Authentication error" }]))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failing_later_page_fails_the_whole_fetch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS).query_param("page", "1");
        then.status(200).json_body(json!({
            "success": true,
            "result": [{ "email": "a@example.com" }],
            "result_info": { "total_pages": 2 }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path(USERS).query_param("page", "2");
        then.status(500).json_body(json!({ "success": false, "errors": ["boom"] }));
    });

    let result = HttpDirectoryReader::new(client(&server)).fetch().await;
    assert!(matches!(result, Err(SweepError::DirectoryFetch { .. })));
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS);
        then.status(502).body("Bad Gateway");
    });

    let err = HttpDirectoryReader::new(client(&server))
        .fetch()
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::InvalidResponse(_)));
    assert!(err.to_string().contains("HTTP 502"));
}

#[tokio::test]
async fn disable_seats_patches_bulk_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path(SEATS)
            .header("X-Auth-Key", "secret-key")
            .json_body(json!([
                { "access_seat": false, "gateway_seat": false, "seat_uid": "s-1" },
                { "access_seat": false, "gateway_seat": false, "seat_uid": "s-2" }
            ]));
        then.status(200).json_body(json!({ "success": true, "errors": [], "result": [] }));
    });

    let registry = HttpSeatRegistry::new(client(&server));
    registry
        .disable_seats(&[SeatRevocation::disable("s-1"), SeatRevocation::disable("s-2")])
        .await
        .unwrap();

    mock.assert();
}

#[tokio::test]
async fn rejected_seat_update_keeps_payload() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path(SEATS);
        then.status(400).json_body(json!({
            "success": false,
            "errors": [{ "code": 12130, "message": "seat not found" }]
        }));
    });

    let err = HttpSeatRegistry::new(client(&server))
        .disable_seats(&[SeatRevocation::disable("missing")])
        .await
        .unwrap_err();

    assert_eq!(err.detail()[0]["code"], 12130);
}

#[tokio::test]
async fn full_sweep_against_mock_provider() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS);
        then.status(200).json_body(json!({
            "success": true,
            "result": [
                { "email": "old1@example.com", "seat_uid": "s-1",
                  "last_successful_login": "2000-01-01T00:00:00Z" },
                { "email": "old2@example.com", "seat_uid": "s-2",
                  "last_successful_login": "2000-01-02T00:00:00Z" },
                { "email": "old3@example.com", "seat_uid": "s-3",
                  "last_successful_login": "2000-01-03T00:00:00Z" },
                { "email": "never@example.com", "seat_uid": "s-4" }
            ]
        }));
    });
    let first = server.mock(|when, then| {
        when.method(PATCH).path(SEATS).json_body(json!([
            { "access_seat": false, "gateway_seat": false, "seat_uid": "s-1" },
            { "access_seat": false, "gateway_seat": false, "seat_uid": "s-2" }
        ]));
        then.status(200).json_body(json!({ "success": true }));
    });
    let second = server.mock(|when, then| {
        when.method(PATCH).path(SEATS).json_body(json!([
            { "access_seat": false, "gateway_seat": false, "seat_uid": "s-3" }
        ]));
        then.status(200).json_body(json!({ "success": false, "errors": ["nope"] }));
    });

    let mut config = SeatsweepConfig::default();
    config.provider = provider_config(&server);
    let sweeper = build_sweeper(&config).unwrap();

    let summary = sweeper.run_sweep(5.0, 2).await.unwrap();

    first.assert_calls(1);
    second.assert_calls(1);
    assert_eq!(summary.total_users, 4);
    assert_eq!(summary.inactive_count, 3);
    assert_eq!(summary.deleted_count, 2);
    assert_eq!(summary.deleted_identifiers, vec!["old1@example.com", "old2@example.com"]);
    assert_eq!(summary.failed_batches[0].detail, json!(["nope"]));
}
