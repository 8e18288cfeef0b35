//! Integration tests for the collection loop.
//!
//! Tests cover:
//! - Rows written per origin and metric
//! - Fetch failures isolated to their origin
//! - Origin lists read from disk
//! - Startup failure when the database is unreachable

use collector::{collect, run_collection_with_config, Config, DatabaseConfig, OriginOutcome};
use serde_json::json;
use shared::sources::read_origins;
use shared::storage::{InMemoryRecordStore, RecordQuery, RecordStore};
use std::io::Write;
use wiremock::{MockServer, ResponseTemplate};

use super::common::{core_web_vitals, full_report, mount_origin, test_fetcher};

#[tokio::test]
async fn test_collect_stores_one_row_per_desired_metric() {
    let mock_server = MockServer::start().await;
    mount_origin(
        &mock_server,
        "https://example.com",
        ResponseTemplate::new(200).set_body_json(full_report("https://example.com")),
    )
    .await;

    let store = InMemoryRecordStore::new();
    let origins = vec!["https://example.com".to_string()];
    let summary = collect(
        &test_fetcher(&mock_server),
        &store,
        "test-key",
        &origins,
        &core_web_vitals(),
    )
    .await;

    assert_eq!(summary.rows_stored(), 3);
    assert_eq!(summary.origins_failed(), 0);
    assert_eq!(store.count().unwrap(), 3);

    let fcp = store
        .query(RecordQuery::new().with_metric("first_contentful_paint"))
        .unwrap();
    assert!(fcp.is_empty());

    let lcp = store
        .query(
            RecordQuery::new()
                .with_url("https://example.com")
                .with_metric("largest_contentful_paint"),
        )
        .unwrap();
    assert_eq!(lcp.len(), 1);
    assert_eq!(lcp[0].score, 2456.1);
    assert_eq!(lcp[0].good, 0.8);
    assert_eq!(lcp[0].needs_improvement, 0.15);
    assert_eq!(lcp[0].poor, 0.05);

    let cls = store
        .query(RecordQuery::new().with_metric("cumulative_layout_shift"))
        .unwrap();
    assert_eq!(cls[0].score, 0.05);
    assert_eq!(cls[0].good, 0.9);
}

#[tokio::test]
async fn test_failed_origins_do_not_stop_the_run() {
    let mock_server = MockServer::start().await;
    mount_origin(
        &mock_server,
        "https://missing.example",
        ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "chrome ux report data not found" }
        })),
    )
    .await;
    mount_origin(
        &mock_server,
        "https://broken.example",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;
    mount_origin(
        &mock_server,
        "https://example.com",
        ResponseTemplate::new(200).set_body_json(full_report("https://example.com")),
    )
    .await;

    let store = InMemoryRecordStore::new();
    let origins = vec![
        "https://missing.example".to_string(),
        "https://broken.example".to_string(),
        "https://example.com".to_string(),
    ];
    let summary = collect(
        &test_fetcher(&mock_server),
        &store,
        "test-key",
        &origins,
        &core_web_vitals(),
    )
    .await;

    assert_eq!(summary.origins.len(), 3);
    assert_eq!(summary.origins_failed(), 2);
    assert_eq!(summary.rows_stored(), 3);
    assert!(summary.started_at <= summary.finished_at);

    assert_eq!(summary.origins[0].origin, "https://missing.example");
    match &summary.origins[0].outcome {
        OriginOutcome::FetchFailed { error } => assert!(error.contains("404")),
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert!(matches!(
        summary.origins[1].outcome,
        OriginOutcome::FetchFailed { .. }
    ));
    assert_eq!(
        summary.origins[2].outcome,
        OriginOutcome::Stored {
            stored: 3,
            failed: 0
        }
    );

    let rows = store
        .query(RecordQuery::new().with_url("https://missing.example"))
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_metric_without_p75_is_not_stored() {
    let mock_server = MockServer::start().await;
    mount_origin(
        &mock_server,
        "https://example.com",
        ResponseTemplate::new(200).set_body_json(json!({
            "record": {
                "metrics": {
                    "largest_contentful_paint": { "percentiles": {} },
                    "interaction_to_next_paint": { "percentiles": { "p75": 220 } }
                }
            }
        })),
    )
    .await;

    let store = InMemoryRecordStore::new();
    let origins = vec!["https://example.com".to_string()];
    let summary = collect(
        &test_fetcher(&mock_server),
        &store,
        "test-key",
        &origins,
        &core_web_vitals(),
    )
    .await;

    assert_eq!(summary.rows_stored(), 1);
    let rows = store.query(RecordQuery::new()).unwrap();
    assert_eq!(rows[0].metric, "interaction_to_next_paint");
    assert_eq!(rows[0].score, 220.0);
    assert_eq!(rows[0].good, 0.0);
}

#[tokio::test]
async fn test_collect_origins_from_file() {
    let mock_server = MockServer::start().await;
    for origin in ["https://a.example", "https://b.example"] {
        mount_origin(
            &mock_server,
            origin,
            ResponseTemplate::new(200).set_body_json(full_report(origin)),
        )
        .await;
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"urls": ["https://a.example", "https://b.example"]}}"#
    )
    .unwrap();

    let origins = read_origins(file.path());
    let store = InMemoryRecordStore::new();
    let summary = collect(
        &test_fetcher(&mock_server),
        &store,
        "test-key",
        &origins,
        &["largest_contentful_paint".to_string()],
    )
    .await;

    assert_eq!(summary.rows_stored(), 2);
    let rows = store
        .query(RecordQuery::new().with_url("https://b.example"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].metric, "largest_contentful_paint");
}

#[tokio::test]
async fn test_empty_origin_list_collects_nothing() {
    let mock_server = MockServer::start().await;
    let store = InMemoryRecordStore::new();

    let summary = collect(
        &test_fetcher(&mock_server),
        &store,
        "test-key",
        &[],
        &core_web_vitals(),
    )
    .await;

    assert!(summary.origins.is_empty());
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_database_aborts_run() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config {
        database: DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..DatabaseConfig::default()
        },
        ..Config::default()
    };

    let result = run_collection_with_config(config).await;
    assert!(result.is_err());
}
