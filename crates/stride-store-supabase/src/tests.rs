//! `SupabaseStore` against a mock PostgREST server.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use stride_core::{log::NewCompiledLog, store::EntryStore};
use wiremock::{
  Mock, MockServer, Request, ResponseTemplate,
  matchers::{body_partial_json, header, method, path, query_param},
};

use crate::{Error, SupabaseConfig, SupabaseStore};

fn store(server: &MockServer) -> SupabaseStore {
  SupabaseStore::new(SupabaseConfig {
    url:         server.uri(),
    service_key: "service-key".into(),
  })
  .unwrap()
}

#[tokio::test]
async fn entries_since_filters_by_user_and_week() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/rest/v1/entries"))
    .and(header("apikey", "service-key"))
    .and(header("authorization", "Bearer service-key"))
    .and(query_param("user_id", "eq.u1"))
    .and(query_param("created_at", "gte.2024-01-01T00:00:00Z"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      { "user_id": "u1", "content": "B", "created_at": "2024-01-02T09:00:00.123456+00:00" },
      { "user_id": "u1", "content": "A", "created_at": "2024-01-01T09:00:00+00:00" }
    ])))
    .expect(1)
    .mount(&server)
    .await;

  let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  let entries = store(&server).entries_since("u1", since).await.unwrap();
  // Order is whatever the store returned.
  let contents: Vec<&str> = entries.iter().map(|e| e.content.as_str()).collect();
  assert_eq!(contents, ["B", "A"]);
}

#[tokio::test]
async fn upsert_posts_merge_request_and_returns_row() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/rest/v1/compiled_logs"))
    .and(query_param("on_conflict", "user_id,week_start"))
    .and(|req: &Request| {
      req.headers.get("prefer").and_then(|v| v.to_str().ok())
        == Some("resolution=merge-duplicates,return=representation")
    })
    .and(body_partial_json(json!([{
      "user_id": "u1",
      "week_start": "2024-01-01",
      "markdown_blob": "## Week of 2024-01-01"
    }])))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
      "id": 17,
      "user_id": "u1",
      "week_start": "2024-01-01",
      "markdown_blob": "## Week of 2024-01-01",
      "created_at": "2024-01-03T15:00:00+00:00"
    }])))
    .expect(1)
    .mount(&server)
    .await;

  let log = store(&server)
    .upsert_compiled_log(NewCompiledLog {
      user_id:       "u1".into(),
      week_start:    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      markdown_blob: "## Week of 2024-01-01".into(),
      created_at:    Utc.with_ymd_and_hms(2024, 1, 3, 15, 0, 0).unwrap(),
    })
    .await
    .unwrap();
  assert_eq!(log.id.as_str(), "17");
  assert_eq!(log.week_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[tokio::test]
async fn upsert_with_empty_representation_is_an_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
    .mount(&server)
    .await;

  let err = store(&server)
    .upsert_compiled_log(NewCompiledLog {
      user_id:       "u1".into(),
      week_start:    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      markdown_blob: "x".into(),
      created_at:    Utc::now(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyResponse(_)));
}

#[tokio::test]
async fn postgrest_error_is_surfaced_with_body() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(
      ResponseTemplate::new(401)
        .set_body_string(r#"{"message":"Invalid API key"}"#),
    )
    .mount(&server)
    .await;

  let err = store(&server)
    .entries_since("u1", Utc::now())
    .await
    .unwrap_err();
  match &err {
    Error::Api { status, body } => {
      assert_eq!(*status, 401);
      assert!(body.contains("Invalid API key"));
    }
    other => panic!("expected Api error, got {other:?}"),
  }
  assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn list_compiled_logs_orders_newest_first() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/rest/v1/compiled_logs"))
    .and(query_param("user_id", "eq.u1"))
    .and(query_param("order", "week_start.desc"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      {
        "id": "b", "user_id": "u1", "week_start": "2024-01-08",
        "markdown_blob": "later", "created_at": "2024-01-09T10:00:00+00:00"
      },
      {
        "id": "a", "user_id": "u1", "week_start": "2024-01-01",
        "markdown_blob": "earlier", "created_at": "2024-01-02T10:00:00+00:00"
      }
    ])))
    .mount(&server)
    .await;

  let logs = store(&server).list_compiled_logs("u1").await.unwrap();
  let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
  assert_eq!(ids, ["b", "a"]);
}
