use super::*;
use crate::Config;
use crate::analysis::testing::StubAnalyzer;
use crate::error::ApiError;
use crate::store::RecordStore;
use crate::types::{AnalysisResult, Project, ScrapeProgress, SessionState, SessionStatus};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

fn test_creator(analyzer: StubAnalyzer) -> Arc<CorpusCreator> {
    Arc::new(CorpusCreator::with_parts(
        Config::default(),
        Arc::new(RecordStore::sample().unwrap()),
        Arc::new(analyzer),
    )
    .unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn read_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn projects_lists_catalog() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app.oneshot(get("/projects")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let projects: Vec<Project> = read_json(response).await;
    let keys: Vec<&str> = projects.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["SPARK", "KAFKA", "HADOOP", "FLINK", "BEAM", "AIRFLOW"]
    );
}

#[tokio::test]
async fn empty_selection_is_bad_request() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app
        .oneshot(post_json("/scrapes", serde_json::json!({ "projects": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = read_json(response).await;
    assert_eq!(error.error.code, "no_projects_selected");
}

#[tokio::test(start_paused = true)]
async fn scrape_lifecycle_over_http() {
    let creator = test_creator(StubAnalyzer::replying("Themes"));
    let app = create_router(Arc::clone(&creator));

    let response = app
        .clone()
        .oneshot(post_json(
            "/scrapes",
            serde_json::json!({ "projects": ["SPARK", "HADOOP"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let initial: ScrapeProgress = read_json(response).await;
    assert_eq!(initial.total_projects, 2);
    assert_eq!(initial.status_message, "Initializing simulation...");

    // A second start while running conflicts
    let response = app
        .clone()
        .oneshot(post_json(
            "/scrapes",
            serde_json::json!({ "projects": ["KAFKA"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // No corpus while the run is active
    let response = app.clone().oneshot(get("/scrapes/corpus")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    creator.wait_for_scrape().await.unwrap();

    let response = app.clone().oneshot(get("/scrapes/status")).await.unwrap();
    let status: SessionStatus = read_json(response).await;
    assert_eq!(status.state, SessionState::Complete);
    assert_eq!(status.issue_count, 3);
    assert!(status.corpus_sha256.is_some());

    let response = app.clone().oneshot(get("/scrapes/corpus")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/x-ndjson"
    );
    let corpus = read_text(response).await;
    assert_eq!(corpus.lines().count(), 3);
    assert!(!corpus.ends_with('\n'));

    let response = app.oneshot(post_empty("/analysis")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let analysis: AnalysisResult = read_json(response).await;
    assert_eq!(analysis.text, "Themes");
    assert_eq!(analysis.model, "stub-model");
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_over_http() {
    let creator = test_creator(StubAnalyzer::replying(""));
    let app = create_router(Arc::clone(&creator));

    // Stopping an idle session is fine
    let response = app.clone().oneshot(post_empty("/scrapes/stop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status: SessionStatus = read_json(response).await;
    assert_eq!(status.state, SessionState::Idle);

    app.clone()
        .oneshot(post_json(
            "/scrapes",
            serde_json::json!({ "projects": ["SPARK"] }),
        ))
        .await
        .unwrap();
    for _ in 0..2 {
        let response = app.clone().oneshot(post_empty("/scrapes/stop")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    creator.wait_for_scrape().await.unwrap();

    let response = app.oneshot(get("/scrapes/status")).await.unwrap();
    let status: SessionStatus = read_json(response).await;
    assert_eq!(status.state, SessionState::Stopped);
    assert_eq!(status.progress.status_message, "Scraping stopped by user.");
}

#[tokio::test]
async fn analysis_without_corpus_is_not_found() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app.oneshot(post_empty("/analysis")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ApiError = read_json(response).await;
    assert_eq!(error.error.code, "no_corpus");
}

#[tokio::test(start_paused = true)]
async fn analyzer_failure_is_bad_gateway() {
    let creator = test_creator(StubAnalyzer::failing());
    creator.start_scrape(vec!["KAFKA".to_string()]).unwrap();
    creator.wait_for_scrape().await.unwrap();

    let app = create_router(creator);
    let response = app.oneshot(post_empty("/analysis")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: ApiError = read_json(response).await;
    assert_eq!(error.error.code, "analysis_failed");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app.oneshot(get("/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc: serde_json::Value = read_json(response).await;
    assert!(doc["paths"]["/scrapes"].is_object());
}

#[tokio::test]
async fn events_endpoint_streams_sse() {
    let app = create_router(test_creator(StubAnalyzer::replying("")));
    let response = app.oneshot(get("/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
}

#[test]
fn cors_layer_accepts_wildcard_and_explicit_origins() {
    let _ = build_cors_layer(&["*".to_string()]);
    let _ = build_cors_layer(&[]);
    let _ = build_cors_layer(&["http://localhost:3000".to_string()]);
}
