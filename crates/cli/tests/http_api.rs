//! HTTP API integration tests: routing, status codes and response shape.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use recall_cli::config::AppConfig;
use recall_cli::server::{router, AppState};
use recall_store::Library;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const ALPHA_ID: &str = "b00a1cca9c08ec62a1adc3bac23e10f5";

fn app(tmp: &TempDir) -> Router {
    let docs = tmp.path().join("docs");
    fs::create_dir_all(docs.join("sub")).unwrap();
    fs::write(docs.join("a.md"), "# Alpha\nbody").unwrap();
    fs::write(docs.join("sub").join("b.md"), "# Beta").unwrap();

    let config = AppConfig::new(docs, tmp.path().join("db").join("data.json"));
    let library = Library::open(config.library_config()).expect("open library");
    library.scan().expect("scan");
    router(AppState::new(Arc::new(library), config))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn lists_documents_and_tree() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, docs) = send(app.clone(), get("/api/documents")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(docs.as_array().unwrap().len(), 2);
    assert_eq!(docs[0]["title"], "Alpha");

    let (status, tree) = send(app, get("/api/folders")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree, serde_json::json!({ "sub": {} }));
}

#[tokio::test]
async fn folder_routes_match_exactly() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, sub) = send(app.clone(), get("/api/folders/sub")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sub.as_array().unwrap().len(), 1);
    assert_eq!(sub[0]["folderPath"], "sub");

    let (_, root) = send(app.clone(), get("/api/folder-documents")).await;
    assert_eq!(root.as_array().unwrap().len(), 1);
    assert_eq!(root[0]["id"], ALPHA_ID);

    let (status, body) = send(app, get("/api/folders/..")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn mark_reviewed_updates_due_list() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let uri = format!("/api/documents/{ALPHA_ID}/mark-reviewed");
    let (status, body) = send(app.clone(), post(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["document"]["reviewCount"], 1);
    assert_eq!(body["document"]["dueForReview"], false);

    let (_, due) = send(app, get("/api/documents/due-today")).await;
    let due = due.as_array().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["title"], "Beta");
}

#[tokio::test]
async fn document_content_and_missing_ids() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, doc) = send(app.clone(), get(&format!("/api/documents/{ALPHA_ID}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["content"], "# Alpha\nbody");

    let (status, body) = send(app.clone(), get("/api/documents/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(app.clone(), post("/api/documents/unknown/mark-reviewed")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    fs::remove_file(tmp.path().join("docs").join("a.md")).unwrap();
    let (status, body) = send(app, get(&format!("/api/documents/{ALPHA_ID}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("File missing"));
}

#[tokio::test]
async fn rescan_picks_up_new_files() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);
    fs::write(tmp.path().join("docs").join("c.md"), "# Gamma").unwrap();

    let (status, body) = send(app.clone(), post("/api/scan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(body["stats"]["documents"], 3);

    let (_, config) = send(app, get("/api/config")).await;
    assert!(config["markdownDir"].as_str().unwrap().ends_with("docs"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let tmp = TempDir::new().unwrap();
    let (status, _) = send(app(&tmp), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_reviews_and_reads_all_complete() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);
    let review = format!("/api/documents/{ALPHA_ID}/mark-reviewed");
    let read = format!("/api/documents/{ALPHA_ID}");

    let (first, second, content) = tokio::join!(
        send(app.clone(), post(&review)),
        send(app.clone(), post(&review)),
        send(app.clone(), get(&read)),
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    assert_eq!(content.0, StatusCode::OK);
    assert_eq!(content.1["content"], "# Alpha\nbody");

    let mut counts = vec![
        first.1["document"]["reviewCount"].as_u64().unwrap(),
        second.1["document"]["reviewCount"].as_u64().unwrap(),
    ];
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2]);

    let (_, doc) = send(app, get(&read)).await;
    assert_eq!(doc["reviewCount"], 2);
}
