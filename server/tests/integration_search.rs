use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mdsearch_core::index::{CorpusIndex, DocumentEntry};
use mdsearch_core::persist::save_index;
use mdsearch_server::{build_app, ServerConfig};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn entry(counts: &[(&str, u32)], preview: Option<&str>) -> DocumentEntry {
    DocumentEntry {
        preview: preview.map(str::to_string),
        term_frequency_map: counts.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
    }
}

/// Four documents so that a term in two of them still has a positive IDF.
fn tiny_index() -> CorpusIndex {
    let mut index = CorpusIndex::new();
    index.insert("a.html".into(), entry(&[("RUST", 5)], Some("doc a excerpt")));
    index.insert("b.html".into(), entry(&[("RUST", 2), ("GO", 1)], None));
    index.insert("c.html".into(), entry(&[("GO", 3)], None));
    index.insert("d.html".into(), entry(&[("ZIG", 1)], None));
    index
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let index_path = dir.path().join("index.json");
    save_index(&index_path, &tiny_index()).unwrap();
    let app = build_app(ServerConfig {
        index_path,
        static_dir: dir.path().to_path_buf(),
    });

    let (status, body) = call(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let hits = json["RUST"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["doc"], "a.html");
    assert_eq!(hits[1]["doc"], "b.html");
    assert!(hits[0]["tfidf"].as_f64().unwrap() > hits[1]["tfidf"].as_f64().unwrap());
    assert_eq!(hits[0]["preview"], "doc a excerpt");
}

#[tokio::test]
async fn missing_artifact_is_an_empty_result_not_an_error() {
    let dir = tempdir().unwrap();
    let app = build_app(ServerConfig {
        index_path: dir.path().join("never-built.json"),
        static_dir: dir.path().to_path_buf(),
    });

    let (status, body) = call(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

#[tokio::test]
async fn corrupt_artifact_is_a_server_error() {
    let dir = tempdir().unwrap();
    let index_path = dir.path().join("index.json");
    fs::write(&index_path, "definitely not json").unwrap();
    let app = build_app(ServerConfig {
        index_path,
        static_dir: dir.path().to_path_buf(),
    });

    let (status, _body) = call(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_term_is_absent_from_the_response() {
    let dir = tempdir().unwrap();
    let index_path = dir.path().join("index.json");
    save_index(&index_path, &tiny_index()).unwrap();
    let app = build_app(ServerConfig {
        index_path,
        static_dir: dir.path().to_path_buf(),
    });

    let (status, body) = call(app, "/search?q=cobol").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json.get("COBOL").is_none());
}

#[tokio::test]
async fn static_assets_are_served_from_the_fallback() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), "static hello").unwrap();
    let app = build_app(ServerConfig {
        index_path: dir.path().join("index.json"),
        static_dir: dir.path().to_path_buf(),
    });

    let (status, body) = call(app, "/hello.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"static hello");
}

#[tokio::test]
async fn health_endpoint_answers() {
    let dir = tempdir().unwrap();
    let app = build_app(ServerConfig {
        index_path: dir.path().join("index.json"),
        static_dir: dir.path().to_path_buf(),
    });

    let (status, body) = call(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}
