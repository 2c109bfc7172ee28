//! HTTP client tests against a local mock sort service
//!
//! Each test starts an axum server on an ephemeral port and points a
//! `FaceSortClient` at it.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use facesort::api::{Endpoint, FaceSortClient, SortRequest};
use facesort::error::SortError;
use facesort::model::results::Partition;
use facesort::model::settings::Settings;
use facesort::model::staging::StagedFile;

/// (field name, file name, text body or byte length)
type SeenFields = Arc<Mutex<Vec<(String, Option<String>, String)>>>;

async fn spawn_service(router: Router) -> Endpoint {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock service");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock service");
    });
    Endpoint::parse(&format!("http://{}/", addr)).expect("endpoint")
}

async fn record_sort(State(seen): State<SeenFields>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let body = if file_name.is_some() {
            field.bytes().await.expect("file bytes").len().to_string()
        } else {
            field.text().await.expect("text field")
        };
        seen.lock().unwrap().push((name, file_name, body));
    }

    Json(json!({
        "run_id": "5f0c2a9e-77aa-4f1e-9a52-1c0d1f2b3c4d",
        "target_label": "face",
        "target_score": 0.8731,
        "matched_count": 2,
        "not_matched_count": 1,
        "total_scanned": 3,
        "matched_preview_urls": ["http://svc/static/m/a.jpg", "http://svc/static/m/b.jpg"],
        "not_matched_preview_urls": ["http://svc/static/n/c.jpg"],
        "matched_zip_url": "/download/5f0c2a9e-77aa-4f1e-9a52-1c0d1f2b3c4d/matched",
        "not_matched_zip_url": "/download/5f0c2a9e-77aa-4f1e-9a52-1c0d1f2b3c4d/not_matched"
    }))
}

fn write_image(dir: &Path, name: &str, len: usize) -> StagedFile {
    let path = dir.join(name);
    std::fs::write(&path, vec![0xAB; len]).expect("write staged file");
    StagedFile::from_disk(path).expect("staged file")
}

fn request(endpoint: Endpoint, dir: &Path) -> SortRequest {
    SortRequest {
        endpoint,
        target: write_image(dir, "face.jpg", 10),
        images: vec![
            write_image(dir, "one.png", 11),
            write_image(dir, "two.jpg", 12),
            write_image(dir, "three.webp", 13),
        ],
        settings: Settings::default(),
    }
}

#[tokio::test]
async fn test_sort_sends_fields_in_order_and_parses_result() {
    let seen: SeenFields = Arc::default();
    let router = Router::new()
        .route("/sort", post(record_sort))
        .with_state(seen.clone());
    let endpoint = spawn_service(router).await;
    let dir = tempfile::tempdir().unwrap();

    let result = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .expect("sort should succeed");

    assert_eq!(result.matched_count, 2);
    assert_eq!(result.not_matched_count, 1);
    assert_eq!(result.total_scanned, 3);
    assert_eq!(result.matched_preview_urls.len(), 2);
    assert!((result.target_score - 0.8731).abs() < 1e-9);

    let seen = seen.lock().unwrap();
    let names: Vec<&str> = seen.iter().map(|(name, _, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["target", "images", "images", "images", "mode", "detector", "similarity_threshold"]
    );

    let files: Vec<(&str, &str)> = seen
        .iter()
        .filter_map(|(_, file, body)| file.as_deref().map(|f| (f, body.as_str())))
        .collect();
    assert_eq!(
        files,
        vec![("face.jpg", "10"), ("one.png", "11"), ("two.jpg", "12"), ("three.webp", "13")]
    );

    assert_eq!(seen[4].2, "hybrid");
    assert_eq!(seen[5].2, "mtcnn");
    assert_eq!(seen[6].2, "0.42");
}

#[tokio::test]
async fn test_service_error_prefers_detail() {
    let router = Router::new().route(
        "/sort",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "model load failed", "error": "ignored"})),
            )
        }),
    );
    let endpoint = spawn_service(router).await;
    let dir = tempfile::tempdir().unwrap();

    let err = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "model load failed");
}

#[tokio::test]
async fn test_service_error_falls_back_to_error_field() {
    let router = Router::new().route(
        "/sort",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Model files missing in server/models/"})),
            )
        }),
    );
    let endpoint = spawn_service(router).await;
    let dir = tempfile::tempdir().unwrap();

    let err = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Model files missing in server/models/");
}

#[tokio::test]
async fn test_service_error_without_body_uses_status_text() {
    let router = Router::new().route("/sort", post(|| async { StatusCode::BAD_GATEWAY }));
    let endpoint = spawn_service(router).await;
    let dir = tempfile::tempdir().unwrap();

    let err = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Request failed with status code 502");
}

#[tokio::test]
async fn test_unparseable_success_body_is_invalid_response() {
    let router = Router::new().route("/sort", post(|| async { "definitely not json" }));
    let endpoint = spawn_service(router).await;
    let dir = tempfile::tempdir().unwrap();

    let err = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::InvalidResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Endpoint::parse(&format!("http://{}", addr)).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = FaceSortClient::new()
        .sort(&request(endpoint, dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::Transport { .. }), "got {:?}", err);
    assert_eq!(err.status(), None);
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_missing_staged_file_fails_before_sending() {
    let seen: SeenFields = Arc::default();
    let router = Router::new()
        .route("/sort", post(record_sort))
        .with_state(seen.clone());
    let endpoint = spawn_service(router).await;

    let req = SortRequest {
        endpoint,
        target: StagedFile::new("/definitely/not/here.jpg"),
        images: vec![StagedFile::new("/definitely/not/either.jpg")],
        settings: Settings::default(),
    };
    let err = FaceSortClient::new().sort(&req).await.unwrap_err();

    assert!(matches!(err, SortError::ReadFile { .. }), "got {:?}", err);
    assert!(seen.lock().unwrap().is_empty());
}

async fn serve_archive(UrlPath((run_id, partition)): UrlPath<(String, String)>) -> impl IntoResponse {
    if partition == "matched" {
        (StatusCode::OK, format!("zip:{}", run_id)).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("{}.zip not found", partition)})),
        )
            .into_response()
    }
}

#[tokio::test]
async fn test_download_archive_writes_file() {
    let router = Router::new().route("/download/:run_id/:partition", get(serve_archive));
    let endpoint = spawn_service(router).await;
    let dest = tempfile::tempdir().unwrap();

    let run_id = "5f0c2a9e-77aa";
    let url = endpoint.download_url(run_id, Partition::Matched);
    let path = FaceSortClient::new()
        .download_archive(&url, Partition::Matched, run_id, dest.path())
        .await
        .expect("download should succeed");

    assert_eq!(path, dest.path().join("matched-5f0c2a9e-77aa.zip"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "zip:5f0c2a9e-77aa");
}

#[tokio::test]
async fn test_download_missing_archive_reports_service_error() {
    let router = Router::new().route("/download/:run_id/:partition", get(serve_archive));
    let endpoint = spawn_service(router).await;
    let dest = tempfile::tempdir().unwrap();

    let url = endpoint.download_url("run1", Partition::NotMatched);
    let err = FaceSortClient::new()
        .download_archive(&url, Partition::NotMatched, "run1", dest.path())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "not_matched.zip not found");
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
}
