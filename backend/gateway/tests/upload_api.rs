use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;

use pixdrop_core::{UploadOptions, UploadPolicy};
use pixdrop_gateway::{build_router, GatewayState};
use pixdrop_media::MockMediaService;

const MIB: usize = 1024 * 1024;

async fn spawn_gateway(mock: Arc<MockMediaService>) -> String {
    let state = GatewayState::new(
        UploadPolicy::default(),
        mock,
        UploadOptions::auto_optimized("latihan1"),
    );
    let app = build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn image(name: &str, mime: &str, size: usize) -> Part {
    Part::bytes(vec![0u8; size])
        .file_name(name.to_string())
        .mime_str(mime)
        .unwrap()
}

fn pngs(form: Form, names: &[&str]) -> Form {
    names
        .iter()
        .fold(form, |form, name| form.part("files", image(name, "image/png", 64)))
}

async fn post(base: &str, form: Form) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.json::<Value>().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn zero_files_is_bad_request() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let (status, body) = post(&base, Form::new().text("caption", "nothing here")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No files uploaded");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn more_than_five_files_is_rejected_without_uploading() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = pngs(Form::new(), &["1.png", "2.png", "3.png", "4.png", "5.png", "6.png"]);
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 5 files allowed");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn one_invalid_type_rejects_the_whole_request() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = pngs(Form::new(), &["a.png"]).part("files", image("b.gif", "image/gif", 64));
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "b.gif: Invalid file type");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn oversize_file_rejects_the_whole_request() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = pngs(Form::new(), &["a.png"])
        .part("files", image("big.jpg", "image/jpeg", 5 * MIB + 1))
        .part("files", image("c.exe", "application/x-msdownload", 16));
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "big.jpg: File too large (max 5MB), c.exe: Invalid file type"
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn file_far_over_the_limit_is_bad_request() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = Form::new().part("files", image("huge.png", "image/png", 65 * MIB));
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "huge.png: File too large (max 5MB)");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn six_large_files_are_rejected_by_count() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = (1..=6).fold(Form::new(), |form, i| {
        form.part("files", image(&format!("{i}.png"), "image/png", 12 * MIB))
    });
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 5 files allowed");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn exactly_five_mib_is_accepted() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = Form::new().part("files", image("edge.webp", "image/webp", 5 * MIB));
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn all_valid_files_return_urls_in_submission_order() {
    let mock = Arc::new(MockMediaService::new().with_latency(Duration::from_millis(5)));
    let base = spawn_gateway(mock.clone()).await;

    let names = ["a.png", "b.png", "c.png", "d.png", "e.png"];
    let (status, body) = post(&base, pngs(Form::new(), &names)).await;
    assert_eq!(status, StatusCode::OK);

    let urls: Vec<String> = serde_json::from_value(body["urls"].clone()).unwrap();
    let expected: Vec<String> = names
        .iter()
        .map(|n| format!("https://media.example.test/latihan1/{n}"))
        .collect();
    assert_eq!(urls, expected);
    assert_eq!(mock.call_count(), 5);
}

#[tokio::test]
async fn one_failure_drops_only_that_file() {
    let mock = Arc::new(
        MockMediaService::new()
            .with_latency(Duration::from_millis(5))
            .failing_on("b.png"),
    );
    let base = spawn_gateway(mock.clone()).await;

    let names = ["a.png", "b.png", "c.png", "d.png", "e.png"];
    let (status, body) = post(&base, pngs(Form::new(), &names)).await;
    assert_eq!(status, StatusCode::OK);

    let urls: Vec<String> = serde_json::from_value(body["urls"].clone()).unwrap();
    assert_eq!(urls.len(), 4);
    assert!(urls.iter().all(|u| !u.ends_with("/b.png")));
    assert!(urls[0].ends_with("/a.png"));
    assert!(urls[3].ends_with("/e.png"));
    assert_eq!(mock.call_count(), 5);
}

#[tokio::test]
async fn all_failures_is_server_error() {
    let mock = Arc::new(MockMediaService::new().failing_all());
    let base = spawn_gateway(mock.clone()).await;

    let (status, body) = post(&base, pngs(Form::new(), &["a.png", "b.png", "c.png", "d.png"])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "All files failed to upload");
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn at_most_three_media_calls_in_flight() {
    let mock = Arc::new(MockMediaService::new().with_latency(Duration::from_millis(40)));
    let base = spawn_gateway(mock.clone()).await;

    let names = ["a.png", "b.png", "c.png", "d.png", "e.png"];
    let (status, _) = post(&base, pngs(Form::new(), &names)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(mock.peak_in_flight() <= 3, "peak was {}", mock.peak_in_flight());
    assert_eq!(mock.peak_in_flight(), 3);
}

#[tokio::test]
async fn non_file_fields_are_ignored() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let form = Form::new()
        .text("caption", "holiday")
        .part("files", image("a.jpg", "image/jpeg", 32));
    let (status, body) = post(&base, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_multipart_is_server_error_with_message() {
    let mock = Arc::new(MockMediaService::new());
    let base = spawn_gateway(mock.clone()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/upload"))
        .header("content-type", "multipart/form-data")
        .body("not really multipart")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn health_and_limits_endpoints() {
    let base = spawn_gateway(Arc::new(MockMediaService::new())).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{base}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["media_provider"], "mock");

    let limits: Value = client
        .get(format!("{base}/api/limits"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(limits["maxFiles"], 5);
    assert_eq!(limits["allowedTypes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn serves_upload_page() {
    let base = spawn_gateway(Arc::new(MockMediaService::new())).await;
    let page = reqwest::get(format!("{base}/")).await.unwrap().text().await.unwrap();
    assert!(page.contains("/api/upload"));
}
