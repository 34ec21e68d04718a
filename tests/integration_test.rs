use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bilingual_quiz::api::{router, AppState, EMPTY_TEXT_MESSAGE};
use bilingual_quiz::error::LlmError;
use bilingual_quiz::{ChatModel, QuizFlow, SessionStore};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "quiztestboundary";

const TRANSLATED: &str = "\"\"\"
### FIRST BLOCK (FOR USER)
1) Kas yra sostinė?
A) Kaunas
B) Vilnius
C) Klaipėda
D) Alytus

### SECOND BLOCK (HIDDEN ANSWER KEY)
1) B
\"\"\"";

/// 假模型：记录事实抽取步骤收到的文本块，翻译步骤返回固定输出
#[derive(Default)]
struct FakeModel {
    chunks_seen: Mutex<Vec<String>>,
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn chat(&self, step: &str, _system: &str, user: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::api_failed(step, "upstream unavailable"));
        }
        match step {
            "facts" => {
                self.chunks_seen.lock().unwrap().push(user.to_string());
                Ok("Vilnius is the capital.".to_string())
            }
            "mcq" => Ok("### FIRST BLOCK\n1) Q?".to_string()),
            _ => Ok(TRANSLATED.to_string()),
        }
    }
}

fn app_with(model: Arc<FakeModel>, chunk_size: usize) -> Router {
    let store = Arc::new(SessionStore::with_rng(chunk_size, StdRng::seed_from_u64(7)));
    let flow = Arc::new(QuizFlow::new(model, "Lithuanian"));
    router(AppState::new(store, flow), 1024 * 1024)
}

fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn urlencoded_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_generate_returns_quiz_and_session() {
    let model = Arc::new(FakeModel::default());
    let app = app_with(model.clone(), 9500);

    let body = multipart_body(
        Some(("notes.txt", "Vilnius is the capital of Lithuania.".as_bytes())),
        &[("question_count", "1"), ("difficulty", "easy")],
    );
    let (status, json) = send(&app, multipart_request("/generate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].is_string());
    let quiz = json["quiz"].as_str().unwrap();
    assert!(quiz.starts_with("### PIRMAS BLOKAS (FOR USER)"));
    assert!(quiz.contains("### ANTRAS BLOKAS (HIDDEN ANSWER KEY)"));
    assert_eq!(json["items"][0]["options"][1], "Vilnius");
    assert_eq!(json["items"][0]["correct_index"], 1);
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_generate_with_blank_file_returns_sentinel() {
    let model = Arc::new(FakeModel::default());
    let app = app_with(model.clone(), 9500);

    let body = multipart_body(Some(("empty.txt", b"  \n\t ")), &[("question_count", "3")]);
    let (status, json) = send(&app, multipart_request("/generate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quiz"], EMPTY_TEXT_MESSAGE);
    assert!(json["session_id"].is_null());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_with_undecodable_file_returns_sentinel() {
    let model = Arc::new(FakeModel::default());
    let app = app_with(model.clone(), 9500);

    let body = multipart_body(Some(("scan.txt", &[0xff, 0xfe, 0xfd])), &[("question_count", "3")]);
    let (status, json) = send(&app, multipart_request("/generate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quiz"], EMPTY_TEXT_MESSAGE);
    assert!(json["session_id"].is_null());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_again_rotates_through_chunks() {
    let model = Arc::new(FakeModel::default());
    let app = app_with(model.clone(), 5);

    // 三个块：aaaaa / bbbbb / ccc
    let body = multipart_body(Some(("doc.txt", b"aaaaabbbbbccc")), &[("question_count", "1")]);
    let (status, json) = send(&app, multipart_request("/generate", body)).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = json["session_id"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let body = format!("session_id={session_id}&question_count=1&difficulty=hard");
        let (status, json) = send(&app, urlencoded_request("/generate_again", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["session_id"], session_id.as_str());
    }

    let seen = model.chunks_seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    let first_round: HashSet<&String> = seen[..3].iter().collect();
    assert_eq!(first_round.len(), 3);
    assert!(first_round.contains(&seen[3]));
}

#[tokio::test]
async fn test_generate_again_unknown_session_is_404() {
    let model = Arc::new(FakeModel::default());
    let app = app_with(model.clone(), 9500);

    let body = multipart_body(None, &[("session_id", "no-such-session"), ("question_count", "2")]);
    let (status, json) = send(&app, multipart_request("/generate_again", body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Session not found or expired.");
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_question_count_is_400() {
    let app = app_with(Arc::new(FakeModel::default()), 9500);

    let body = multipart_body(Some(("a.txt", b"text")), &[("question_count", "0")]);
    let (status, _) = send(&app, multipart_request("/generate", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = multipart_body(None, &[("question_count", "2")]);
    let (status, json) = send(&app, multipart_request("/generate", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "missing field: file");
}

#[tokio::test]
async fn test_pipeline_failure_is_500() {
    let model = Arc::new(FakeModel {
        fail: true,
        ..FakeModel::default()
    });
    let app = app_with(model.clone(), 9500);

    let body = multipart_body(Some(("a.txt", b"some text")), &[("question_count", "2")]);
    let (status, json) = send(&app, multipart_request("/generate", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Quiz generation failed.");
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_corrupt_docx_is_400() {
    let app = app_with(Arc::new(FakeModel::default()), 9500);

    let body = multipart_body(Some(("broken.docx", b"not a zip archive")), &[("question_count", "2")]);
    let (status, _) = send(&app, multipart_request("/generate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
