use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fail_with: Option<StatusCode>,
}

/// Local stand-in for the Mistral REST API, served under `/v1`.
///
/// Records every request. `failing(status)` answers everything with `status`.
pub struct MistralServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MistralServer {
    pub const UPLOADED_FILE_ID: &'static str = "file-abc";
    pub const COMPLETION: &'static str = "[\"Ownership\"]";

    pub async fn start() -> Self {
        Self::spawn(None).await
    }

    pub async fn failing(status: StatusCode) -> Self {
        Self::spawn(Some(status)).await
    }

    async fn spawn(fail_with: Option<StatusCode>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(handle).with_state(ServerState {
            requests: requests.clone(),
            fail_with,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self {
            base_url: format!("http://{addr}/v1"),
            requests,
        }
    }

    pub fn signed_url_for(file_id: &str) -> String {
        format!("https://signed.mock/{file_id}")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });

    if let Some(status) = state.fail_with {
        return (status, Json(json!({"message": "Unauthorized"}))).into_response();
    }

    let path = uri.path();
    match (method.as_str(), path) {
        ("POST", "/v1/files") => Json(json!({
            "id": MistralServer::UPLOADED_FILE_ID,
            "object": "file",
            "filename": "upload.pdf",
            "purpose": "ocr"
        }))
        .into_response(),
        ("GET", p) if p.starts_with("/v1/files/") && p.ends_with("/url") => {
            let file_id = p
                .trim_start_matches("/v1/files/")
                .trim_end_matches("/url");
            Json(json!({ "url": MistralServer::signed_url_for(file_id) })).into_response()
        }
        ("POST", "/v1/ocr") => Json(json!({
            "pages": [
                {"index": 0, "markdown": "# Ownership", "images": []},
                {"index": 1, "markdown": "# Borrowing", "images": []}
            ],
            "model": "mistral-ocr-latest"
        }))
        .into_response(),
        ("POST", "/v1/chat/completions") => Json(json!({
            "id": "cmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": MistralServer::COMPLETION},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
