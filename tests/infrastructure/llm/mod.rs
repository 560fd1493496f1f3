
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

/// What the fake chat endpoint received.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

struct FakeChatState {
    status: StatusCode,
    reply: Value,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// An OpenAI-compatible `/v1/chat/completions` endpoint on a random local port.
pub struct FakeChatServer {
    pub base_url: String,
    state: Arc<FakeChatState>,
}

impl FakeChatServer {
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        let state = Arc::new(FakeChatState {
            status,
            reply,
            captured: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

pub fn completion_reply(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn chat_completions(
    State(state): State<Arc<FakeChatState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state
        .captured
        .lock()
        .unwrap()
        .push(CapturedRequest { authorization, body });

    (state.status, Json(state.reply.clone()))
}
