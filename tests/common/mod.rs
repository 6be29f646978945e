#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use teloxide::Bot;
use tgrelaybot_rs::config::{ApiEndpoints, AppConfig};
use tgrelaybot_rs::content::StaticContent;

/// Calls received by a stub server, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<(String, String)>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.0.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }

    fn push(&self, method: String, body: String) {
        self.0.lock().unwrap().push((method, body));
    }
}

#[derive(Clone)]
struct TelegramStub {
    calls: Recorder,
    fail_sends: bool,
}

fn sent_message() -> Value {
    json!({
        "message_id": 100,
        "date": 1_700_000_000,
        "chat": { "id": 42, "type": "private", "first_name": "Ada" },
        "text": "sent"
    })
}

/// teloxide requests `.../SendMessage`; the log keeps Bot API spelling (`sendMessage`).
fn bot_api_method(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or_default();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn telegram_method(
    State(stub): State<TelegramStub>,
    Path(path): Path<String>,
    body: Bytes,
) -> Json<Value> {
    let method = bot_api_method(&path);
    stub.calls
        .push(method.clone(), String::from_utf8_lossy(&body).into_owned());

    match method.as_str() {
        "sendMessage" | "sendPhoto" | "sendAudio" if stub.fail_sends => Json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })),
        "sendMessage" | "sendPhoto" | "sendAudio" => {
            Json(json!({ "ok": true, "result": sent_message() }))
        }
        _ => Json(json!({ "ok": true, "result": true })),
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Fake Bot API server; returns a bot pointed at it and the call log.
pub async fn spawn_telegram_stub(fail_sends: bool) -> (Bot, Recorder) {
    let calls = Recorder::default();
    let app = Router::new()
        .route("/{*path}", post(telegram_method))
        .with_state(TelegramStub {
            calls: calls.clone(),
            fail_sends,
        });
    let base = serve(app).await;
    let bot = Bot::new("123456:TEST").set_api_url(base.parse().unwrap());
    (bot, calls)
}

async fn weather_method(
    State(calls): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let city = params.get("q").cloned().unwrap_or_default();
    calls.push("weather".to_string(), city.clone());
    match city.as_str() {
        "Atlantis" => (StatusCode::NOT_FOUND, Json(json!({ "cod": "404" }))).into_response(),
        _ => Json(json!({
            "name": city,
            "weather": [{ "description": "few clouds" }],
            "main": { "temp": 18.0, "feels_like": 17.5, "humidity": 55 }
        }))
        .into_response(),
    }
}

/// Fake weather API; every call records the requested city.
pub async fn spawn_weather_stub() -> (String, Recorder) {
    let calls = Recorder::default();
    let app = Router::new()
        .route("/weather", get(weather_method))
        .with_state(calls.clone());
    let base = serve(app).await;
    (format!("{base}/weather"), calls)
}

pub fn test_config(token: Option<&str>, weather_url: &str) -> AppConfig {
    AppConfig {
        token: token.map(str::to_owned),
        hosting: true,
        webhook_url: None,
        webhook_secret: None,
        port: 0,
        weather_api_key: Some("test-key".to_string()),
        endpoints: ApiEndpoints {
            joke: "http://127.0.0.1:1/joke".to_string(),
            quote: "http://127.0.0.1:1/quote".to_string(),
            weather: weather_url.to_string(),
        },
        content: StaticContent::embedded().unwrap(),
    }
}

pub fn text_update(update_id: u32, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1_700_000_000,
            "chat": { "id": 42, "type": "private", "first_name": "Ada" },
            "from": { "id": 7, "is_bot": false, "first_name": "Ada" },
            "text": text
        }
    })
}
