#![allow(dead_code)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockGuard, MockServer, ResponseTemplate};

pub const TOKEN: &str = "TEST";
pub const PAGE_PATH: &str = "/watched";

pub fn page_url(server: &MockServer) -> url::Url {
    url::Url::parse(&format!("{}{}", server.uri(), PAGE_PATH)).unwrap()
}

pub fn html(body: &str) -> String {
    format!("<html><head><script>var nonce = Math.random();</script></head><body>{body}</body></html>")
}

/// Serves `body` for the next `times` page requests (or forever when `None`).
/// Earlier mounts win while they still have uses left.
pub async fn mount_page(server: &MockServer, body: &str, times: Option<u64>, priority: u8) {
    let mut mock = Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(body)))
        .with_priority(priority);
    if let Some(times) = times {
        mock = mock.up_to_n_times(times);
    }
    mock.mount(server).await;
}

pub async fn mount_page_error(server: &MockServer, times: u64, priority: u8) {
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .up_to_n_times(times)
        .with_priority(priority)
        .mount(server)
        .await;
}

/// Telegram sendMessage that must be hit exactly `expected` times.
pub async fn mount_send_message(server: &MockServer, expected: u64) -> MockGuard {
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1, "date": 0, "chat": {"id": 4242, "type": "private"}}
        })))
        .expect(expected)
        .named("telegram POST /sendMessage")
        .mount_as_scoped(server)
        .await
}

pub fn updates_body(updates: serde_json::Value) -> serde_json::Value {
    json!({"ok": true, "result": updates})
}

pub fn user_message(update_id: i64, chat_id: i64) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private", "first_name": "Ann"},
            "from": {"id": chat_id, "is_bot": false, "first_name": "Ann", "username": "ann"},
            "text": "/start"
        }
    })
}

pub const TIMEOUT: Duration = Duration::from_secs(5);
