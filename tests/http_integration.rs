use std::time::Duration;

use axum::Router;
use axum::body::{Body, BodyDataStream};
use axum::http::{HeaderName, HeaderValue, Request, StatusCode, header::CONTENT_TYPE};
use axum_test::TestServer;
use course_craft::AppState;
use course_craft::config::{
    AppConfig, ChatConfig, LoggingConfig, ResilienceConfig, ServerConfig, ThemeConfig,
};
use course_craft::server::router;
use futures::StreamExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const REPLY_DELAY_MS: u64 = 50;

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            static_dir: "static".to_string(),
        },
        theme: ThemeConfig {
            store_path: None,
            reload_interval_ms: 100,
        },
        chat: ChatConfig {
            reply_delay_ms: REPLY_DELAY_MS,
            session_idle_timeout_secs: 60,
        },
        resilience: ResilienceConfig {
            rate_limit_enabled: false,
            timeout_disabled: true,
            requests_per_second: 20.0,
            burst_size: 40.0,
        },
        logging: LoggingConfig { json: false },
    }
}

fn setup() -> (TestServer, AppState) {
    let state = AppState::from_config(test_config()).expect("state");
    let server = TestServer::new(router(state.clone())).expect("test server");
    (server, state)
}

/// Open the editor page and return the ID of the session it created.
async fn open_editor(server: &TestServer, state: &AppState) -> String {
    server.get("/").await.assert_status_ok();
    let ids = state.sessions.list_ids();
    assert_eq!(ids.len(), 1);
    ids[0].clone()
}

async fn wait_for_reply() {
    tokio::time::sleep(Duration::from_millis(REPLY_DELAY_MS * 6)).await;
}

async fn snapshot(server: &TestServer, id: &str) -> Value {
    server.get(&format!("/api/sessions/{id}")).await.json::<Value>()
}

#[tokio::test]
async fn test_editor_renders_seeded_state() {
    let (server, state) = setup();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("accept-ch"),
        HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme")
    );

    let html = response.text();
    assert_eq!(html.matches("data-message-id=").count(), 4);
    assert_eq!(html.matches("data-outline-item=").count(), 3);
    assert!(html.contains("I want to build a course that teaches developers"));
    assert!(html.contains("AI Orchestration"));

    let id = state.sessions.list_ids().remove(0);
    assert!(html.contains(&format!(r#"data-session-id="{id}""#)));
}

#[tokio::test]
async fn test_send_appends_user_then_assistant() {
    let (server, state) = setup();
    let id = open_editor(&server, &state).await;

    let response = server
        .post(&format!("/api/sessions/{id}/messages"))
        .form(&[("message", "Let's build a course")])
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    assert_eq!(response.json::<Value>()["role"], "user");

    let before = snapshot(&server, &id).await;
    assert_eq!(before["messages"].as_array().unwrap().len(), 5);
    assert_eq!(before["loading"], true);
    assert_eq!(before["course"]["outline"].as_array().unwrap().len(), 3);

    wait_for_reply().await;

    let after = snapshot(&server, &id).await;
    let messages = after["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[5]["role"], "assistant");
    assert_eq!(after["loading"], false);

    // "course" in the prompt swaps in the two-week outline
    let outline = after["course"]["outline"].as_array().unwrap();
    assert_eq!(outline.len(), 2);
    assert_eq!(outline[0]["week"], 1);
    assert_eq!(outline[1]["week"], 2);
}

#[tokio::test]
async fn test_unrelated_prompt_keeps_outline() {
    let (server, state) = setup();
    let id = open_editor(&server, &state).await;

    server
        .post(&format!("/api/sessions/{id}/messages"))
        .json(&json!({ "message": "Make the tone friendlier" }))
        .await;
    wait_for_reply().await;

    let after = snapshot(&server, &id).await;
    assert_eq!(after["messages"].as_array().unwrap().len(), 6);
    assert_eq!(after["course"]["outline"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_and_in_flight_rejected() {
    let (server, state) = setup();
    let id = open_editor(&server, &state).await;
    let path = format!("/api/sessions/{id}/messages");

    let empty = server.post(&path).form(&[("message", "   ")]).await;
    assert_eq!(empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        snapshot(&server, &id).await["messages"].as_array().unwrap().len(),
        4
    );

    server.post(&path).form(&[("message", "first")]).await;
    let second = server.post(&path).form(&[("message", "second")]).await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);

    wait_for_reply().await;
    assert_eq!(
        snapshot(&server, &id).await["messages"].as_array().unwrap().len(),
        6
    );
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (server, _state) = setup();

    let response = server
        .post("/api/sessions/missing/messages")
        .form(&[("message", "hello")])
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        server.get("/api/sessions/missing").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_delete_cancels_pending_reply() {
    let (server, state) = setup();
    let id = open_editor(&server, &state).await;
    let session = state.sessions.get(&id).unwrap();

    server
        .post(&format!("/api/sessions/{id}/messages"))
        .form(&[("message", "Let's build a course")])
        .await;
    let deleted = server.delete(&format!("/api/sessions/{id}")).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    wait_for_reply().await;
    assert_eq!(session.message_count(), 5);
    assert_eq!(session.course().outline.len(), 3);
    assert_eq!(
        server.get(&format!("/api/sessions/{id}")).await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_theme_resolution_and_update() {
    let (server, _state) = setup();
    let hint = HeaderName::from_static("sec-ch-prefers-color-scheme");

    let system = server
        .get("/api/theme")
        .add_header(hint.clone(), HeaderValue::from_static("\"dark\""))
        .await
        .json::<Value>();
    assert_eq!(system["preference"], "system");
    assert_eq!(system["is_dark"], true);

    let light = server
        .put("/api/theme")
        .json(&json!({ "preference": "light" }))
        .await;
    light.assert_status_ok();
    assert_eq!(light.json::<Value>()["is_dark"], false);

    // Fixed preference ignores the OS signal
    let after = server
        .get("/api/theme?os=dark")
        .await
        .json::<Value>();
    assert_eq!(after["preference"], "light");
    assert_eq!(after["root_class"], "theme-light");

    let page = server.get("/privacy").await.text();
    assert!(page.contains("bg-gray-50"));
    assert!(page.contains(r#"class="theme-light""#));

    let dark = server
        .put("/api/theme")
        .form(&[("preference", "dark")])
        .await;
    assert_eq!(dark.json::<Value>()["palette"]["background"], "bg-[#21252B]");
}

#[tokio::test]
async fn test_invalid_theme_rejected() {
    let (server, state) = setup();

    let response = server
        .put("/api/theme")
        .json(&json!({ "preference": "sepia" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.theme.current().to_string(), "system");
}

#[tokio::test]
async fn test_static_pages() {
    let (server, _state) = setup();

    let terms = server.get("/terms").await;
    terms.assert_status_ok();
    assert!(terms.text().contains("Terms of Service for Course Craft"));

    let dashboard = server.get("/dashboard").await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains("Upcoming Milestones"));

    let missing = server.get("/nowhere").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert!(missing.text().contains("Page not found"));
}

#[tokio::test]
async fn test_rate_limit_rejects_when_bucket_empty() {
    let mut config = test_config();
    config.resilience.rate_limit_enabled = true;
    config.resilience.requests_per_second = 0.0;
    config.resilience.burst_size = 2.0;
    let state = AppState::from_config(config).expect("state");
    let server = TestServer::new(router(state)).expect("test server");

    server.get("/dashboard").await.assert_status_ok();
    server.get("/dashboard").await.assert_status_ok();
    assert_eq!(
        server.get("/dashboard").await.status_code(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_client_script_keeps_cached_pages() {
    let (server, _state) = setup();

    let script = server.get("/static/course-craft.js").await;
    script.assert_status_ok();
    let text = script.text();
    assert!(text.contains(r#"addEventListener("pagehide", (event) =>"#));
    assert!(text.contains("if (event.persisted) return;"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Event streams
// ─────────────────────────────────────────────────────────────────────────────

const STREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// One parsed server-sent event.
#[derive(Debug)]
struct SseEvent {
    name: String,
    data: String,
}

/// Reads named events off a streaming response body.
struct SseReader {
    body: BodyDataStream,
    buf: String,
}

impl SseReader {
    async fn open(app: &Router, uri: &str) -> Self {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );
        Self {
            body: response.into_body().into_data_stream(),
            buf: String::new(),
        }
    }

    /// Next named event, skipping keep-alive comments.
    async fn next(&mut self) -> SseEvent {
        loop {
            if let Some(end) = self.buf.find("\n\n") {
                let block: String = self.buf.drain(..end + 2).collect();
                let mut name = String::new();
                let mut data = Vec::new();
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = value.trim_start().to_string();
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push(value.strip_prefix(' ').unwrap_or(value));
                    }
                }
                if name.is_empty() && data.is_empty() {
                    continue;
                }
                return SseEvent {
                    name,
                    data: data.join("\n"),
                };
            }

            let chunk = tokio::time::timeout(STREAM_TIMEOUT, self.body.next())
                .await
                .expect("event within timeout")
                .expect("stream still open")
                .expect("body chunk");
            self.buf.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }
}

async fn send(app: &Router, request: Request<Body>) -> StatusCode {
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_session_stream_carries_reply_and_outline() {
    let state = AppState::from_config(test_config()).expect("state");
    let app = router(state.clone());
    let id = state.sessions.create_seeded().id().to_string();

    let mut events = SseReader::open(&app, &format!("/api/sessions/{id}/events")).await;

    let post = Request::post(format!("/api/sessions/{id}/messages"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("message=Show+me+the+outline"))
        .unwrap();
    assert_eq!(send(&app, post).await, StatusCode::ACCEPTED);

    let mut seen = Vec::new();
    let outline = loop {
        let event = events.next().await;
        if event.name == "outline" {
            break event;
        }
        seen.push(event);
    };

    assert!(seen.iter().any(|e| e.name == "messages"));
    let composers: Vec<&SseEvent> = seen.iter().filter(|e| e.name == "composer").collect();
    assert_eq!(composers.len(), 2);
    assert!(composers[0].data.contains(" disabled class="));
    assert!(!composers[1].data.contains(" disabled class="));

    let last_messages = seen.iter().rev().find(|e| e.name == "messages").unwrap();
    assert_eq!(last_messages.data.matches("data-message-id=").count(), 6);
    assert!(!last_messages.data.contains("animate-bounce"));

    assert_eq!(outline.data.matches("data-outline-item=").count(), 2);
}

#[tokio::test]
async fn test_session_stream_ends_on_close() {
    let state = AppState::from_config(test_config()).expect("state");
    let app = router(state.clone());
    let id = state.sessions.create_seeded().id().to_string();

    let mut events = SseReader::open(&app, &format!("/api/sessions/{id}/events")).await;
    let delete = Request::delete(format!("/api/sessions/{id}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete).await, StatusCode::NO_CONTENT);

    let end = tokio::time::timeout(STREAM_TIMEOUT, events.body.next())
        .await
        .expect("stream ends within timeout");
    assert!(end.is_none());
}

#[tokio::test]
async fn test_theme_stream_follows_preference() {
    let state = AppState::from_config(test_config()).expect("state");
    let app = router(state.clone());

    let mut events = SseReader::open(&app, "/api/theme/events?os=dark").await;

    let initial = events.next().await;
    assert_eq!(initial.name, "theme");
    let initial: Value = serde_json::from_str(&initial.data).unwrap();
    assert_eq!(initial["preference"], "system");
    assert_eq!(initial["is_dark"], true);

    let put = Request::put("/api/theme")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"preference":"light"}"#))
        .unwrap();
    assert_eq!(send(&app, put).await, StatusCode::OK);

    let changed = events.next().await;
    assert_eq!(changed.name, "theme");
    let changed: Value = serde_json::from_str(&changed.data).unwrap();
    assert_eq!(changed["preference"], "light");
    assert_eq!(changed["is_dark"], false);
    assert_eq!(changed["root_class"], "theme-light");
    assert_eq!(changed["palette"]["background"], "bg-gray-50");
}
