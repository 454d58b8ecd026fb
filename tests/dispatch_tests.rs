//! End-to-end send flow against a mocked chat endpoint

use chatline::app::{Action, App, Effect, FALLBACK_REPLY};
use chatline::dispatch;
use chatline::history::{HistoryStore, DEFAULT_GREETING};
use chatline::{ChatClient, Origin};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn test_app(dir: &TempDir) -> App {
    App::new(HistoryStore::new(dir.path().join("history.json"), DEFAULT_GREETING), "Chat")
}

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(&format!("{}/api/chat", server.uri()))
}

/// Type the text, press send, and run the request to completion
async fn send(app: &mut App, client: &ChatClient, text: &str) {
    for c in text.chars() {
        app.update(Action::InsertChar(c));
    }
    if let Some(effect) = app.update(Action::Submit) {
        let settled = dispatch::settle(client, effect).await;
        app.update(settled);
    }
}

fn turns(app: &App) -> Vec<(Origin, String)> {
    app.transcript
        .iter()
        .map(|t| (t.origin, t.text.clone()))
        .collect()
}

fn greeting() -> (Origin, String) {
    (Origin::Assistant, DEFAULT_GREETING.to_string())
}

// ============================================================================
// Successful replies
// ============================================================================

#[tokio::test]
async fn test_reply_is_appended_after_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(serde_json::json!({ "message": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello!"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client_for(&server), "hi").await;

    assert_eq!(
        turns(&app),
        vec![
            greeting(),
            (Origin::User, "hi".to_string()),
            (Origin::Assistant, "hello!".to_string()),
        ]
    );
    assert!(!app.awaiting_reply);
}

#[tokio::test]
async fn test_json_string_reply_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json("hello!"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client_for(&server), "hi").await;

    assert_eq!(app.transcript.last().unwrap().text, "hello!");
}

#[tokio::test]
async fn test_raw_input_is_sent_untrimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(serde_json::json!({ "message": "  spaced out  " })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client_for(&server), "  spaced out  ").await;

    assert_eq!(turns(&app)[1], (Origin::User, "  spaced out  ".to_string()));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_gives_fallback_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client_for(&server), "hi").await;

    assert_eq!(
        turns(&app),
        vec![
            greeting(),
            (Origin::User, "hi".to_string()),
            (Origin::Assistant, FALLBACK_REPLY.to_string()),
        ]
    );
    assert!(!app.awaiting_reply);
}

#[tokio::test]
async fn test_unreachable_endpoint_gives_fallback_turn() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client, "hi").await;

    assert_eq!(app.transcript.len(), 3);
    assert_eq!(app.transcript.last().unwrap().text, FALLBACK_REPLY);
    assert!(!app.awaiting_reply);
}

// ============================================================================
// Ignored sends
// ============================================================================

#[tokio::test]
async fn test_blank_input_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unexpected"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    let client = client_for(&server);
    send(&mut app, &client, "").await;
    send(&mut app, &client, "   ").await;

    assert_eq!(turns(&app), vec![greeting()]);
}

#[tokio::test]
async fn test_second_send_while_pending_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first reply"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    let client = client_for(&server);

    for c in "first".chars() {
        app.update(Action::InsertChar(c));
    }
    let pending = app.update(Action::Submit).unwrap();

    for c in "second".chars() {
        app.update(Action::InsertChar(c));
    }
    assert_eq!(app.update(Action::Submit), None);

    let settled = dispatch::settle(&client, pending).await;
    app.update(settled);

    assert_eq!(
        turns(&app),
        vec![
            greeting(),
            (Origin::User, "first".to_string()),
            (Origin::Assistant, "first reply".to_string()),
        ]
    );
    assert_eq!(app.input, "second");
}

// ============================================================================
// Background dispatch
// ============================================================================

#[tokio::test]
async fn test_spawned_dispatch_reports_on_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("async hello"))
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let effect = Effect::Dispatch { message: "hi".to_string() };
    dispatch::spawn(client_for(&server), effect, tx).await.unwrap();

    match rx.recv().await {
        Some(chatline::tui::AppEvent::Settled(Action::Settle(Ok(text)))) => {
            assert_eq!(text, "async hello");
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_conversation_persists_across_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("noted"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut app = test_app(&dir);
    send(&mut app, &client_for(&server), "remember this").await;

    let restarted = test_app(&dir);
    assert_eq!(restarted.transcript, app.transcript);
    assert_eq!(turns(&restarted)[1], (Origin::User, "remember this".to_string()));
}
