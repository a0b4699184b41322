use std::sync::Arc;

use analyst_core::AnalystError;
use analyst_core::attachment::Attachment;
use analyst_core::session::{AnalyzeRequest, Sender, SessionId, SessionStore};
use analyst_infrastructure::HttpSessionStore;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

#[derive(Debug, Clone)]
struct SeenField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: String,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(status, body) => (status, Json(body)).into_response(),
            Reply::Raw(status, body) => (status, body).into_response(),
        }
    }
}

#[derive(Debug, Clone)]
struct MockStoreState {
    reply: Arc<Mutex<Reply>>,
    seen_paths: Arc<Mutex<Vec<String>>>,
    seen_fields: Arc<Mutex<Vec<SeenField>>>,
}

impl MockStoreState {
    fn replying(reply: Reply) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            seen_paths: Arc::new(Mutex::new(Vec::new())),
            seen_fields: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn spawn_mock_store(
    state: MockStoreState,
) -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/chats", get(list_chats_handler))
        .route("/chat/{session_id}", get(get_chat_handler))
        .route("/analyze", post(analyze_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let local_addr = listener
        .local_addr()
        .expect("listener address should resolve");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        server.await.expect("mock store should run");
    });

    (format!("http://{local_addr}"), shutdown_tx, server_task)
}

async fn list_chats_handler(State(state): State<MockStoreState>) -> Reply {
    state.seen_paths.lock().await.push("/chats".to_string());
    state.reply.lock().await.clone()
}

async fn get_chat_handler(
    State(state): State<MockStoreState>,
    Path(session_id): Path<String>,
) -> Reply {
    state
        .seen_paths
        .lock()
        .await
        .push(format!("/chat/{session_id}"));
    state.reply.lock().await.clone()
}

async fn analyze_handler(State(state): State<MockStoreState>, mut multipart: Multipart) -> Reply {
    while let Some(field) = multipart
        .next_field()
        .await
        .expect("multipart body should parse")
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.expect("field should be readable");
        state.seen_fields.lock().await.push(SeenField {
            name,
            file_name,
            content_type,
            data: String::from_utf8_lossy(&data).into_owned(),
        });
    }
    state.reply.lock().await.clone()
}

fn session(raw: &str) -> SessionId {
    SessionId::parse(raw).expect("test id should be valid")
}

#[tokio::test]
async fn lists_chat_summaries() {
    let state = MockStoreState::replying(Reply::Json(
        StatusCode::OK,
        json!({
            "chats": [
                {"session_id": "3f2a", "title": "Chat 3f2a", "preview": "[Attached file: q3.csv] totals?"},
                {"session_id": "9b1c", "title": "Chat 9b1c", "preview": "No messages yet"}
            ]
        }),
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state.clone()).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let chats = store.list_chats().await.expect("listing should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].session_id, session("3f2a"));
    assert!(chats[0].has_attachment());
    assert_eq!(chats[1].title, "Chat 9b1c");
    assert!(!chats[1].has_attachment());
}

#[tokio::test]
async fn fetches_transcript_with_encoded_id() {
    let state = MockStoreState::replying(Reply::Json(
        StatusCode::OK,
        json!({
            "messages": [
                {"sender": "user", "text": "summarise", "file": "q3.csv"},
                {"sender": "bot", "text": "**Revenue** grew", "plot": null}
            ],
            "session_id": "id with space"
        }),
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state.clone()).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let messages = store
        .fetch_chat(&session("id with space"))
        .await
        .expect("fetch should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].file.as_deref(), Some("q3.csv"));
    assert_eq!(messages[1].sender, Sender::Bot);
    assert_eq!(messages[1].plot, None);

    let seen = state.seen_paths.lock().await.clone();
    assert_eq!(seen, vec!["/chat/id with space".to_string()]);
}

#[tokio::test]
async fn unknown_session_yields_empty_transcript() {
    let state = MockStoreState::replying(Reply::Json(
        StatusCode::OK,
        json!({"messages": [], "session_id": "fresh"}),
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let messages = store.fetch_chat(&session("fresh")).await.unwrap();

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(messages.is_empty());
}

#[tokio::test]
async fn analyze_posts_multipart_with_csv() {
    let state = MockStoreState::replying(Reply::Json(
        StatusCode::OK,
        json!({"response": "| region | total |\n|---|---|\n| north | 10 |", "session_id": "s-42"}),
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state.clone()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("sales.csv");
    std::fs::write(&csv_path, "region,total\nnorth,10\n").unwrap();
    let attachment = Attachment::select(&csv_path).expect("csv should be accepted");

    let store = HttpSessionStore::new(&url).expect("store should build");
    let reply = store
        .analyze(AnalyzeRequest {
            session_id: session("s-42"),
            text: "totals by region".to_string(),
            attachment: Some(attachment),
        })
        .await
        .expect("analyze should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(reply.response.starts_with("| region"));
    assert_eq!(reply.plot, None);
    assert_eq!(reply.session_id, Some(session("s-42")));

    let fields = state.seen_fields.lock().await.clone();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["text", "file", "session_id"]);
    assert_eq!(fields[0].data, "totals by region");
    assert_eq!(fields[1].file_name.as_deref(), Some("sales.csv"));
    assert_eq!(fields[1].content_type.as_deref(), Some("text/csv"));
    assert_eq!(fields[1].data, "region,total\nnorth,10\n");
    assert_eq!(fields[2].data, "s-42");
}

#[tokio::test]
async fn analyze_without_file_sends_text_and_session_only() {
    let state = MockStoreState::replying(Reply::Json(
        StatusCode::OK,
        json!({"response": "hi", "plot": "https://plots.example/p.png"}),
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state.clone()).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let reply = store
        .analyze(AnalyzeRequest {
            session_id: session("s-1"),
            text: "hello".to_string(),
            attachment: None,
        })
        .await
        .expect("analyze should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(reply.response, "hi");
    assert_eq!(reply.plot.as_deref(), Some("https://plots.example/p.png"));

    let fields = state.seen_fields.lock().await.clone();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["text", "session_id"]);
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let state = MockStoreState::replying(Reply::Raw(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    ));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let err = store.list_chats().await.unwrap_err();

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    match err {
        AnalystError::Http { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let state = MockStoreState::replying(Reply::Raw(StatusCode::OK, "<html>not json</html>"));
    let (url, shutdown_tx, server_task) = spawn_mock_store(state).await;

    let store = HttpSessionStore::new(&url).expect("store should build");
    let err = store.fetch_chat(&session("s")).await.unwrap_err();

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(matches!(err, AnalystError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_store_is_http_error_without_status() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpSessionStore::new(&format!("http://{addr}")).expect("store should build");
    let err = store.list_chats().await.unwrap_err();

    assert!(matches!(err, AnalystError::Http { status: None, .. }), "got {err:?}");
}
