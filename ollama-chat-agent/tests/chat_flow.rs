use ollama_chat_agent::{ChatController, ChatError, RequestState};
use ollama_chat_core::config::Config;
use ollama_chat_core::content::{parse_segments, Segment};
use ollama_chat_core::session::Role;
use serde_json::json;
use tempfile::TempDir;

fn config_for(server: &mockito::Server, storage: &TempDir) -> Config {
    let mut config = Config::default();
    config.ollama.api_base = server.url();
    config.ollama.request_timeout_secs = 5;
    config.storage.dir = storage.path().to_string_lossy().to_string();
    config
}

#[tokio::test]
async fn test_full_conversation_survives_restart() {
    let mut server = mockito::Server::new_async().await;
    let tags = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"models":[{"name":"llama2"},{"name":"codellama"}]}"#)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/api/chat")
        .match_body(mockito::Matcher::PartialJson(json!({
            "model": "codellama",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "codellama",
                "message": {
                    "role": "assistant",
                    "content": "Use `Vec::new`:\n```rust\nlet v: Vec<i32> = Vec::new();\n```\nThat's it."
                },
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let storage = TempDir::new().unwrap();
    let config = config_for(&server, &storage);

    let controller = ChatController::from_config(&config).unwrap();
    assert_eq!(controller.refresh_models().await, vec!["llama2", "codellama"]);
    controller.set_model("codellama").unwrap();

    let reply = controller
        .send_message("How do I create an empty vector in Rust?")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.role, Role::Assistant);
    tags.assert_async().await;
    chat.assert_async().await;

    let segments = parse_segments(&reply.content);
    assert_eq!(
        segments,
        vec![
            Segment::Text("Use `Vec::new`:\n"),
            Segment::CodeBlock {
                language: "rust",
                content: "let v: Vec<i32> = Vec::new();"
            },
            Segment::Text("\nThat's it."),
        ]
    );

    let before = controller.with_sessions(|m| m.sessions().to_vec());
    drop(controller);

    let restored = ChatController::from_config(&config).unwrap();
    assert_eq!(restored.selected_model(), "codellama");
    restored.with_sessions(|m| {
        assert_eq!(m.sessions(), before.as_slice());
        let session = m.active_session().unwrap();
        assert_eq!(session.title(), "How do I create an empty vecto...");
        assert_eq!(session.messages().len(), 2);
    });
}

#[tokio::test]
async fn test_server_error_keeps_user_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body(r#"{"error":"out of memory"}"#)
        .create_async()
        .await;

    let storage = TempDir::new().unwrap();
    let config = config_for(&server, &storage);
    let controller = ChatController::from_config(&config).unwrap();

    let err = controller.send_message("hello?").await.unwrap_err();
    assert!(matches!(err, ChatError::Request { .. }));
    assert_eq!(err.user_message(), "Failed to get response from llama2");
    assert_eq!(
        controller.active_request_state(),
        RequestState::Failed("Failed to get response from llama2".to_string())
    );

    let restored = ChatController::from_config(&config).unwrap();
    restored.with_sessions(|m| {
        let messages = m.active_session().unwrap().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hello?");
    });
}

#[tokio::test]
async fn test_corrupted_storage_starts_empty() {
    let server = mockito::Server::new_async().await;
    let storage = TempDir::new().unwrap();
    std::fs::write(storage.path().join("ollama-chats"), "[{\"id\":").unwrap();

    let config = config_for(&server, &storage);
    let controller = ChatController::from_config(&config).unwrap();
    assert!(controller.with_sessions(|m| m.is_empty()));
    assert_eq!(controller.active_request_state(), RequestState::Idle);
}

#[tokio::test]
async fn test_unreachable_server_uses_fallback_models() {
    let storage = TempDir::new().unwrap();
    let mut config = Config::default();
    config.ollama.api_base = "http://127.0.0.1:9".to_string();
    config.ollama.request_timeout_secs = 2;
    config.storage.dir = storage.path().to_string_lossy().to_string();

    let controller = ChatController::from_config(&config).unwrap();
    assert_eq!(
        controller.refresh_models().await,
        vec!["llama2", "mistral", "phi"]
    );
}

#[tokio::test]
async fn test_silent_server_times_out_into_failed_state() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let storage = TempDir::new().unwrap();
    let mut config = Config::default();
    config.ollama.api_base = format!("http://{}", addr);
    config.ollama.request_timeout_secs = 1;
    config.storage.dir = storage.path().to_string_lossy().to_string();

    let controller = ChatController::from_config(&config).unwrap();
    let err = controller.send_message("are you there?").await.unwrap_err();
    match &err {
        ChatError::Request { model, source } => {
            assert_eq!(model, "llama2");
            assert!(source.is_timeout(), "expected timeout, got {:?}", source);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        controller.active_request_state(),
        RequestState::Failed("Failed to get response from llama2".to_string())
    );
    controller.with_sessions(|m| {
        let messages = m.active_session().unwrap().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    });
}
