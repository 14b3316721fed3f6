// tests/completion_client.rs
// CompletionClient against a throwaway local HTTP server

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use mcp_debate::error::LlmError;
use mcp_debate::llm::{ChatClient, CompletionClient, Message, Tool, ToolCall};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

/// Serve `reply` (status + JSON) at /v1/chat/completions; returns the base URL
async fn serve(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();
    let state = (captured.clone(), status, reply);

    async fn handler(
        State((captured, status, reply)): State<(Captured, StatusCode, Value)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        captured.bodies.lock().unwrap().push(body);
        if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            captured.auth.lock().unwrap().push(auth.to_string());
        }
        (status, Json(reply))
    }

    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), captured)
}

fn search_tool() -> Tool {
    Tool::function(
        "search",
        "Search the web",
        json!({"type": "object", "properties": {"q": {"type": "string"}}, "required": ["q"]}),
    )
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_plain_request_body() {
    let (base, captured) = serve(
        StatusCode::OK,
        json!({
            "choices": [{"message": {"role": "assistant", "content": "Markets allocate well."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }),
    )
    .await;

    let client = CompletionClient::new(&base, "sk-test", "gpt-4o-mini", 0.7, 500);
    let result = client
        .chat(
            vec![Message::system("persona"), Message::user("argue")],
            None,
        )
        .await
        .unwrap();

    assert_eq!(result.content.as_deref(), Some("Markets allocate well."));
    assert!(result.requested_tools().is_empty());
    assert_eq!(result.usage.unwrap().total_tokens, 17);
    assert!(!result.request_id.is_empty());

    let bodies = captured.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 500);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "persona"},
            {"role": "user", "content": "argue"}
        ])
    );
    assert!(body.get("tools").is_none(), "no tools key without tools");
    assert!(body.get("tool_choice").is_none());

    assert_eq!(
        captured.auth.lock().unwrap().as_slice(),
        &["Bearer sk-test".to_string()]
    );
}

#[tokio::test]
async fn test_tools_and_tool_call_reply() {
    let (base, captured) = serve(
        StatusCode::OK,
        json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "search", "arguments": "{\"q\":\"x\"}"}
                }]
            }}]
        }),
    )
    .await;

    let client = CompletionClient::new(&base, "sk-test", "gpt-4o-mini", 0.2, 64);
    let result = ChatClient::chat(&client, vec![Message::user("go")], Some(vec![search_tool()]))
        .await
        .unwrap();

    assert!(result.content.is_none());
    assert_eq!(
        result.requested_tools(),
        &[ToolCall::new("call_1", "search", r#"{"q":"x"}"#)]
    );

    let body = captured.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(
        body["tools"],
        json!([{
            "type": "function",
            "function": {
                "name": "search",
                "description": "Search the web",
                "parameters": {
                    "type": "object",
                    "properties": {"q": {"type": "string"}},
                    "required": ["q"]
                }
            }
        }])
    );
}

#[tokio::test]
async fn test_tool_result_messages_are_sent_with_call_id() {
    let (base, captured) = serve(
        StatusCode::OK,
        json!({"choices": [{"message": {"role": "assistant", "content": "final"}}]}),
    )
    .await;

    let client = CompletionClient::new(&base, "sk-test", "m", 0.7, 100);
    let messages = vec![
        Message::user("go"),
        Message::assistant_tool_calls(None, vec![ToolCall::new("call_1", "search", "{}")]),
        Message::tool_result("call_1", "result-x"),
    ];
    client.chat(messages, None).await.unwrap();

    let body = captured.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["messages"][1]["tool_calls"][0]["id"], "call_1");
    assert_eq!(
        body["messages"][2],
        json!({"role": "tool", "content": "result-x", "tool_call_id": "call_1"})
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_api_error() {
    let (base, _) = serve(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "upstream exploded"}}),
    )
    .await;

    let client = CompletionClient::new(&base, "sk-test", "m", 0.7, 100);
    let err = client.chat(vec![Message::user("go")], None).await.unwrap_err();

    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_body_is_parse_error() {
    let (base, _) = serve(StatusCode::OK, json!({"unexpected": true})).await;

    let client = CompletionClient::new(&base, "sk-test", "m", 0.7, 100);
    let err = client.chat(vec![Message::user("go")], None).await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}

#[tokio::test]
async fn test_empty_choices_is_parse_error() {
    let (base, _) = serve(StatusCode::OK, json!({"choices": [], "usage": null})).await;

    let client = CompletionClient::new(&base, "sk-test", "m", 0.7, 100);
    let err = client.chat(vec![Message::user("go")], None).await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CompletionClient::new(&format!("http://{}/v1", addr), "k", "m", 0.7, 100);
    let err = client.chat(vec![Message::user("go")], None).await.unwrap_err();
    assert!(matches!(err, LlmError::Http(_)));
}
