//! Provider wire tests against a one-shot local HTTP stub.

use ai_client::{AiError, Claude, Gemini, GenerationRequest, TextGenerator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

/// Accept a single connection, answer with `status` + `body`, and hand back
/// the raw request text for assertions.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn research_request() -> GenerationRequest {
    GenerationRequest::new("You are a music researcher.", "Summarize OK Computer.")
        .temperature(0.3)
        .max_output_tokens(2048)
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gemini_sends_system_instruction_and_returns_text() {
    let body = serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "{\"genre\": \"alternative rock\"}"}]},
            "finishReason": "STOP"
        }]
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;

    let gemini = Gemini::new("test-key", "gemini-2.0-flash").with_base_url(base_url);
    let text = gemini.generate(&research_request()).await.unwrap();
    assert_eq!(text, "{\"genre\": \"alternative rock\"}");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /models/gemini-2.0-flash:generateContent"));
    assert!(raw.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(raw.contains("\"systemInstruction\""));
    assert!(raw.contains("\"maxOutputTokens\":2048"));
    assert!(raw.contains("You are a music researcher."));
}

#[tokio::test]
async fn gemini_non_success_status_is_api_error() {
    let (base_url, server) =
        serve_once("429 Too Many Requests", "{\"error\":\"quota\"}".to_string()).await;

    let gemini = Gemini::new("test-key", "gemini-2.0-flash").with_base_url(base_url);
    let err = gemini.generate(&research_request()).await.unwrap_err();
    server.await.unwrap();

    match err.downcast_ref::<AiError>() {
        Some(AiError::Api { status, message }) => {
            assert_eq!(*status, 429);
            assert!(message.contains("quota"));
        }
        other => panic!("expected AiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_empty_candidates_is_empty_response() {
    let (base_url, server) = serve_once("200 OK", "{\"candidates\": []}".to_string()).await;

    let gemini = Gemini::new("test-key", "gemini-2.0-flash").with_base_url(base_url);
    let err = gemini.generate(&research_request()).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(
        err.downcast_ref::<AiError>(),
        Some(AiError::EmptyResponse("Gemini"))
    ));
}

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claude_sends_messages_request() {
    let body = serde_json::json!({
        "content": [{"type": "text", "text": "{\"confidence\": \"high\"}"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 20, "output_tokens": 8}
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;

    let claude = Claude::new("sk-ant-test", "claude-sonnet-4-20250514").with_base_url(base_url);
    let text = claude.generate(&research_request()).await.unwrap();
    assert_eq!(text, "{\"confidence\": \"high\"}");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /messages"));
    assert!(raw.to_lowercase().contains("x-api-key: sk-ant-test"));
    assert!(raw.to_lowercase().contains("anthropic-version: 2023-06-01"));
    assert!(raw.contains("\"max_tokens\":2048"));
    assert!(raw.contains("\"system\":\"You are a music researcher.\""));
}
