use mockito::{Matcher, Server};
use repo_stars::callers::OpenAI;
use repo_stars::data_model::{ChatMessage, FinishReason, ToolChoice};
use repo_stars::tools::{repo_ratings_tool, GET_REPO_RATINGS};
use repo_stars::{chat_completion_request, CallErr, Model, ModelCaller, RetryPolicy};
use serde_json::json;

fn backend(url: String) -> OpenAI {
    OpenAI {
        model: Model::Gpt35Turbo0613,
        api_key: Some("sk-test".into()),
        base_url: url,
        ..Default::default()
    }
}

const TOOL_CALL_RESPONSE: &str = r#"{
    "id": "chatcmpl-123",
    "object": "chat.completion",
    "model": "gpt-3.5-turbo-0613",
    "choices": [{
        "index": 0,
        "message": {
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_abc",
                "type": "function",
                "function": {
                    "name": "get_repo_ratings",
                    "arguments": "{\"repo_name\": \"run-llama/llama_index\"}"
                }
            }]
        },
        "finish_reason": "tool_calls"
    }]
}"#;

#[tokio::test]
async fn requests_tool_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo-0613",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "usr"},
            ],
            "tool_choice": {"type": "function", "function": {"name": GET_REPO_RATINGS}},
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOOL_CALL_RESPONSE)
        .create_async()
        .await;

    let mut caller = backend(server.url());
    let resp = chat_completion_request(
        &mut caller,
        &RetryPolicy::immediate(3),
        vec![ChatMessage::system("sys"), ChatMessage::user("usr")],
        vec![repo_ratings_tool()],
        Some(ToolChoice::Function(GET_REPO_RATINGS.into())),
    )
    .await
    .unwrap();
    mock.assert_async().await;

    assert_eq!(resp.choices[0].finish_reason, FinishReason::ToolCalls);
    let call = &resp.first_message().unwrap().tool_calls[0];
    assert_eq!(call.id, "call_abc");
    assert_eq!(
        call.function.to_string(),
        r#"get_repo_ratings({"repo_name": "run-llama/llama_index"})"#
    );
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(3)
        .create_async()
        .await;

    let mut caller = backend(server.url());
    let err = chat_completion_request(
        &mut caller,
        &RetryPolicy::immediate(3),
        vec![ChatMessage::user("usr")],
        vec![repo_ratings_tool()],
        None,
    )
    .await
    .unwrap_err();
    mock.assert_async().await;

    match err {
        CallErr::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(
                matches!(*last, CallErr::Status { status: 500, ref body } if body == "upstream exploded")
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_choices() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"object": "chat.completion", "choices": []}"#)
        .create_async()
        .await;

    let err = backend(server.url())
        .call(Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CallErr::NoCompletions));
}

#[tokio::test]
async fn truncated_completion_is_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"role": "assistant", "content": "cut"}, "finish_reason": "length"}]}"#,
        )
        .create_async()
        .await;

    let err = backend(server.url())
        .call(Default::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unexpected finish reason"));
}

#[tokio::test]
async fn fills_missing_model() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]}"#,
        )
        .create_async()
        .await;

    let resp = backend(server.url())
        .call(Default::default())
        .await
        .unwrap();
    assert_eq!(resp.model, "gpt-3.5-turbo-0613");
    assert_eq!(resp.first_message().unwrap().content.as_deref(), Some("ok"));
}
