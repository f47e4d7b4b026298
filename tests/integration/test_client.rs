//! Integration tests for the chat-completion client against a fake provider.

mod support;

use mathgen_client::{
    ChatCompletionClient, ClientError, CompletionClient, Provider, ProviderErrorKind,
    ProviderSettings,
};
use support::{spawn_fake_provider, FakeReply, TEST_API_KEY};

fn client_for(base_url: &str) -> ChatCompletionClient {
    let settings =
        ProviderSettings::for_provider(Provider::DeepSeek, TEST_API_KEY).with_base_url(base_url);
    ChatCompletionClient::new(settings)
}

/// Tests that the request carries the model, both messages and sampling settings.
#[tokio::test]
async fn test_request_shape_and_auth() {
    let provider = spawn_fake_provider(FakeReply::Completion("Q: 1 + 1?\nAnswer: 2\n---".into())).await;
    let client = client_for(&provider.base_url);

    let content = client
        .complete("system text", "user text")
        .await
        .expect("completion should succeed");
    assert_eq!(content, "Q: 1 + 1?\nAnswer: 2\n---");

    let received = provider.received();
    assert_eq!(received.len(), 1, "exactly one round trip, no retries");
    let request = &received[0];

    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_API_KEY}").as_str())
    );
    assert_eq!(request.body["model"], "deepseek-chat");
    assert_eq!(request.body["max_tokens"], 3000);
    let temperature = request.body["temperature"].as_f64().expect("temperature");
    assert!((temperature - 0.7).abs() < 1e-6);

    let messages = request.body["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "system text");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "user text");
}

/// Tests that a provider error surfaces the status and the body unchanged.
#[tokio::test]
async fn test_provider_error_is_forwarded_verbatim() {
    let body = r#"{"error":{"message":"Authentication Fails (no such user)","type":"authentication_error"}}"#;
    let provider = spawn_fake_provider(FakeReply::Error(401, body.to_string())).await;
    let client = client_for(&provider.base_url);

    let err = client
        .complete("s", "u")
        .await
        .expect_err("401 should fail");

    match &err {
        ClientError::Provider {
            kind,
            status,
            body: received,
        } => {
            assert_eq!(*status, 401);
            assert_eq!(*kind, ProviderErrorKind::Authentication);
            assert_eq!(received, body);
        }
        other => panic!("expected provider error, got {other:?}"),
    }
    assert_eq!(provider.received().len(), 1);
}

/// Tests that a rate limit is classified and never retried.
#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let provider = spawn_fake_provider(FakeReply::Error(429, "slow down".to_string())).await;
    let client = client_for(&provider.base_url);

    let err = client.complete("s", "u").await.expect_err("429 should fail");
    assert_eq!(err.kind(), ProviderErrorKind::RateLimit);
    assert_eq!(provider.received().len(), 1);
}

/// Tests that a 200 response without choices is a malformed completion.
#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let provider = spawn_fake_provider(FakeReply::NoChoices).await;
    let client = client_for(&provider.base_url);

    let err = client
        .complete("s", "u")
        .await
        .expect_err("missing choices should fail");
    assert!(matches!(err, ClientError::MalformedCompletion(_)));
}

/// Tests that overridden model and token limit reach the wire.
#[tokio::test]
async fn test_settings_overrides_reach_provider() {
    let provider = spawn_fake_provider(FakeReply::Completion(String::new())).await;
    let settings = ProviderSettings::for_provider(Provider::Groq, TEST_API_KEY)
        .with_base_url(&provider.base_url)
        .with_model("llama3-70b-8192")
        .with_max_tokens(1234);
    let client = ChatCompletionClient::new(settings);

    let content = client.complete("s", "u").await.expect("completion");
    assert!(content.is_empty());

    let request = &provider.received()[0];
    assert_eq!(request.body["model"], "llama3-70b-8192");
    assert_eq!(request.body["max_tokens"], 1234);
}
