//! End-to-end tests for the generation service.
//!
//! The HTTP router, pipeline and real chat-completion client run against a
//! fake provider served on a local port, so no API key or network access is
//! needed.

mod support;

use std::path::PathBuf;
use std::sync::Arc;

use mathgen_client::{ChatCompletionClient, Provider, ProviderSettings};
use mathgen_core::{
    BlockError, QuestionBatch, QuestionType, ResponseParser, COMPARISON_OPTIONS,
};
use mathgen_service::{create_router, AppState, Config, Pipeline, SERVICE_BANNER};
use serde_json::{json, Value};
use support::{spawn_fake_provider, spawn_router, FakeProvider, FakeReply, TEST_API_KEY};

/// Path to the fixtures directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path().join(name)).expect("Failed to read fixture")
}

/// Starts the service wired to `provider` and returns its base URL.
async fn spawn_service(provider: &FakeProvider) -> (String, tokio::task::JoinHandle<()>) {
    let config = Config {
        base_url: Some(provider.base_url.clone()),
        ..Default::default()
    };
    let settings = config.provider_settings_with_key(TEST_API_KEY);
    let pipeline = Pipeline::new(Arc::new(ChatCompletionClient::new(settings)));
    spawn_router(create_router(AppState::new(config, pipeline))).await
}

async fn post_generate(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/generate-math-questions"))
        .json(&body)
        .send()
        .await
        .expect("request failed")
}

/// Tests the numerical scenario end to end over HTTP.
#[tokio::test]
async fn test_generate_numerical_over_http() {
    let completion = "Q: Sam has 4 apples and buys 3 more. How many apples now?
Answer: 7
Explanation: 4 + 3 = 7
---
Q: What is 10 minus 6?
Answer: 4
Explanation: 10 - 6 = 4
---
";
    let provider = spawn_fake_provider(FakeReply::Completion(completion.to_string())).await;
    let (base, _server) = spawn_service(&provider).await;

    let response = post_generate(
        &base,
        json!({
            "year_level": 3,
            "difficulty": "easy",
            "question_type": "numerical",
            "topic": "arithmetic",
            "num_questions": 2
        }),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let batch: QuestionBatch = response.json().await.expect("batch json");
    assert_eq!(batch.count, 2);
    assert_eq!(batch.questions[0].correct_answer, "7");
    assert_eq!(batch.questions[1].correct_answer, "4");
    assert!(batch.questions.iter().all(|q| q.options.is_none()));
    assert!(batch
        .questions
        .iter()
        .all(|q| q.question_type == QuestionType::Numerical));

    // The prompt that reached the provider names the request parameters.
    let received = provider.received();
    assert_eq!(received.len(), 1);
    let user = received[0].body["messages"][1]["content"]
        .as_str()
        .expect("user message");
    assert!(user.contains("Create exactly 2 questions"));
    assert!(user.contains("Year 3"));
}

/// Tests that a partially malformed completion yields a shorter batch.
#[tokio::test]
async fn test_generate_multiple_choice_fixture() {
    let provider =
        spawn_fake_provider(FakeReply::Completion(read_fixture("multiple_choice_completion.txt")))
            .await;
    let (base, _server) = spawn_service(&provider).await;

    let response = post_generate(
        &base,
        json!({
            "year_level": 2,
            "difficulty": "medium",
            "question_type": "multiple_choice",
            "topic": "arithmetic",
            "num_questions": 4
        }),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: Value = response.json().await.expect("json");
    assert_eq!(json["count"], 3);
    assert_eq!(
        json["questions"][0]["options"],
        json!(["A) 6", "B) 7", "C) 8", "D) 17"])
    );
    assert!(json["questions"][1]["options"].is_null());
    assert_eq!(json["questions"][2]["correct_answer"], "C");
}

/// Tests that provider failures become 502 responses carrying the provider text.
#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let provider = spawn_fake_provider(FakeReply::Error(
        402,
        r#"{"error":{"message":"Insufficient Balance"}}"#.to_string(),
    ))
    .await;
    let (base, _server) = spawn_service(&provider).await;

    let response = post_generate(
        &base,
        json!({
            "year_level": 4,
            "difficulty": "hard",
            "question_type": "problem_solving",
            "topic": "geometry"
        }),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    let json: Value = response.json().await.expect("json");
    let detail = json["detail"].as_str().expect("detail");
    assert!(detail.contains("Insufficient Balance"));
    assert!(detail.contains("402"));
}

/// Tests that invalid requests are rejected without contacting the provider.
#[tokio::test]
async fn test_validation_failure_skips_provider() {
    let provider = spawn_fake_provider(FakeReply::Completion(String::new())).await;
    let (base, _server) = spawn_service(&provider).await;

    let response = post_generate(
        &base,
        json!({
            "year_level": 3,
            "difficulty": "impossible",
            "question_type": "numerical",
            "topic": "arithmetic"
        }),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json().await.expect("json");
    assert!(json["detail"].as_str().expect("detail").contains("impossible"));
    assert!(provider.received().is_empty());
}

/// Tests the root banner and CORS headers on a real socket.
#[tokio::test]
async fn test_root_banner_with_cors() {
    let provider = spawn_fake_provider(FakeReply::Completion(String::new())).await;
    let (base, _server) = spawn_service(&provider).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
    let json: Value = response.json().await.expect("json");
    assert_eq!(json["message"], SERVICE_BANNER);
}

/// Tests the pipeline directly against the comparison fixture.
#[tokio::test]
async fn test_pipeline_comparison_fixture() {
    let provider =
        spawn_fake_provider(FakeReply::Completion(read_fixture("comparison_completion.txt"))).await;
    let settings = ProviderSettings::for_provider(Provider::DeepSeek, TEST_API_KEY)
        .with_base_url(&provider.base_url);
    let pipeline = Pipeline::new(Arc::new(ChatCompletionClient::new(settings)));

    let request = serde_json::from_value(json!({
        "year_level": 5,
        "difficulty": "medium",
        "question_type": "comparison",
        "topic": "arithmetic",
        "num_questions": 2
    }))
    .expect("request");
    let batch = pipeline.generate(&request).await.expect("generation");

    assert_eq!(batch.count, 2);
    let canonical: Vec<String> = COMPARISON_OPTIONS.iter().map(ToString::to_string).collect();
    for question in &batch.questions {
        assert_eq!(question.options.as_ref(), Some(&canonical));
    }
    assert_eq!(
        batch.questions[0].question,
        "Compare Quantity A and Quantity B. Quantity A: 3/4 of 20. Quantity B: 2/3 of 24."
    );
    assert_eq!(
        batch.questions[1].question,
        "Compare Quantity A and Quantity B. Quantity A: 0.5. Quantity B: 1/2."
    );
}

/// Tests that the parser reports which fixture block was dropped.
#[test]
fn test_fixture_parse_report() {
    let raw = read_fixture("multiple_choice_completion.txt");
    let report = ResponseParser::parse_report(&raw, QuestionType::MultipleChoice);

    assert_eq!(report.questions.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 2);
    assert_eq!(report.skipped[0].reason, BlockError::MissingAnswer);

    // Re-parsing is idempotent.
    assert_eq!(
        ResponseParser::parse(&raw, QuestionType::MultipleChoice),
        report.questions
    );
}

/// Tests that the sample config loads and resolves to the provider preset.
#[test]
fn test_sample_config_loads() {
    let config =
        Config::load_from_file(&fixture_path().join("mathgen.json")).expect("Failed to load config");

    assert_eq!(config.provider, Provider::Groq);
    assert_eq!(config.api_key_var(), "MATHGEN_FIXTURE_API_KEY");
    assert_eq!(config.timeout, 30);
    assert_eq!(config.port, 8080);

    let settings = config.provider_settings_with_key("k");
    assert_eq!(settings.model, "llama3-8b-8192");
    assert_eq!(settings.max_tokens, 4000);
}
