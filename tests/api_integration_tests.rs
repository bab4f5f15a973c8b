use dotenv::dotenv;
use menu_planner::api_connection::{
    connection::ApiConnectionError,
    endpoints::{ChatCompletionRequest, ChatMessage, OPENROUTER_MODELS, Provider},
};
use menu_planner::assistant::ChatAssistant;
use std::env;

const TEST_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

fn get_test_model() -> String {
    Provider::openrouter(TEST_API_KEY_ENV_VAR)
        .get_available_models()
        .first()
        .map(|m| m.model_name.to_string())
        .expect("No model found in OPENROUTER_MODELS for testing")
}

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::openrouter("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    assert!(!provider.is_configured());

    let request = ChatCompletionRequest {
        model: get_test_model(),
        messages: vec![ChatMessage::user("Hello")],
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[test]
fn test_provider_lists_builtin_models() {
    let models = Provider::openrouter(TEST_API_KEY_ENV_VAR).get_available_models();
    assert_eq!(models.len(), OPENROUTER_MODELS.len());
    assert!(models.iter().any(|m| m.model_name == "google/gemini-2.5-flash"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    const KEY_VAR: &str = "MENU_PLANNER_TEST_UNREACHABLE_KEY";
    std::env::set_var(KEY_VAR, "not-a-real-key");

    // nothing listens on the discard port locally
    let provider = Provider::openrouter(KEY_VAR)
        .with_base_url("http://127.0.0.1:9/v1/chat/completions");
    assert!(provider.is_configured());
    let request = ChatCompletionRequest {
        model: get_test_model(),
        messages: vec![ChatMessage::user("Hello")],
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    std::env::remove_var(KEY_VAR);
    assert!(matches!(result, Err(ApiConnectionError::NetworkError(_))), "got {:?}", result);
}

#[tokio::test]
#[ignore]
async fn test_assistant_suggests_recipes() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_assistant_suggests_recipes: {} not set.", TEST_API_KEY_ENV_VAR);
        return;
    }

    let assistant =
        ChatAssistant::new(Provider::openrouter(TEST_API_KEY_ENV_VAR), get_test_model());
    let history = vec![
        ChatMessage::user("I want something quick for two people tonight."),
        ChatMessage::assistant("Sure! Any main ingredient you'd like?"),
    ];
    let result = assistant.respond("Chicken, please. Give me one recipe link.", &history).await;
    assert!(result.is_ok(), "API call failed: {:?}", result.err());
    let answer = result.unwrap();
    assert!(!answer.reply.is_empty());
    for url in &answer.recipe_urls {
        assert!(url.to_lowercase().contains("bbcgoodfood.com/recipes/"));
    }
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    setup_test_environment();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_KEY_VALUE";
    unsafe {
        std::env::set_var(
            INVALID_KEY_ENV_NAME_FOR_THIS_TEST,
            "this_is_a_deliberately_bad_api_key_string_for_testing",
        );
    }

    let provider = Provider::openrouter(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    let request = ChatCompletionRequest {
        model: get_test_model(),
        messages: vec![ChatMessage::user("This call should fail due to invalid key.")],
        temperature: None,
        max_tokens: None,
    };

    let result = provider.call_chat_completion(request).await;
    assert!(
        matches!(result, Err(ApiConnectionError::ApiError { .. })),
        "Expected ApiError, got {:?}",
        result
    );
    if let Err(ApiConnectionError::ApiError { status, .. }) = result {
        assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
    }

    unsafe {
        std::env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    }
}
