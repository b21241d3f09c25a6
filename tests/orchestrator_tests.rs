//! Integration tests for the merge/fallback policies of the ingredient and
//! recipe orchestrators.


use recipe_suggest::assistant::CulinaryAssistant;
use recipe_suggest::config::LimitsConfig;
use recipe_suggest::ingredients::IngredientService;
use recipe_suggest::models::{ContextAttributes, Source};
use recipe_suggest::recipes::{RecipeService, RewriteError};
use std::sync::Arc;
use test_helpers::{dataset_from_json, sample_dataset_json, StubCompletionClient};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn ingredient_service(
    client: StubCompletionClient,
    dataset_json: &str,
) -> (IngredientService<StubCompletionClient>, tempfile::NamedTempFile) {
    let (dataset, file) = dataset_from_json(dataset_json);
    let service = IngredientService::new(
        CulinaryAssistant::new(client),
        Arc::new(dataset),
        LimitsConfig::default(),
    );
    (service, file)
}

fn recipe_service(client: StubCompletionClient) -> RecipeService<StubCompletionClient> {
    RecipeService::new(CulinaryAssistant::new(client), None, LimitsConfig::default())
}

#[tokio::test]
async fn substitutes_return_direct_result_when_non_empty() {
    let client = StubCompletionClient::with_replies(&["1. Margarine"]);
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let result = service.substitutes("butter", None, None, false).await;

    assert_eq!(result.items, vec!["Margarine"]);
    assert_eq!(result.source, Source::Gpt);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn substitutes_fall_back_to_context_query_with_relabel() {
    // First reply is blank (direct query empty), second answers the context query
    let client = StubCompletionClient::with_replies(&["", "1. Olive oil\n2. Ghee"]);
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let result = service
        .substitutes("butter", Some("flatbread"), None, false)
        .await;

    assert_eq!(result.items, vec!["Olive oil", "Ghee"]);
    assert_eq!(result.source, Source::GptContext);
    assert_eq!(client.call_count(), 2);

    // The fallback query carries the recipe title
    let calls = client.calls();
    assert!(calls[1].user_prompt.contains("Recipe: flatbread"));
}

#[tokio::test]
async fn substitutes_exhausted_fallbacks_yield_none() {
    let client = StubCompletionClient::failing();
    let (service, _file) = ingredient_service(client, sample_dataset_json());

    let result = service.substitutes("butter", None, None, false).await;

    assert!(result.is_empty());
    assert_eq!(result.source, Source::None);
}

#[tokio::test]
async fn context_merge_appends_adapter_items() {
    // Dataset answers ["Apple", "Beetroot", "Carrot"] for sweet (3 < max 5),
    // adapter adds two more, one of them a case-insensitive duplicate
    let client = StubCompletionClient::with_replies(&["1. carrot\n2. Mango\n3. Honey"]);
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let context = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(context, None, None, Some(5))
        .await;

    assert_eq!(
        result.items,
        vec!["Apple", "Beetroot", "Carrot", "Mango", "Honey"]
    );
    assert_eq!(result.source, Source::DatasetGpt);
}

#[tokio::test]
async fn context_dataset_satisfying_max_skips_adapter() {
    let client = StubCompletionClient::with_replies(&["unused"]);
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let context = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(context, None, None, Some(3))
        .await;

    assert_eq!(result.items.len(), 3);
    assert_eq!(result.source, Source::Dataset);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn context_unavailable_adapter_returns_dataset_as_is() {
    let client = StubCompletionClient::unavailable();
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let context = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(context, None, None, Some(10))
        .await;

    assert_eq!(result.items, vec!["Apple", "Beetroot", "Carrot"]);
    assert_eq!(result.source, Source::Dataset);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn context_adapter_failure_returns_dataset_result() {
    let client = StubCompletionClient::failing();
    let (service, _file) = ingredient_service(client, sample_dataset_json());

    let context = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(context, None, None, Some(10))
        .await;

    assert_eq!(result.items, vec!["Apple", "Beetroot", "Carrot"]);
    assert_eq!(result.source, Source::Dataset);
}

#[tokio::test]
async fn natural_description_parses_with_explicit_attribute_precedence() {
    // The parse reply claims bitter/fibrous; the explicit taste wins, the
    // parsed texture fills the gap
    let client = StubCompletionClient::with_replies(&[
        "{\"taste\": \"bitter\", \"texture\": \"fibrous\", \"color\": null, \"cooking_method\": null}",
        "",
    ]);
    let (service, _file) = ingredient_service(client.clone(), sample_dataset_json());

    let explicit = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(explicit, None, Some("something bitter and stringy"), Some(10))
        .await;

    // sweet (explicit) + fibrous (parsed): Celery scores on texture only,
    // the sweet entries score on taste
    assert!(result.items.contains(&"Celery".to_string()));
    assert!(result.items.contains(&"Apple".to_string()));
}

#[tokio::test]
async fn context_both_sources_empty_yield_none() {
    let client = StubCompletionClient::with_replies(&[""]);
    let (service, _file) = ingredient_service(client, "{}");

    let context = ContextAttributes {
        taste: Some("sweet".to_string()),
        ..Default::default()
    };
    let result = service
        .context_suggestions(context, None, None, Some(5))
        .await;

    assert!(result.is_empty());
    assert_eq!(result.source, Source::None);
}

#[tokio::test]
async fn recipe_suggestions_without_store_use_adapter() {
    let client = StubCompletionClient::with_replies(&[
        "1. Recipe: Omelette | Ingredients: eggs, butter",
    ]);
    let service = recipe_service(client.clone());

    let recipes = service.suggestions(&strings(&["eggs"]), None).await;

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "Omelette");
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn recipe_suggestions_unavailable_adapter_yield_empty() {
    let client = StubCompletionClient::unavailable();
    let service = recipe_service(client.clone());

    let recipes = service.suggestions(&strings(&["eggs"]), None).await;

    assert!(recipes.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn rewrite_short_circuits_when_details_lookup_fails() {
    let client = StubCompletionClient::failing();
    let service = recipe_service(client.clone());

    let result = service.rewrite("Pancakes", "cow milk", "oat milk").await;

    assert_eq!(
        result,
        Err(RewriteError::IngredientsNotFound {
            recipe: "Pancakes".to_string()
        })
    );
    // Only the detail lookup went out; the rewrite call was never made
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn rewrite_flattens_ingredients_and_propagates_result() {
    let client = StubCompletionClient::with_replies(&[
        "Ingredients: 1. 2 eggs\n2. 1 cup cow milk | Cooking Method: Whisk and fry.",
        "Updated Ingredients: 2 eggs, 1 cup oat milk | Updated Cooking Method: Whisk and fry.",
    ]);
    let service = recipe_service(client.clone());

    let details = service
        .rewrite("Pancakes", "cow milk", "oat milk")
        .await
        .expect("rewrite should succeed");

    assert_eq!(details.ingredients, "2 eggs, 1 cup oat milk");

    // The rewrite prompt received the comma-joined ingredient list
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].user_prompt.contains("2 eggs, 1 cup cow milk"));
}

#[tokio::test]
async fn rewrite_failure_after_lookup_reports_rewrite_failed() {
    let client = StubCompletionClient::with_replies(&[
        "Ingredients: 2 eggs, cow milk | Cooking Method: Whisk and fry.",
    ]);
    let service = recipe_service(client.clone());

    let result = service.rewrite("Pancakes", "cow milk", "oat milk").await;

    assert_eq!(
        result,
        Err(RewriteError::RewriteFailed {
            recipe: "Pancakes".to_string()
        })
    );
    assert_eq!(client.call_count(), 2);
}
