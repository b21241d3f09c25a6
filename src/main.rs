use anyhow::Result;
use recipe_suggest::assistant::CulinaryAssistant;
use recipe_suggest::completion::OpenAiClient;
use recipe_suggest::config::AppConfig;
use recipe_suggest::dataset::DatasetService;
use recipe_suggest::ingredients::IngredientService;
use recipe_suggest::models::ContextAttributes;
use recipe_suggest::observability;
use recipe_suggest::recipe_store::RecipeStore;
use recipe_suggest::recipes::RecipeService;
use std::env;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage:
  recipe-suggest substitute <ingredient> [recipe]
  recipe-suggest suggest <ingredient,ingredient,...>
  recipe-suggest similar <recipe>
  recipe-suggest lookup <recipe>
  recipe-suggest context <natural language description>
  recipe-suggest rewrite <recipe> <old ingredient> <new ingredient>";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    observability::init_logging();

    let config = AppConfig::from_env()?;
    config.validate()?;
    info!("{}", config.summary());

    let client = OpenAiClient::new(config.completion.clone())?;
    let assistant = CulinaryAssistant::new(client);
    let dataset = Arc::new(DatasetService::new(config.dataset.clone()));
    let store = RecipeStore::connect(&config.database).await?;

    let ingredient_service = IngredientService::new(
        assistant.clone(),
        Arc::clone(&dataset),
        config.limits.clone(),
    );
    let recipe_service = RecipeService::new(assistant, store, config.limits.clone());

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (Some(command.as_str()), rest),
        None => (None, &[][..]),
    };

    match (command, rest) {
        (Some("substitute"), [ingredient, rest @ ..]) => {
            let recipe = rest.first().map(String::as_str);
            let result = ingredient_service
                .substitutes(ingredient, recipe, None, false)
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        (Some("suggest"), [ingredients]) => {
            let ingredients: Vec<String> = ingredients
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            let recipes = recipe_service.suggestions(&ingredients, None).await;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
        (Some("similar"), [recipe]) => {
            let recipes = recipe_service.similar(recipe, None).await;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
        (Some("lookup"), [recipe]) => match recipe_service.details(recipe).await {
            Some(details) => println!("{}", serde_json::to_string_pretty(&details)?),
            None => println!("No details available for '{}'", recipe),
        },
        (Some("context"), description @ [_, ..]) => {
            let description = description.join(" ");
            let result = ingredient_service
                .context_suggestions(
                    ContextAttributes::default(),
                    None,
                    Some(&description),
                    None,
                )
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        (Some("rewrite"), [recipe, old_ingredient, new_ingredient]) => {
            match recipe_service
                .rewrite(recipe, old_ingredient, new_ingredient)
                .await
            {
                Ok(details) => println!("{}", serde_json::to_string_pretty(&details)?),
                Err(e) => println!("{}", serde_json::to_string_pretty(&e)?),
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
