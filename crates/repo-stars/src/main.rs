use repo_stars::callers::OpenAI;
use repo_stars::data_model::ChatMessage;
use repo_stars::tools::{function_message, repo_ratings_tool};
use repo_stars::{chat_completion_request, execute_function_call, Config, GithubClient};

use indoc::indoc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SYSTEM_PROMPT: &str = indoc! {"
    If the repository contains more than 10 stars then I should add a star to the repo.
    Tell me if I should add a star."
};

const USER_PROMPT: &str = "I am hearing a lot about run-llama/llama_index nowadays, \
    if the repository contains more than 10 stars then add a star from myself";

const SECONDARY_REPO: &str = "dexstakker/scrabbler";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    info!(?config, "loaded configuration");

    let github = GithubClient::from_config(&config)?;
    let mut backend = OpenAI::from_config(&config);

    let mut messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(USER_PROMPT),
    ];

    let resp = chat_completion_request(
        &mut backend,
        &config.retry,
        messages.clone(),
        vec![repo_ratings_tool()],
        None,
    )
    .await?;
    let assistant = resp
        .first_message()
        .cloned()
        .ok_or(repo_stars::CallErr::NoCompletions)?;

    match assistant.tool_calls.first() {
        Some(call) => {
            messages.push(ChatMessage::assistant(call.function.to_string()));
            match execute_function_call(&assistant, &github).await {
                Ok(output) => {
                    println!("{}", output);
                    messages.push(function_message(call, &output));
                }
                Err(e) => println!("Tool call failed: {}", e),
            }
        }
        None => messages.push(assistant),
    }

    println!("{}", serde_json::to_string_pretty(&messages)?);

    println!("Secondary Testing");
    match github.check_repo_rating(SECONDARY_REPO).await {
        Ok(check) => println!("{}", check),
        Err(e) => println!("{}", e),
    }

    Ok(())
}
