use repo_stars::{Config, GithubClient};

/// Checks a repository directly, without asking a model first.
///
/// `cargo run --example check_repo -- octocat/Hello-World`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repo = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dexstakker/scrabbler".into());

    let github = GithubClient::from_config(&Config::load()?)?;
    println!("{}", github.check_repo_rating(&repo).await?);
    Ok(())
}
