//! Looks up repository star counts via the GitHub REST API.

use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// A repository earns a star when it has strictly more stars than this.
pub const STAR_THRESHOLD: u64 = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum GithubErr {
    #[error("invalid repository name {0:?}: expected \"owner/name\"")]
    InvalidRepoName(String),
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to construct HTTP client: {0}")]
    Client(reqwest::Error),
}

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoName {
    type Err = GithubErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepoName {
                    owner: owner.into(),
                    repo: repo.into(),
                })
            }
            _ => Err(GithubErr::InvalidRepoName(s.into())),
        }
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Whether a repository should be starred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarDecision {
    AddStar,
    NoStar,
}

/// The star count of a repository at the time it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRating {
    pub owner: String,
    pub repo: String,
    pub stars: u64,
}

impl RepoRating {
    pub fn decide(&self, threshold: u64) -> StarDecision {
        if self.stars > threshold {
            StarDecision::AddStar
        } else {
            StarDecision::NoStar
        }
    }
}

/// The outcome of checking a repository. Displays as a human-readable report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingCheck {
    Rated { rating: RepoRating, threshold: u64 },
    /// GitHub answered with something other than 200.
    Unavailable {
        owner: String,
        repo: String,
        status: u16,
    },
}

impl RatingCheck {
    /// The decision, if the star count could be fetched.
    pub fn decision(&self) -> Option<StarDecision> {
        match self {
            RatingCheck::Rated { rating, threshold } => Some(rating.decide(*threshold)),
            RatingCheck::Unavailable { .. } => None,
        }
    }
}

impl fmt::Display for RatingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingCheck::Rated { rating, threshold } => {
                writeln!(
                    f,
                    "The repository {}/{} has {} stars.",
                    rating.owner, rating.repo, rating.stars
                )?;
                match rating.decide(*threshold) {
                    StarDecision::AddStar => write!(
                        f,
                        "Since the repository has more than {} stars, I would add a star.",
                        threshold
                    ),
                    StarDecision::NoStar => write!(
                        f,
                        "The repository doesn't meet the threshold of {} stars, so no star would be added.",
                        threshold
                    ),
                }
            }
            RatingCheck::Unavailable { status, .. } => write!(
                f,
                "Failed to fetch data from GitHub API. Status code: {}",
                status
            ),
        }
    }
}

#[derive(Deserialize)]
struct RepoMetadata {
    stargazers_count: u64,
}

/// Client for the repository metadata endpoint.
#[derive(Debug, Clone)]
pub struct GithubClient {
    pub base_url: String,
    pub threshold: u64,
    client: Client,
}

impl GithubClient {
    pub fn new<S: Into<String>>(base_url: S, threshold: u64) -> Result<Self, GithubErr> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GithubErr::Client)?;
        Ok(GithubClient {
            base_url: base_url.into(),
            threshold,
            client,
        })
    }

    pub fn from_config(config: &crate::Config) -> Result<Self, GithubErr> {
        Self::new(config.github_api_url.clone(), config.star_threshold)
    }

    /// Fetches the star count of `repo_name` ("owner/name") and compares it to the threshold.
    pub async fn check_repo_rating(&self, repo_name: &str) -> Result<RatingCheck, GithubErr> {
        let RepoName { owner, repo } = repo_name.parse()?;
        let url = format!(
            "{}/repos/{}/{}",
            self.base_url.trim_end_matches('/'),
            owner,
            repo
        );
        debug!(%url, "fetching repository metadata");

        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            info!(%owner, %repo, status = status.as_u16(), "repository metadata unavailable");
            return Ok(RatingCheck::Unavailable {
                owner,
                repo,
                status: status.as_u16(),
            });
        }

        let meta = resp.json::<RepoMetadata>().await?;
        Ok(RatingCheck::Rated {
            rating: RepoRating {
                owner,
                repo,
                stars: meta.stargazers_count,
            },
            threshold: self.threshold,
        })
    }
}
