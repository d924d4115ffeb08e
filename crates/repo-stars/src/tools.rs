//! Describes the locally-callable function to the model, and dispatches its calls.

use crate::data_model::{ChatMessage, FunctionInfo, Tool, ToolCall};
use crate::github::{GithubClient, GithubErr, RatingCheck};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, warn};

pub const GET_REPO_RATINGS: &str = "get_repo_ratings";

/// The definition of [GET_REPO_RATINGS] as offered to the model.
pub fn repo_ratings_tool() -> Tool {
    FunctionInfo::new(
        GET_REPO_RATINGS,
        "Get the number of stars for a github repo.",
        Some(json!({
            "type": "object",
            "properties": {
                "repo_name": {
                    "type": "string",
                    "description": "Name of the repo",
                },
            },
            "required": ["repo_name"],
        })),
    )
    .into()
}

#[derive(Debug, Deserialize)]
struct RepoRatingsArgs {
    repo_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchErr {
    #[error("message contains no tool calls")]
    NoToolCalls,
    #[error("invalid arguments for {name}: {source}")]
    Arguments {
        name: String,
        source: serde_json_lenient::Error,
    },
    #[error(transparent)]
    Github(#[from] GithubErr),
}

/// What running a tool call produced. Displays as the content of the resulting function message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Rating(RatingCheck),
    /// The model asked for a function that isn't registered.
    UnknownFunction(String),
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Rating(check) => fmt::Display::fmt(check, f),
            ToolOutput::UnknownFunction(name) => {
                write!(f, "Error: function {} does not exist", name)
            }
        }
    }
}

/// Runs the first tool call in `message`. Any further tool calls are ignored.
pub async fn execute_function_call(
    message: &ChatMessage,
    github: &GithubClient,
) -> Result<ToolOutput, DispatchErr> {
    let (call, rest) = message
        .tool_calls
        .split_first()
        .ok_or(DispatchErr::NoToolCalls)?;
    if !rest.is_empty() {
        warn!(
            ignored = ?rest.iter().map(|c| c.function.name.as_str()).collect::<Vec<_>>(),
            "only the first tool call is executed"
        );
    }
    debug!(id = %call.id, function = %call.function, "dispatching tool call");

    match call.function.name.as_str() {
        GET_REPO_RATINGS => {
            let args: RepoRatingsArgs = serde_json_lenient::from_str(&call.function.arguments)
                .map_err(|source| DispatchErr::Arguments {
                    name: call.function.name.clone(),
                    source,
                })?;
            Ok(ToolOutput::Rating(
                github.check_repo_rating(&args.repo_name).await?,
            ))
        }
        other => Ok(ToolOutput::UnknownFunction(other.into())),
    }
}

/// The function-role message reporting `output` back against `call`.
pub fn function_message(call: &ToolCall, output: &ToolOutput) -> ChatMessage {
    ChatMessage::function_result(call, output.to_string())
}
