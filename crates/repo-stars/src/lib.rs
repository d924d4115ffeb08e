pub mod data_model;
use crate::data_model::{ChatMessage, CompletionsRequest, CompletionsResponse, Tool, ToolChoice};

pub mod models;
pub use models::Model;

pub mod retry;
pub use retry::RetryPolicy;

pub mod callers;
pub use callers::{chat_completion_request, ModelCaller};

pub mod config;
pub use config::Config;

pub mod github;
pub use github::GithubClient;

pub mod tools;
pub use tools::execute_function_call;

/// Describes an error which occurred during a model call.
#[derive(Debug, thiserror::Error)]
pub enum CallErr {
    /// The response lacked any completions.
    #[error("no completions returned")]
    NoCompletions,
    /// A network or basic deserialization error occurred.
    #[error("API request failed: {0}")]
    API(#[from] reqwest::Error),
    /// The provider answered with a non-success HTTP status.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// No API key was configured or present in the environment.
    #[error("no API key configured; set OPENAI_API_KEY")]
    MissingApiKey,
    /// Every attempt allowed by the [RetryPolicy] failed.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<CallErr> },
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for CallErr {
    fn from(inp: &str) -> Self {
        CallErr::Other(inp.into())
    }
}

impl From<String> for CallErr {
    fn from(inp: String) -> Self {
        CallErr::Other(inp)
    }
}

/// The parameters of one model call.
#[derive(Debug, Clone, Default)]
pub struct CallBase {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<Tool>,
    /// Defaults to [ToolChoice::Auto] when tools are supplied.
    pub tool_choice: Option<ToolChoice>,
}

impl CallBase {
    fn into_request(self, model: &str) -> CompletionsRequest {
        CompletionsRequest {
            model: model.into(),
            tool_choice: match (self.tool_choice, self.tools.is_empty()) {
                (Some(choice), _) => Some(choice),
                (None, false) => Some(ToolChoice::Auto),
                (None, true) => None,
            },
            messages: self.messages,
            tools: self.tools,
        }
    }
}

/// The validated result of a model call.
pub type CallResp = CompletionsResponse;
