use crate::data_model::{ChatMessage, FinishReason, Tool, ToolChoice};
use crate::{CallBase, CallErr, CallResp, Model, RetryPolicy};
use reqwest::Client;
use std::env;
use tracing::{debug, warn};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// A type which is able to make model calls.
pub trait ModelCaller: Send {
    /// Returns the model this backend is wired to.
    fn get_model(&self) -> Model;

    /// Implements one model call to complete a turn in an LLM conversation.
    fn call(
        &mut self,
        params: CallBase,
    ) -> impl std::future::Future<Output = Result<CallResp, CallErr>> + Send;
}

/// A [ModelCaller] that talks to an OpenAI-compatible chat completions API.
///
/// If an API key is not provided, it will be read from the environment variable
/// `OPENAI_API_KEY`.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub model: Model,
    pub api_key: Option<String>,
    pub base_url: String,
    pub client: Client,
}

impl Default for OpenAI {
    fn default() -> Self {
        OpenAI {
            model: Model::default(),
            api_key: None,
            base_url: DEFAULT_OPENAI_URL.into(),
            client: Client::new(),
        }
    }
}

impl OpenAI {
    pub fn from_config(config: &crate::Config) -> Self {
        OpenAI {
            model: config.model,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            ..Default::default()
        }
    }

    fn api_key(&self) -> Result<String, CallErr> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
            .ok_or(CallErr::MissingApiKey)
    }
}

impl ModelCaller for OpenAI {
    fn get_model(&self) -> Model {
        self.model
    }

    async fn call(&mut self, params: CallBase) -> Result<CallResp, CallErr> {
        let model_str = self.model.api_str();
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(url)
            .bearer_auth(self.api_key()?)
            .json(&params.into_request(model_str))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CallErr::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let mut res = resp.json::<CallResp>().await?;

        if res.model.is_empty() {
            res.model = model_str.into();
        }
        if let Some("chat.completion") = res.object.as_deref() {
        } else if let Some(object) = &res.object {
            return Err(format!("unexpected value for 'object': {}", object).into());
        }
        if res.choices.is_empty() {
            return Err(CallErr::NoCompletions);
        }

        match res.choices[0].finish_reason {
            FinishReason::Stop | FinishReason::ToolCalls | FinishReason::FunctionCall => Ok(res),
            reason => Err(format!("unexpected finish reason: {:?}", reason).into()),
        }
    }
}

/// Requests a chat completion, retrying failed calls according to `policy`.
///
/// The final error is returned as [CallErr::RetriesExhausted] once every attempt has failed.
pub async fn chat_completion_request<C: ModelCaller>(
    caller: &mut C,
    policy: &RetryPolicy,
    messages: Vec<ChatMessage>,
    tools: Vec<Tool>,
    tool_choice: Option<ToolChoice>,
) -> Result<CallResp, CallErr> {
    let params = CallBase {
        messages,
        tools,
        tool_choice,
    };
    let attempts = policy.attempts();

    let mut attempt = 1;
    loop {
        debug!(attempt, model = caller.get_model().api_str(), "requesting chat completion");
        let err = match caller.call(params.clone()).await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };
        warn!(attempt, error = %err, "Unable to generate ChatCompletion response");

        if attempt >= attempts {
            return Err(CallErr::RetriesExhausted {
                attempts,
                last: Box::new(err),
            });
        }
        tokio::time::sleep(policy.backoff(attempt)).await;
        attempt += 1;
    }
}
