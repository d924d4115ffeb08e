//! Wire types for an OpenAI-compatible chat completions API.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;

/// Who authored a [ChatMessage].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    #[default]
    User,
    Assistant,
    Tool,
    Function,
}

/// One entry in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    fn with_role<S: Into<String>>(role: MessageRole, content: S) -> Self {
        ChatMessage {
            role,
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    /// The result of running a local function on behalf of the tool call `call`.
    pub fn function_result<S: Into<String>>(call: &ToolCall, content: S) -> Self {
        ChatMessage {
            role: MessageRole::Function,
            content: Some(content.into()),
            tool_call_id: Some(call.id.clone()),
            name: Some(call.function.name.clone()),
            ..Default::default()
        }
    }
}

/// A request from the model to run a local function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: FunctionCall,
}

/// The name and JSON-encoded arguments of a requested function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl std::fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

/// Describes a function the model is allowed to call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl FunctionInfo {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        name: S1,
        description: S2,
        parameters: Option<serde_json::Value>,
    ) -> Self {
        FunctionInfo {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool offered to the model. Only function tools exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionInfo,
}

impl From<FunctionInfo> for Tool {
    fn from(function: FunctionInfo) -> Self {
        Tool {
            kind: function_type(),
            function,
        }
    }
}

/// Controls whether and which tool the model must call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    /// Forces a call to the named function.
    Function(String),
}

impl Serialize for ToolChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ToolChoice::Auto => serializer.serialize_str("auto"),
            ToolChoice::None => serializer.serialize_str("none"),
            ToolChoice::Required => serializer.serialize_str("required"),
            ToolChoice::Function(name) => json!({
                "type": "function",
                "function": { "name": name },
            })
            .serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: usize,
    pub message: ChatMessage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionsResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
}

impl CompletionsResponse {
    /// The message of the first candidate, if any were returned.
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

fn function_type() -> String {
    "function".into()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
