//! Completion-service wire types and the [`CompletionClient`] seam.
//!
//! The message shapes follow the de-facto chat-completion format: a role,
//! optional text content, optional tool calls on assistant turns, and a
//! `tool_call_id` linking each tool-result turn back to the invocation it
//! answers. Astra's tools are parameterless, so declarations carry only a
//! name and a description.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of the conversation sent to or received from the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(ChatRole::Assistant, content)
    }

    /// Tool-result turn answering the invocation identified by `call_id`.
    pub fn tool_result(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
            name: Some(name.into()),
        }
    }

    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }
}

/// One requested function invocation inside an assistant turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ToolCallRequest {
    pub fn function(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "function".to_string(),
            function: FunctionRef { name: name.into(), arguments: None },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// A named, parameterless capability advertised to the completion service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    kind: &'static str,
    function: DeclaredFunction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct DeclaredFunction {
    name: String,
    description: String,
}

impl ToolDeclaration {
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: "function",
            function: DeclaredFunction { name: name.into(), description: description.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// The service's decision for one round: a terminal natural-language answer
/// or an ordered list of tool invocations to execute first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    PlainText(String),
    ToolRequests(Vec<ToolCallRequest>),
}

impl Decision {
    pub fn from_message(message: &ChatMessage) -> Self {
        if message.tool_calls.is_empty() {
            Self::PlainText(message.content.clone().unwrap_or_default())
        } else {
            Self::ToolRequests(message.tool_calls.clone())
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response was malformed: {0}")]
    MalformedResponse(String),
}

/// Seam for the external completion service. `tools` may be empty, which
/// forces a terminal natural-language answer on that round.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ChatMessage, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRole, Decision, ToolCallRequest, ToolDeclaration};

    #[test]
    fn assistant_text_turn_is_a_plain_text_decision() {
        let message = ChatMessage::assistant("Good afternoon.");
        assert_eq!(
            Decision::from_message(&message),
            Decision::PlainText("Good afternoon.".to_string())
        );
    }

    #[test]
    fn tool_calls_take_precedence_over_content() {
        let mut message = ChatMessage::assistant("");
        message.tool_calls = vec![ToolCallRequest::function("call_1", "analyze_deals")];

        let Decision::ToolRequests(requests) = Decision::from_message(&message) else {
            panic!("expected a tool-request decision");
        };
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "analyze_deals");
        assert_eq!(requests[0].id, "call_1");
    }

    #[test]
    fn declarations_serialize_to_the_function_wire_shape() {
        let declaration = ToolDeclaration::function("analyze_deals", "Analyze the Deals board.");
        let wire = serde_json::to_value(&declaration).expect("declaration should serialize");

        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "analyze_deals");
        assert_eq!(wire["function"]["description"], "Analyze the Deals board.");
        assert!(wire["function"].get("parameters").is_none());
    }

    #[test]
    fn assistant_turn_with_tool_calls_parses_from_wire_json() {
        let raw = r#"{
            "role": "assistant",
            "content": null,
            "tool_calls": [
                {
                    "id": "call_abc",
                    "type": "function",
                    "function": { "name": "analyze_work_orders", "arguments": "{}" }
                }
            ]
        }"#;

        let message: ChatMessage = serde_json::from_str(raw).expect("message should parse");
        assert_eq!(message.role, ChatRole::Assistant);
        assert_eq!(message.content, None);
        assert_eq!(message.tool_calls[0].name(), "analyze_work_orders");
    }

    #[test]
    fn tool_result_turns_skip_empty_fields_when_serialized() {
        let message = ChatMessage::tool_result("call_1", "analyze_deals", "{\"totalDeals\":0}");
        let wire = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(wire["role"], "tool");
        assert_eq!(wire["tool_call_id"], "call_1");
        assert_eq!(wire["name"], "analyze_deals");
        assert!(wire.get("tool_calls").is_none());
    }
}
