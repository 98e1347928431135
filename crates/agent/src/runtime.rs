//! The Tool-Orchestration Agent: a two-round protocol between the user's
//! query, the Analytics Functions, and the completion service.

use std::sync::Arc;

use astra_gateway::{GatewayError, WorkboardGateway};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{ChatMessage, CompletionClient, CompletionError, Decision, ToolCallRequest};
use crate::tools::{DealsAnalysis, ToolRegistry, WorkOrderAnalysis};
use crate::trace::ExecutionTrace;

/// Persona and output-structure instruction sent as the system turn. The
/// 5-section template is enforced here, by instruction; the runtime does
/// not validate or repair the shape of the service's answer.
pub const SYSTEM_INSTRUCTION: &str =
    "You are AstraBI, an elite Autonomous Business Intelligence Protocol. Your persona is \
     strictly professional, executive-level, and precise. CRITICAL: Do NOT use emojis. \
     Maintain a formal, high-integrity tone at all times. For analytical queries requiring \
     data tools, you MUST format your response into five sections: \
     1. **Data Summary**\n2. **Business Insight**\n3. **Strategic Recommendation**\n\
     4. **Data Caveats**\n5. **Recommended Questions**\n\
     For non-analytical queries or greetings (e.g., 'Hi', 'Who are you?'), respond \
     professionally and direct the user toward data-driven analysis without forcing the \
     5-section structure. Always offer assistance in a formal, respectful manner. In \
     section 5 of analytical reports, provide 3 brief, high-value follow-up questions. \
     Use Markdown Tables for any data lists or tabular requests.";

/// What one `chat()` call hands back to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatOutcome {
    pub response: String,
    pub trace: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("analytics task failed to complete: {0}")]
    ToolJoin(String),
}

impl AgentError {
    /// Degraded, user-visible wording. Raw transport errors stay in the
    /// trace and the logs; the conversation only ever sees these strings.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Completion(_) => {
                "Protocol exception: the completion service could not be reached. \
                 Please retry your query shortly."
            }
            Self::Gateway(_) => {
                "Protocol exception: live board data could not be retrieved. \
                 Please retry your query shortly."
            }
            Self::ToolJoin(_) => {
                "Protocol exception: an analytics task did not complete. \
                 Please retry your query shortly."
            }
        }
    }
}

pub struct ChatAgent {
    completion: Arc<dyn CompletionClient>,
    tools: ToolRegistry,
}

impl ChatAgent {
    pub fn new(completion: Arc<dyn CompletionClient>, tools: ToolRegistry) -> Self {
        Self { completion, tools }
    }

    /// Standard wiring: the two board-analytics functions over one gateway.
    pub fn with_gateway(
        completion: Arc<dyn CompletionClient>,
        gateway: Arc<dyn WorkboardGateway>,
    ) -> Self {
        let mut tools = ToolRegistry::default();
        tools.register(DealsAnalysis::new(gateway.clone()));
        tools.register(WorkOrderAnalysis::new(gateway));
        Self::new(completion, tools)
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.names()
    }

    /// One conversational turn with a fresh reasoning sequence and trace.
    pub async fn chat(&self, query: &str) -> ChatOutcome {
        self.chat_with_history(&[], query).await
    }

    /// Like [`chat`](Self::chat), with prior display turns supplied by the
    /// presentation layer inserted between the system instruction and the
    /// current query. The turns are not retained after the call.
    pub async fn chat_with_history(&self, history: &[ChatMessage], query: &str) -> ChatOutcome {
        let mut trace = ExecutionTrace::new();
        trace.push(format!("Intent detected: {query}"));

        match self.run_protocol(history, query, &mut trace).await {
            Ok(response) => ChatOutcome { response, trace: trace.into_entries() },
            Err(error) => {
                warn!(error = %error, "chat turn degraded to a protocol exception");
                trace.push(format!("Error: {error}"));
                ChatOutcome {
                    response: error.user_message().to_string(),
                    trace: trace.into_entries(),
                }
            }
        }
    }

    async fn run_protocol(
        &self,
        history: &[ChatMessage],
        query: &str,
        trace: &mut ExecutionTrace,
    ) -> Result<String, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_INSTRUCTION));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(query));

        let declarations = self.tools.declarations();
        let first = self.completion.complete(&messages, &declarations).await?;

        let requests = match Decision::from_message(&first) {
            Decision::PlainText(text) => return Ok(text),
            Decision::ToolRequests(requests) => requests,
        };

        info!(requested_tools = requests.len(), "executing tool invocations");
        messages.push(first);
        self.execute_tools(&requests, &mut messages, trace).await?;

        // Final round: no declarations, forcing a terminal answer.
        let last = self.completion.complete(&messages, &[]).await?;
        match Decision::from_message(&last) {
            Decision::PlainText(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AgentError::Completion(CompletionError::MalformedResponse(
                "final round returned no answer text".to_string(),
            ))),
        }
    }

    /// Invocations within one decision round are independent, so they run
    /// concurrently; results are joined and appended in request order so
    /// the service can correlate each tool turn by invocation id.
    async fn execute_tools(
        &self,
        requests: &[ToolCallRequest],
        messages: &mut Vec<ChatMessage>,
        trace: &mut ExecutionTrace,
    ) -> Result<(), AgentError> {
        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            // Unknown tool names are skipped, by contract: no invocation,
            // no trace entry, no error.
            let Some(tool) = self.tools.get(request.name()) else {
                continue;
            };

            let call_id = request.id.clone();
            let name = request.name().to_string();
            handles.push(tokio::spawn(async move {
                let mut segment = ExecutionTrace::new();
                let result = tool.run(&mut segment).await;
                (call_id, name, segment, result)
            }));
        }

        for handle in handles {
            let (call_id, name, segment, result) =
                handle.await.map_err(|error| AgentError::ToolJoin(error.to_string()))?;
            trace.extend(segment);
            let payload = result?;
            messages.push(ChatMessage::tool_result(call_id, name, payload.to_string()));
        }

        Ok(())
    }
}
