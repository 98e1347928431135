//! Tool-orchestration runtime for the Astra business-intelligence assistant.
//!
//! One [`runtime::ChatAgent::chat`] call runs a two-round protocol against
//! the completion service:
//! 1. **Decision** - the query plus the declared Analytics Functions go to
//!    the service, which answers with plain text or an ordered list of tool
//!    invocations.
//! 2. **Final answer** - requested tools run against live board data, their
//!    results are appended as tool turns, and the service produces the
//!    terminal natural-language response.
//!
//! Every step appends to an [`trace::ExecutionTrace`] that is returned with
//! the answer. Failures never escape to the caller: transport problems fold
//! into a degraded, user-visible protocol-exception response.
//!
//! # Key types
//!
//! - `ChatAgent` - the orchestration loop (see `runtime`)
//! - `CompletionClient` - pluggable completion-service seam (see `llm`)
//! - `AnalyticsFunction` / `ToolRegistry` - callable capabilities (see `tools`)

pub mod groq;
pub mod llm;
pub mod runtime;
pub mod tools;
pub mod trace;

pub use groq::GroqClient;
pub use llm::{
    ChatMessage, ChatRole, CompletionClient, CompletionError, Decision, ToolCallRequest,
    ToolDeclaration,
};
pub use runtime::{AgentError, ChatAgent, ChatOutcome};
pub use tools::{AnalyticsFunction, DealsAnalysis, ToolRegistry, WorkOrderAnalysis};
pub use trace::ExecutionTrace;
