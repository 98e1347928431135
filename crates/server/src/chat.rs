//! Chat endpoint: the single `chat(query) -> {response, trace}` contract the
//! browser UI calls.
//!
//! The handler never fails a well-formed request: agent-level failures are
//! already folded into a degraded response string, so the UI always gets a
//! renderable payload.

use std::sync::Arc;

use astra_agent::ChatAgent;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    agent: Arc<ChatAgent>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub trace: Vec<String>,
}

pub fn router(agent: Arc<ChatAgent>) -> Router {
    // The presentation layer is a browser app served from elsewhere.
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/v1/chat", post(chat))
        .layer(cors)
        .with_state(ChatState { agent })
}

pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    info!(
        event_name = "ingress.chat.query_received",
        correlation_id = %correlation_id,
        query_chars = request.query.len(),
        "received chat query"
    );

    let outcome = state.agent.chat(&request.query).await;

    info!(
        event_name = "ingress.chat.response_ready",
        correlation_id = %correlation_id,
        trace_entries = outcome.trace.len(),
        "chat response ready"
    );

    Json(ChatResponse { response: outcome.response, trace: outcome.trace })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use astra_agent::{ChatAgent, ChatMessage, CompletionClient, CompletionError, ToolDeclaration};
    use astra_gateway::testing::StaticGateway;
    use astra_gateway::WorkboardGateway;
    use async_trait::async_trait;
    use axum::extract::State;
    use axum::Json;

    use super::{chat, ChatRequest, ChatState};

    struct CannedCompletion {
        reply: String,
    }

    #[async_trait]
    impl CompletionClient for CannedCompletion {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDeclaration],
        ) -> Result<ChatMessage, CompletionError> {
            Ok(ChatMessage::assistant(self.reply.clone()))
        }
    }

    #[tokio::test]
    async fn chat_handler_returns_response_and_trace() {
        let completion = Arc::new(CannedCompletion { reply: "Good afternoon.".to_string() });
        let gateway: Arc<dyn WorkboardGateway> = Arc::new(StaticGateway::default());
        let agent = Arc::new(ChatAgent::with_gateway(completion, gateway));

        let Json(payload) = chat(
            State(ChatState { agent }),
            Json(ChatRequest { query: "Hi, who are you?".to_string() }),
        )
        .await;

        assert_eq!(payload.response, "Good afternoon.");
        assert_eq!(payload.trace, vec!["Intent detected: Hi, who are you?".to_string()]);
    }
}
