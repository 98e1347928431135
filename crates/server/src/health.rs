use std::sync::Arc;

use astra_agent::ChatAgent;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    agent: Arc<ChatAgent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub tools: HealthCheck,
    pub checked_at: String,
}

pub fn router(agent: Arc<ChatAgent>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { agent })
}

/// Readiness of the process itself. External collaborators are not probed
/// here: a health poll must never spend work-management or completion quota.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let tool_names = state.agent.tool_names();
    let ready = !tool_names.is_empty();

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "astra-server runtime initialized".to_string(),
        },
        tools: HealthCheck {
            status: if ready { "ready" } else { "degraded" },
            detail: format!("analytics functions registered: {}", tool_names.join(", ")),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use astra_agent::{
        ChatAgent, ChatMessage, CompletionClient, CompletionError, ToolDeclaration, ToolRegistry,
    };
    use astra_gateway::testing::StaticGateway;
    use astra_gateway::WorkboardGateway;
    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;

    use super::{health, HealthState};

    struct SilentCompletion;

    #[async_trait]
    impl CompletionClient for SilentCompletion {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDeclaration],
        ) -> Result<ChatMessage, CompletionError> {
            Ok(ChatMessage::assistant(""))
        }
    }

    #[tokio::test]
    async fn health_reports_ready_with_registered_tools() {
        let gateway: Arc<dyn WorkboardGateway> = Arc::new(StaticGateway::default());
        let agent = Arc::new(ChatAgent::with_gateway(Arc::new(SilentCompletion), gateway));

        let (status, axum::Json(payload)) = health(State(HealthState { agent })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert!(payload.tools.detail.contains("analyze_deals"));
        assert!(payload.tools.detail.contains("analyze_work_orders"));
    }

    #[tokio::test]
    async fn health_degrades_without_any_tools() {
        let agent =
            Arc::new(ChatAgent::new(Arc::new(SilentCompletion), ToolRegistry::default()));

        let (status, axum::Json(payload)) = health(State(HealthState { agent })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.tools.status, "degraded");
    }
}
