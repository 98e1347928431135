use std::sync::Arc;

use astra_agent::{ChatAgent, CompletionError, GroqClient};
use astra_core::config::{AppConfig, ConfigError, LoadOptions};
use astra_gateway::{GatewayError, MondayGateway, WorkboardGateway};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub agent: Arc<ChatAgent>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("gateway client initialization failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("completion client initialization failed: {0}")]
    Completion(#[from] CompletionError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let gateway: Arc<dyn WorkboardGateway> = Arc::new(MondayGateway::new(&config.gateway)?);
    let completion = Arc::new(GroqClient::new(&config.llm)?);
    let agent = Arc::new(ChatAgent::with_gateway(completion, gateway));

    info!(
        event_name = "system.bootstrap.ready",
        model = %config.llm.model,
        tools = agent.tool_names().len(),
        "agent runtime constructed"
    );

    Ok(Application { config, agent })
}

#[cfg(test)]
mod tests {
    use astra_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    #[tokio::test]
    async fn bootstrap_fails_fast_without_required_tokens() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("gsk-test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("gateway.api_token"));
    }

    #[tokio::test]
    async fn bootstrap_registers_both_analytics_tools() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                gateway_api_token: Some("board-token".to_string()),
                llm_api_key: Some("gsk-test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with valid overrides");

        assert_eq!(app.agent.tool_names(), ["analyze_deals", "analyze_work_orders"]);
    }
}
