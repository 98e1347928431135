use std::sync::Arc;

use astra_agent::{ChatAgent, GroqClient};
use astra_core::config::{AppConfig, LoadOptions};
use astra_gateway::{MondayGateway, WorkboardGateway};

use super::CommandResult;

/// One-shot conversational turn from the terminal, against live services.
pub fn run(query: &str, show_trace: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: 2,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let gateway: Arc<dyn WorkboardGateway> = match MondayGateway::new(&config.gateway) {
        Ok(gateway) => Arc::new(gateway),
        Err(error) => {
            return CommandResult {
                exit_code: 1,
                output: format!("gateway client initialization failed: {error}"),
            }
        }
    };

    let completion = match GroqClient::new(&config.llm) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            return CommandResult {
                exit_code: 1,
                output: format!("completion client initialization failed: {error}"),
            }
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult { exit_code: 1, output: format!("runtime start failed: {error}") }
        }
    };

    let agent = ChatAgent::with_gateway(completion, gateway);
    let outcome = runtime.block_on(agent.chat(query));

    let mut output = outcome.response;
    if show_trace {
        output.push_str("\n\ntrace:");
        for entry in &outcome.trace {
            output.push_str("\n- ");
            output.push_str(entry);
        }
    }

    CommandResult { exit_code: 0, output }
}
