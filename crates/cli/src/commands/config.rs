use astra_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let lines = vec![
        "effective config (source precedence: overrides > env > file > default):".to_string(),
        render_line("gateway.api_token", &redact_token(config.gateway.api_token.expose_secret())),
        render_line("gateway.base_url", &config.gateway.base_url),
        render_line("gateway.api_version", &config.gateway.api_version),
        render_line("gateway.timeout_secs", &config.gateway.timeout_secs.to_string()),
        render_line("llm.api_key", &redact_token(config.llm.api_key.expose_secret())),
        render_line("llm.base_url", &config.llm.base_url),
        render_line("llm.model", &config.llm.model),
        render_line("llm.timeout_secs", &config.llm.timeout_secs.to_string()),
        render_line("llm.max_retries", &config.llm.max_retries.to_string()),
        render_line("server.bind_address", &config.server.bind_address),
        render_line("server.port", &config.server.port.to_string()),
        render_line("logging.level", &config.logging.level),
        render_line("logging.format", &format!("{:?}", config.logging.format).to_lowercase()),
    ];

    lines.join("\n")
}

fn render_line(key: &str, value: &str) -> String {
    format!("- {key} = {value}")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use super::redact_token;

    #[test]
    fn tokens_are_redacted_after_their_prefix() {
        assert_eq!(redact_token("gsk-abc123secret"), "gsk-***");
        assert_eq!(redact_token("opaque_token_value"), "<redacted>");
        assert_eq!(redact_token("  "), "<empty>");
    }
}
