use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, RetryPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// Browser origins allowed by CORS; requests without an Origin header always pass
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which model endpoint to call
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl AiProviderKind {
    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub request_timeout_secs: Option<u64>,
    pub deadline_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: Environment::default(),
            allowed_origins: vec![
                "https://prep-pilot-sssb.vercel.app".to_string(),
                "https://prep-pilot-six.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();

        Self {
            provider: AiProviderKind::default(),
            model: "gemini-2.0-flash-lite".to_string(),
            base_url: None,
            api_key: None,
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay_ms,
            max_delay_ms: policy.max_delay_ms,
            request_timeout_secs: None,
            deadline_secs: None,
        }
    }
}

impl AiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_attempts.max(1))
            .with_base_delay(self.base_delay_ms)
            .with_max_delay(self.max_delay_ms);

        match self.deadline_secs {
            Some(secs) => policy.with_deadline(Duration::from_secs(secs)),
            None => policy,
        }
    }

    /// Configured key, falling back to the provider's environment variable
    pub fn resolve_api_key(&self) -> Result<String, DomainError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_api_key`](Self::resolve_api_key) with an explicit env lookup
    pub fn resolve_api_key_with(
        &self,
        env: impl FnOnce(&str) -> Option<String>,
    ) -> Result<String, DomainError> {
        let non_blank = |key: &String| !key.trim().is_empty();

        self.api_key
            .clone()
            .filter(non_blank)
            .or_else(|| env(self.provider.api_key_env()).filter(non_blank))
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "{} environment variable is required (or set ai.api_key)",
                    self.provider.api_key_env()
                ))
            })
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, `APP__*` variables and `PORT`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None, std::env::var("PORT").ok())
    }

    /// Load with an explicit variable map in place of the process environment
    pub fn load_from(
        env_vars: Option<config::Map<String, String>>,
        port: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .source(env_vars),
            )
            .set_override_option(
                "server.port",
                port.and_then(|p| p.trim().parse::<i64>().ok()),
            )?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ai.provider, AiProviderKind::Gemini);
        assert_eq!(config.ai.model, "gemini-2.0-flash-lite");
        assert_eq!(config.ai.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let ai = AiConfig {
            max_attempts: 0,
            base_delay_ms: 50,
            max_delay_ms: 400,
            deadline_secs: Some(15),
            ..Default::default()
        };

        let policy = ai.retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay_ms, 50);
        assert_eq!(policy.max_delay_ms, 400);
        assert_eq!(policy.deadline, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let ai = AiConfig {
            api_key: Some("configured".to_string()),
            ..Default::default()
        };

        assert_eq!(ai.resolve_api_key().unwrap(), "configured");
    }

    #[test]
    fn test_blank_api_key_falls_back_to_env() {
        let ai = AiConfig {
            provider: AiProviderKind::OpenAi,
            api_key: Some("  ".to_string()),
            ..Default::default()
        };

        let key = ai
            .resolve_api_key_with(|name| {
                assert_eq!(name, "OPENAI_API_KEY");
                Some("from-env".to_string())
            })
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let ai = AiConfig {
            provider: AiProviderKind::OpenAi,
            api_key: Some("  ".to_string()),
            ..Default::default()
        };

        let err = ai.resolve_api_key_with(|_| Some(" ".to_string())).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        assert!(ai.resolve_api_key_with(|_| None).is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_load_layers_env_over_files() {
        let config = AppConfig::load_from(
            vars(&[
                ("APP__SERVER__ALLOWED_ORIGINS", "https://a.example,https://b.example"),
                ("APP__SERVER__ENVIRONMENT", "production"),
                ("APP__AI__MAX_ATTEMPTS", "5"),
                ("APP__AI__PROVIDER", "openai"),
            ]),
            Some("7000".to_string()),
        )
        .unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.server.environment.is_production());
        assert_eq!(config.ai.max_attempts, 5);
        assert_eq!(config.ai.provider, AiProviderKind::OpenAi);
    }

    #[test]
    fn test_load_without_overrides_uses_defaults() {
        let config = AppConfig::load_from(vars(&[]), None).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ai.max_attempts, 3);
        assert!(config
            .server
            .allowed_origins
            .contains(&"https://prep-pilot-six.vercel.app".to_string()));
    }

    #[test]
    fn test_unparsable_port_is_ignored() {
        let config = AppConfig::load_from(
            vars(&[("APP__SERVER__PORT", "6000")]),
            Some("not-a-port".to_string()),
        )
        .unwrap();

        assert_eq!(config.server.port, 6000);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "environment": "production", "allowed_origins": ["https://app.example"] },
            "ai": { "provider": "openai", "model": "gpt-4o-mini" }
        }))
        .unwrap();

        assert!(config.server.environment.is_production());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.allowed_origins, vec!["https://app.example"]);
        assert_eq!(config.ai.provider, AiProviderKind::OpenAi);
        assert_eq!(config.ai.max_attempts, 3);
        assert_eq!(config.logging.level, "info");
    }
}
