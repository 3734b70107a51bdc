//! Application configuration

mod app_config;

pub use app_config::{
    AiConfig, AiProviderKind, AppConfig, Environment, LogFormat, LoggingConfig, ServerConfig,
};
