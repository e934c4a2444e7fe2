//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StorageBackend, KNOWN_PROVIDERS};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `STORYLOOM_SERVER__PORT=8080`
/// - `STORYLOOM_DATABASE__BACKEND=memory`
/// - `STORYLOOM_LLM__DEFAULT_PROVIDER=openai`
/// - `STORYLOOM_LLM__OPENAI__API_KEY=sk-...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.path", "data/storyloom.db")?
        .set_default("database.max_connections", 5)?
        .set_default("llm.default_provider", "ollama")?
        .set_default("llm.timeout_secs", 120)?
        .set_default("llm.temperature", 0.8)?
        .set_default("llm.openai.base_url", "https://api.openai.com")?
        .set_default("llm.openai.model", "gpt-4o-mini")?
        .set_default(
            "llm.gemini.base_url",
            "https://generativelanguage.googleapis.com",
        )?
        .set_default("llm.gemini.model", "gemini-1.5-flash")?
        .set_default("llm.ollama.base_url", "http://localhost:11434")?
        .set_default("llm.ollama.model", "llama3.1")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: STORYLOOM_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("STORYLOOM")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.backend == StorageBackend::Sqlite {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Database path cannot be empty".to_string(),
            ));
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "Database max_connections cannot be 0".to_string(),
            ));
        }
    }

    let llm = &config.llm;
    if !KNOWN_PROVIDERS.contains(&llm.default_provider.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "Unknown default LLM provider '{}', expected one of {:?}",
            llm.default_provider, KNOWN_PROVIDERS
        )));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "LLM temperature {} out of range 0.0..=2.0",
            llm.temperature
        )));
    }

    if llm.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "LLM timeout cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// API Key 只输出是否已配置
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Storage Backend: {}", config.database.backend.as_str());
    if config.database.backend == StorageBackend::Sqlite {
        tracing::info!("Database: {}", config.database.path);
        tracing::info!("Database Max Connections: {}", config.database.max_connections);
    }
    tracing::info!("LLM Default Provider: {}", config.llm.default_provider);
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    for (name, provider) in [
        ("openai", &config.llm.openai),
        ("gemini", &config.llm.gemini),
        ("ollama", &config.llm.ollama),
    ] {
        tracing::info!(
            provider = name,
            base_url = %provider.base_url,
            model = %provider.model,
            api_key = provider.api_key().is_some(),
            "LLM provider"
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());

        config.database.backend = StorageBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.default_provider = "claude-local".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_error_for_temperature() {
        let mut config = AppConfig::default();
        config.llm.temperature = 2.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[database]
backend = "memory"

[llm]
default_provider = "gemini"

[llm.gemini]
base_url = "http://127.0.0.1:9000"
model = "gemini-test"
api_key = "g-key"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.llm.default_provider, "gemini");
        assert_eq!(config.llm.gemini.model, "gemini-test");
        assert_eq!(config.llm.gemini.api_key(), Some("g-key"));
        // 未写入文件的部分保持默认值
        assert_eq!(config.llm.ollama.model, "llama3.1");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[database]\nbackend = \"postgres\"").unwrap();

        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ParseError(_))
        ));
    }
}
