//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 存储配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 大模型配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 前端构建产物托管
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web/dist")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite 文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/storyloom.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 大模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// 未指定 provider 时使用的提供方
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// 采样温度，0.0 ~ 2.0
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "ProviderConfig::openai")]
    pub openai: ProviderConfig,

    #[serde(default = "ProviderConfig::gemini")]
    pub gemini: ProviderConfig,

    #[serde(default = "ProviderConfig::ollama")]
    pub ollama: ProviderConfig,
}

/// 已知的提供方名称
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "gemini", "ollama"];

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.8
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            timeout_secs: default_llm_timeout(),
            temperature: default_temperature(),
            openai: ProviderConfig::openai(),
            gemini: ProviderConfig::gemini(),
            ollama: ProviderConfig::ollama(),
        }
    }
}

/// 单个提供方的连接配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    pub fn openai() -> Self {
        Self::new("https://api.openai.com", "gpt-4o-mini")
    }

    pub fn gemini() -> Self {
        Self::new("https://generativelanguage.googleapis.com", "gemini-1.5-flash")
    }

    pub fn ollama() -> Self {
        Self::new("http://localhost:11434", "llama3.1")
    }

    /// 非空的 API Key
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别，可被 RUST_LOG 覆盖
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5060);
        assert_eq!(config.database.backend, StorageBackend::Sqlite);
        assert_eq!(config.database.path, "data/storyloom.db");
        assert_eq!(config.llm.default_provider, "ollama");
        assert_eq!(config.llm.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5060");
        assert_eq!(config.public_base_url(), "http://localhost:5060");
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let mut provider = ProviderConfig::openai();
        assert_eq!(provider.api_key(), None);

        provider.api_key = Some("   ".to_string());
        assert_eq!(provider.api_key(), None);

        provider.api_key = Some(" sk-test ".to_string());
        assert_eq!(provider.api_key(), Some("sk-test"));
    }
}
