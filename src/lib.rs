//! Storyloom - 分步式小说企划服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Structure Context: 章节结构划分（起承転結 / 三幕构成）与字数估算
//! - Project Context: 企划标题、类型与六个写作步骤
//!
//! 应用层 (application/):
//! - Ports: 端口定义（StoryRepository, LlmProvider）
//! - Commands: CQRS 命令处理器（含调用大模型的生成命令）
//! - Queries: CQRS 查询处理器
//! - Prompts: 提示词模板与模型输出解析
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Persistence: SQLite + 内存存储
//! - Adapters: OpenAI / Gemini / Ollama 客户端
//! - Events: 资源变更事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
