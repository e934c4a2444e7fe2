//! Storyloom - 分步式小说企划服务
//!
//! 启动流程：加载配置 → 初始化日志 → 选择存储后端 → 注册大模型提供方 → 启动 HTTP 服务

use std::path::Path;
use std::sync::Arc;

use storyloom::application::StoryRepositoryPort;
use storyloom::config::{load_config, print_config, AppConfig, StorageBackend};
use storyloom::infrastructure::adapters::build_registry;
use storyloom::infrastructure::events::EventPublisher;
use storyloom::infrastructure::http::{AppState, HttpServer, ServerConfig};
use storyloom::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig,
};
use storyloom::infrastructure::persistence::{InMemoryStoryRepository, SqliteStoryRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Storyloom - 分步式小说企划服务");
    print_config(&config);

    let repo = create_repository(&config).await?;

    let llm = Arc::new(build_registry(&config.llm)?);
    tracing::info!(providers = ?llm.names(), "LLM providers registered");

    let event_publisher = Arc::new(EventPublisher::new());

    let state = AppState::new(repo, llm, event_publisher)
        .with_storage(config.database.backend.as_str());

    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    let static_files = &config.server.static_files;
    if static_files.enabled {
        server_config =
            server_config.with_static_files(static_files.dir.clone(), static_files.path.clone());
    }

    HttpServer::new(server_config, state)
        .run_with_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storyloom={},tower_http=debug,sqlx=warn",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn create_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn StoryRepositoryPort>> {
    match config.database.backend {
        StorageBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let db_config = DatabaseConfig::new(&config.database.path)
                .with_max_connections(config.database.max_connections);
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(SqliteStoryRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data will be lost on shutdown");
            Ok(Arc::new(InMemoryStoryRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
