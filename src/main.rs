//! Chapterize - 小说分章服务
//!
//! - Domain: manuscript, novel, segmentation, toc_session
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, adapters

use std::sync::Arc;

use chapterize::config::{load_config, print_config, LogConfig};
use chapterize::infrastructure::adapters::storage::FileManuscriptStorage;
use chapterize::infrastructure::http::{AppState, HttpServer, ServerConfig};
use chapterize::infrastructure::memory::InMemoryTocSessionStore;
use chapterize::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteNovelRepository,
};

/// 初始化日志：RUST_LOG 优先，否则按配置的级别
fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},chapterize={},tower_http=debug",
        log.level, log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Chapterize - 小说分章服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建端口适配器
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool));
    let storage = Arc::new(
        FileManuscriptStorage::new(&config.storage.manuscripts_dir, config.storage.max_upload_size)
            .await?,
    );
    let toc_sessions = Arc::new(InMemoryTocSessionStore::new());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size,
    );
    let state = AppState::new(
        novel_repo,
        storage,
        toc_sessions,
        config.segmentation.engine_config(),
        config.segmentation.preview_lines,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
