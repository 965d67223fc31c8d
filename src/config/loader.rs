//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

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

/// 环境变量前缀
const ENV_PREFIX: &str = "CHAPTERIZE";

/// 加载应用配置
///
/// # 环境变量示例
/// - `CHAPTERIZE_SERVER__PORT=8080`
/// - `CHAPTERIZE_DATABASE__PATH=/data/chapterize.db`
/// - `CHAPTERIZE_SEGMENTATION__MAX_CHARS_PER_CHAPTER=8000`
/// - `CHAPTERIZE_LOG__JSON=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索工作目录下的 config.toml 与 config.local.toml
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("database.path", "data/chapterize.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.manuscripts_dir", "data/manuscripts")?
        .set_default("storage.max_upload_size", 100 * 1024 * 1024)?
        .set_default("segmentation.max_chars_per_chapter", 5000)?
        .set_default("segmentation.preview_lines", 260)?
        .set_default("segmentation.min_heading_gap", 5)?
        .set_default("segmentation.max_heading_chars", 140)?
        .set_default("segmentation.auto_prologue", true)?
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

    // 3. 环境变量（最高优先级），层级分隔符为双下划线
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
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

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.segmentation.max_chars_per_chapter == 0 {
        return Err(ConfigError::ValidationError(
            "Chapter character budget cannot be 0".to_string(),
        ));
    }

    if config.segmentation.preview_lines == 0 {
        return Err(ConfigError::ValidationError(
            "Preview line count cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Manuscripts Directory: {:?}", config.storage.manuscripts_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!(
        "Chapter Budget: {} chars, Preview: {} lines",
        config.segmentation.max_chars_per_chapter,
        config.segmentation.preview_lines
    );
    tracing::info!(
        "Heading Detection: gap >= {} bytes, length <= {} chars, prologue = {}",
        config.segmentation.min_heading_gap,
        config.segmentation.max_heading_chars,
        config.segmentation.auto_prologue
    );
    tracing::info!("Log Level: {} (json = {})", config.log.level, config.log.json);
    tracing::info!("=================================");
}
