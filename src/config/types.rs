//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::segmentation::SegmentationConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 分章配置
    #[serde(default)]
    pub segmentation: SegmentationSettings,

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
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/chapterize.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 原稿文件存储目录
    #[serde(default = "default_manuscripts_dir")]
    pub manuscripts_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 100MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_manuscripts_dir() -> PathBuf {
    PathBuf::from("data/manuscripts")
}

fn default_max_upload_size() -> u64 {
    100 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            manuscripts_dir: default_manuscripts_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 分章配置
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationSettings {
    /// 单章非空白字符上限
    #[serde(default = "default_max_chars_per_chapter")]
    pub max_chars_per_chapter: usize,

    /// 预览行数
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,

    /// 相邻标题最小字节距离
    #[serde(default = "default_min_heading_gap")]
    pub min_heading_gap: usize,

    /// 标题行最大字符数
    #[serde(default = "default_max_heading_chars")]
    pub max_heading_chars: usize,

    /// 自动模式是否生成序章
    #[serde(default = "default_auto_prologue")]
    pub auto_prologue: bool,
}

fn default_max_chars_per_chapter() -> usize {
    5000
}

fn default_preview_lines() -> usize {
    260
}

fn default_min_heading_gap() -> usize {
    5
}

fn default_max_heading_chars() -> usize {
    140
}

fn default_auto_prologue() -> bool {
    true
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            max_chars_per_chapter: default_max_chars_per_chapter(),
            preview_lines: default_preview_lines(),
            min_heading_gap: default_min_heading_gap(),
            max_heading_chars: default_max_heading_chars(),
            auto_prologue: default_auto_prologue(),
        }
    }
}

impl SegmentationSettings {
    /// 分章引擎参数
    pub fn engine_config(&self) -> SegmentationConfig {
        SegmentationConfig {
            max_chars_per_chapter: self.max_chars_per_chapter,
            min_heading_gap: self.min_heading_gap,
            max_heading_chars: self.max_heading_chars,
            auto_prologue: self.auto_prologue,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
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
