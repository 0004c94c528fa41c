use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheSettings, DEFAULT_CACHE_TTL, DEFAULT_MAX_CACHE_SIZE_MB};
use crate::errors::{GeominderError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "geominder.toml";

/// 环境变量前缀，例如 GEOMINDER__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "GEOMINDER";

/// Default for the `Access-Control-Allow-Origin` header.
pub const DEFAULT_ORIGIN_POLICY: &str = "*";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - database: MaxMind 数据库路径
/// - cache: 响应缓存
/// - cors: `Access-Control-Allow-Origin` 策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// `path` 为 None 时读取 geominder.toml（可选，不存在则忽略）；
    /// 显式指定的文件必须存在。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GeominderError::config(format!("failed to build config: {}", e)))?;

        let config = settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| GeominderError::config(format!("failed to deserialize config: {}", e)))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// Reject values the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GeominderError::config("server.port must be non-zero"));
        }
        if self.database.path.trim().is_empty() {
            return Err(GeominderError::config("database.path must not be empty"));
        }
        if self.cache.enabled && self.cache.max_size_mb == 0 {
            return Err(GeominderError::config(
                "cache.max_size_mb must be positive when the cache is enabled",
            ));
        }
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(GeominderError::config(
                "cache.ttl_secs must be positive when the cache is enabled",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GeominderError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// MaxMind DB 文件路径，需要 City 精度 (GeoLite2-City.mmdb)
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// 响应缓存配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_max_size_mb")]
    pub max_size_mb: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn to_settings(&self) -> CacheSettings {
        CacheSettings {
            enabled: self.enabled,
            max_size_mb: self.max_size_mb,
            ttl: Duration::from_secs(self.ttl_secs),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorsConfig {
    /// `Access-Control-Allow-Origin` 的值，空字符串表示不发送该头
    #[serde(default = "default_origin_policy")]
    pub origin_policy: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_path() -> String {
    "GeoLite2-City.mmdb".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_size_mb() -> u64 {
    DEFAULT_MAX_CACHE_SIZE_MB
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

fn default_origin_policy() -> String {
    DEFAULT_ORIGIN_POLICY.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_size_mb: default_cache_max_size_mb(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin_policy: default_origin_policy(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
