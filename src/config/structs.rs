use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - admin: 管理 API 路由前缀、JWT、分页
/// - media: 附件存储目录与上传大小限制
/// - integrity: 数据完整性策略开关
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub integrity: IntegrityConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    /// ENV 前缀：CRM，分隔符：__
    /// 示例：CRM__SERVER__PORT=9000
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CRM")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

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
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// 管理 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    /// 为空时启动时生成随机密钥（重启后旧 token 失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

/// 附件存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// 数据完整性策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// primary_address / primary_email 必须属于对应集合
    #[serde(default)]
    pub enforce_primary_membership: bool,
    /// Contractor.parent / Contact.head 不允许成环
    #[serde(default = "default_enforce_acyclic_hierarchy")]
    pub enforce_acyclic_hierarchy: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://crmdesk.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
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

fn default_route_prefix() -> String {
    "/admin".to_string()
}

fn default_access_token_minutes() -> u64 {
    60
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    200
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_enforce_acyclic_hierarchy() -> bool {
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
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
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

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            enforce_primary_membership: false,
            enforce_acyclic_hierarchy: default_enforce_acyclic_hierarchy(),
        }
    }
}
