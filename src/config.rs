use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件查找路径
const CONFIG_PATHS: [&str; 2] = ["product-console.toml", "./config/product-console.toml"];

/// 客户端配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ProductFunction 接口配置
    pub api: ApiConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// ProductFunction 接口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 服务根地址
    pub base_url: String,
    /// 接口路径
    pub endpoint: String,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 是否启用控制台输出
    pub console_output: bool,
    /// 日志文件目录，不设置则不写文件
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7071".to_string(),
            endpoint: "/api/ProductFunction".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            log_dir: None,
            file_prefix: "product-console".to_string(),
        }
    }
}

impl ApiConfig {
    /// 拼接出完整的接口地址
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Validation(format!("无效的 base_url {}: {}", self.base_url, e)))?;
        base.join(&self.endpoint)
            .map_err(|e| ConfigError::Validation(format!("无效的 endpoint {}: {}", self.endpoint, e)))
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        // 确保目录存在
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// 用环境变量覆盖配置，`lookup` 通常是 `std::env::var`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("PRODUCT_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Some(endpoint) = lookup("PRODUCT_API_ENDPOINT") {
            self.api.endpoint = endpoint;
        }
        if let Some(level) = lookup("PRODUCT_CONSOLE_LOG") {
            self.logging.level = level.to_ascii_lowercase();
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url 不能为空".to_string()));
        }
        if self.api.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation("endpoint 不能为空".to_string()));
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation("超时时间必须大于0".to_string()));
        }
        self.api.endpoint_url()?;

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 查找配置文件：优先使用显式指定的路径
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// 从文件或默认值加载配置
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match locate_config_file(explicit) {
        Some(path) => Config::load_from_file(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:7071");
        assert_eq!(config.api.endpoint, "/api/ProductFunction");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url() {
        let config = Config::default();
        assert_eq!(
            config.api.endpoint_url().unwrap().as_str(),
            "http://localhost:7071/api/ProductFunction"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.endpoint = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("product-console.toml");

        let mut config = Config::default();
        config.api.base_url = "https://shop.example.net".to_string();
        config.logging.log_dir = Some(PathBuf::from("logs"));
        config.save_to_file(&config_path).unwrap();

        let loaded_config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("partial.toml");
        fs::write(&config_path, "[api]\nbase_url = \"http://127.0.0.1:9000\"\n").unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.endpoint, "/api/ProductFunction");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRODUCT_API_BASE_URL", "http://10.0.0.5:7071"),
            ("PRODUCT_CONSOLE_LOG", "DEBUG"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:7071");
        assert_eq!(config.api.endpoint, "/api/ProductFunction");
        assert_eq!(config.logging.level, "debug");
    }
}
