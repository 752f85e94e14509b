//! 分层设置加载器实现

use infrastructure_common::{ConfigError, ConfigResult, Settings};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, error};

/// 默认配置文件（不含扩展名）
pub const DEFAULT_SETTINGS_FILE: &str = "config/registry";

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "REGISTRY";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 分层设置加载器
///
/// 加载顺序（后者覆盖前者）：内置默认值、默认配置文件、附加文件、环境变量。
/// 环境变量形如 `REGISTRY_REGISTRY__SAFE=false`。
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// 默认配置文件，`None` 表示不加载
    default_file: Option<String>,
    /// 附加配置文件
    files: Vec<PathBuf>,
    /// 环境变量前缀，`None` 表示不读取环境变量
    env_prefix: Option<String>,
}

impl SettingsLoader {
    /// 创建新的设置加载器
    pub fn new() -> Self {
        Self {
            default_file: Some(DEFAULT_SETTINGS_FILE.to_string()),
            files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// 不加载默认配置文件
    pub fn without_default_file(mut self) -> Self {
        self.default_file = None;
        self
    }

    /// 添加必须存在的配置文件，格式由扩展名决定
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 不读取环境变量
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// 构建合并后的配置
    fn build(&self) -> ConfigResult<config::Config> {
        let defaults = config::Config::try_from(&Settings::default()).map_err(|e| {
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(default_file) = &self.default_file {
            builder = builder.add_source(config::File::with_name(default_file).required(false));
        }

        for path in &self.files {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("添加配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        builder.build().map_err(|e| {
            error!("配置构建失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })
    }

    /// 加载完整设置
    pub fn load(&self) -> ConfigResult<Settings> {
        let settings: Settings = self.build()?.try_deserialize().map_err(|e| {
            error!("设置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        debug!(?settings, "设置加载完成");
        Ok(settings)
    }

    /// 按点分路径读取单个设置值，例如 `registry.safe`
    pub fn get<T>(&self, path: &str) -> ConfigResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.build()?.get::<T>(path) {
            Ok(value) => Ok(value),
            Err(config::ConfigError::NotFound(_)) => Err(ConfigError::KeyNotFound {
                key: path.to_string(),
            }),
            Err(e) => Err(ConfigError::ParseError {
                source: Box::new(e),
            }),
        }
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
