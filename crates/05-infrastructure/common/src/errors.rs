//! 错误类型定义

use thiserror::Error;

/// 组件注册表错误类型
///
/// `InvalidCapability` 与 `InvalidArgument` 属于调用方的编程错误；
/// `ComponentExists` 与 `ComponentDoesNotExist` 是可预期的冲突，
/// 调用方可以通过安全模式将其转换为布尔值或 `None` 返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("无效的能力类型: 期望能力描述符, 实际为 {found}")]
    InvalidCapability { found: String },

    #[error("无效的组件键参数: {message}")]
    InvalidArgument { message: String },

    #[error("组件已存在: {key}")]
    ComponentExists { key: String },

    #[error("组件不存在: {key}")]
    ComponentDoesNotExist { key: String },
}

impl RegistryError {
    /// 创建组件已存在错误
    pub fn exists(key: impl ToString) -> Self {
        Self::ComponentExists {
            key: key.to_string(),
        }
    }

    /// 创建组件不存在错误
    pub fn does_not_exist(key: impl ToString) -> Self {
        Self::ComponentDoesNotExist {
            key: key.to_string(),
        }
    }

    /// 创建无效参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 是否为可恢复的冲突错误
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ComponentExists { .. } | Self::ComponentDoesNotExist { .. }
        )
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件注册表错误: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
