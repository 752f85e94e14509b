//! 配置相关的基础类型定义

use serde::{Deserialize, Serialize};

/// 注册表构造选项
///
/// 既可以在代码中直接构造，也可以从配置文件的 `registry` 节绑定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    /// 未显式指定时，冲突是否以返回值而非错误的形式报告
    pub safe: bool,
    /// 是否启用协调锁；关闭后仅适用于单线程场景（例如测试）
    pub use_locking: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            safe: true,
            use_locking: true,
        }
    }
}

impl RegistryOptions {
    /// 单线程测试使用的选项
    pub fn single_threaded() -> Self {
        Self {
            use_locking: false,
            ..Self::default()
        }
    }

    /// 设置默认安全模式
    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    /// 设置是否启用锁
    pub fn with_locking(mut self, use_locking: bool) -> Self {
        self.use_locking = use_locking;
        self
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别（trace/debug/info/warn/error）
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
        }
    }
}

/// 应用设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 注册表设置
    pub registry: RegistryOptions,
    /// 日志设置
    pub logging: LoggingSettings,
}
