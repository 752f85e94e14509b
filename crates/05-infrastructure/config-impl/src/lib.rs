//! # Configuration Implementation
//!
//! 基于 `config` crate 的分层设置加载：内置默认值、配置文件与环境变量。

pub mod settings;

pub use settings::{SettingsLoader, DEFAULT_ENV_PREFIX, DEFAULT_SETTINGS_FILE, ENV_SEPARATOR};
