//! # Infrastructure Common
//!
//! 组件注册表工作区的公共类型。
//!
//! ## 核心内容
//!
//! - [`RegistryError`] - 组件注册表错误
//! - [`ConfigError`] - 配置加载错误
//! - [`InfrastructureError`] - 启动阶段的聚合错误
//! - [`RegistryOptions`] / [`Settings`] - 可从配置绑定的设置类型

pub mod configuration;
pub mod errors;

pub use configuration::*;
pub use errors::*;
