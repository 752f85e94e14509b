//! # Component Registry Abstractions
//!
//! 组件注册表抽象层，定义组件键、能力描述符和注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`Capability`] / [`CapabilityId`] - 能力类型及其显式声明的继承层级
//! - [`ComponentKey`] - `(能力, 名称)` 组件键
//! - [`ComponentEntry`] - 已解析实例或待调用工厂
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentRegistryExt`] - 类型化与索引式的便捷方法

pub mod capability;
pub mod factory;
pub mod key;
pub mod registry;

pub use capability::*;
pub use factory::*;
pub use key::*;
pub use registry::*;
