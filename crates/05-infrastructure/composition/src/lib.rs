//! # 基础设施组合层
//!
//! 将设置加载、日志初始化与组件注册表组合为可直接使用的启动流程，
//! 并提供把注册表挂到请求上的 tower 中间件。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use config_impl::SettingsLoader;
//! use di_abstractions::{capability, ComponentRegistryExt};
//! use infrastructure_composition::RegistryBootstrapper;
//!
//! struct ConnectionPool;
//! capability!(ConnectionPool);
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = RegistryBootstrapper::from_loader(&SettingsLoader::new())?
//!         .with_logging(true)
//!         .on_startup(|registry| registry.register(ConnectionPool, None).map(|_| ()))
//!         .bootstrap()?;
//!
//!     assert!(registry.resolve::<ConnectionPool>(None).is_some());
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod middleware;

pub use bootstrapper::{init_logging, RegistryBootstrapper, StartupHook};
pub use middleware::{RegistryLayer, RegistryService, RequestRegistry, RequestRegistryExt};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
