//! # 组件注册表具体实现
//!
//! 提供线程安全的默认组件注册表，以及进程级的命名注册表集合。
//!
//! ```
//! use di_abstractions::{capability, CapabilityId, ComponentRegistryExt};
//! use di_impl::{delete_registry, get_registry};
//!
//! pub trait Directory: Send + Sync {}
//! pub struct LdapDirectory;
//! impl Directory for LdapDirectory {}
//!
//! capability!(dyn Directory);
//! capability!(LdapDirectory: dyn Directory);
//!
//! let registry = get_registry("__doc_example__");
//! registry.register(LdapDirectory, Some("ad")).unwrap();
//!
//! let directory = registry.get_as::<LdapDirectory>(CapabilityId::of::<dyn Directory>(), Some("ad"));
//! assert!(directory.is_some());
//!
//! delete_registry("__doc_example__");
//! ```

mod lock;
pub mod registry;
pub mod table;

pub use registry::DefaultComponentRegistry;
pub use table::{
    default_registry, delete_registry, get_registry, get_registry_with, RegistryTable,
    SharedRegistry, DEFAULT_REGISTRY,
};
