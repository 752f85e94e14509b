//! 命名注册表集合
//!
//! 进程内通常只使用一个全局表（[`RegistryTable::global`]），首次访问时构建，
//! 不会整体销毁；测试可以通过 [`delete_registry`] 移除自己创建的注册表。

use crate::registry::DefaultComponentRegistry;
use di_abstractions::ComponentRegistry;
use infrastructure_common::RegistryOptions;
use once_cell::sync::Lazy;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 默认注册表名称
pub const DEFAULT_REGISTRY: &str = "__default_registry__";

/// 共享的注册表句柄
pub type SharedRegistry = Arc<dyn ComponentRegistry>;

static GLOBAL_REGISTRY_TABLE: Lazy<RegistryTable> = Lazy::new(RegistryTable::new);

/// 命名注册表集合
///
/// 表锁与各注册表内部的锁相互独立；注册表的构造在表锁内完成，
/// 因此同名的并发首次访问只会构造出一个注册表。表锁可重入，
/// 构造器可以在同一线程内访问本表（例如创建它依赖的其它注册表）。
#[derive(Default)]
pub struct RegistryTable {
    registries: ReentrantMutex<RefCell<HashMap<String, SharedRegistry>>>,
}

impl RegistryTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级全局表
    pub fn global() -> &'static RegistryTable {
        &GLOBAL_REGISTRY_TABLE
    }

    /// 获取指定名称的注册表，不存在时以 `options` 创建默认实现
    pub fn get_or_create(&self, name: &str, options: RegistryOptions) -> SharedRegistry {
        self.create_with(name, options, |options| {
            Arc::new(DefaultComponentRegistry::with_options(options))
        })
    }

    /// 显式创建默认实现的注册表；名称已存在时返回已有注册表
    pub fn create(&self, name: &str, options: RegistryOptions) -> SharedRegistry {
        self.get_or_create(name, options)
    }

    /// 使用自定义构造器创建注册表；名称已存在时返回已有注册表且不调用构造器
    pub fn create_with<F>(&self, name: &str, options: RegistryOptions, constructor: F) -> SharedRegistry
    where
        F: FnOnce(RegistryOptions) -> SharedRegistry,
    {
        let registries = self.registries.lock();
        let existing = registries.borrow().get(name).cloned();
        if let Some(registry) = existing {
            return registry;
        }

        if !options.use_locking {
            warn!(registry = name, "注册表未启用锁，仅适用于单线程场景");
        }

        // 构造期间不持有借用，构造器可能已在本线程重入创建了同名注册表
        let registry = constructor(options);
        let mut map = registries.borrow_mut();
        if let Some(existing) = map.get(name) {
            return Arc::clone(existing);
        }
        map.insert(name.to_owned(), Arc::clone(&registry));
        debug!(registry = name, ?options, "创建注册表");
        registry
    }

    /// 获取已存在的注册表
    pub fn get(&self, name: &str) -> Option<SharedRegistry> {
        let registries = self.registries.lock();
        let registry = registries.borrow().get(name).cloned();
        registry
    }

    /// 是否存在指定名称的注册表
    pub fn contains(&self, name: &str) -> bool {
        let registries = self.registries.lock();
        let found = registries.borrow().contains_key(name);
        found
    }

    /// 删除指定名称的注册表，不存在时什么也不做
    ///
    /// 不会清理注册表中的组件；其它仍持有句柄的调用方可以继续使用它。
    pub fn delete(&self, name: &str) -> Option<SharedRegistry> {
        let registries = self.registries.lock();
        let removed = registries.borrow_mut().remove(name);
        if removed.is_some() {
            debug!(registry = name, "删除注册表");
        }
        removed
    }

    /// 所有注册表名称
    pub fn names(&self) -> Vec<String> {
        let registries = self.registries.lock();
        let names = registries.borrow().keys().cloned().collect();
        names
    }
}

impl std::fmt::Debug for RegistryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryTable")
            .field("registries", &self.names())
            .finish()
    }
}

/// 从全局表获取注册表，不存在时以默认选项创建
pub fn get_registry(name: &str) -> SharedRegistry {
    RegistryTable::global().get_or_create(name, RegistryOptions::default())
}

/// 从全局表获取注册表，不存在时以指定选项创建
pub fn get_registry_with(name: &str, options: RegistryOptions) -> SharedRegistry {
    RegistryTable::global().get_or_create(name, options)
}

/// 全局默认注册表
pub fn default_registry() -> SharedRegistry {
    get_registry(DEFAULT_REGISTRY)
}

/// 从全局表删除注册表
pub fn delete_registry(name: &str) {
    RegistryTable::global().delete(name);
}
