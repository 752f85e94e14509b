//! 默认组件注册表实现

use crate::lock::RegistryLock;
use di_abstractions::{
    CapabilityId, Component, ComponentEntry, ComponentFactory, ComponentKey, ComponentRegistry,
};
use infrastructure_common::{RegistryError, RegistryOptions, RegistryResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

/// 默认组件注册表
///
/// 所有读写都在协调锁内完成；`components` 上的数据锁只在内存操作期间持有，
/// 调用工厂时会先释放，工厂因此可以在同一线程内读取注册表中的其它组件。
/// 工厂运行期间其键记录在 `resolving` 中，重入获取同一键返回 `None` 而不会再次调用工厂。
pub struct DefaultComponentRegistry {
    options: RegistryOptions,
    lock: RegistryLock,
    components: Mutex<HashMap<ComponentKey, ComponentEntry>>,
    resolving: Mutex<HashSet<ComponentKey>>,
}

impl DefaultComponentRegistry {
    /// 使用默认选项创建注册表
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    /// 使用指定选项创建注册表
    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            lock: RegistryLock::new(options.use_locking),
            components: Mutex::new(HashMap::new()),
            resolving: Mutex::new(HashSet::new()),
        }
    }

    /// 是否启用了协调锁
    pub fn is_locking(&self) -> bool {
        self.lock.is_enabled()
    }

    fn add_entry(
        &self,
        entry: ComponentEntry,
        key: ComponentKey,
        safe: Option<bool>,
    ) -> RegistryResult<bool> {
        let _guard = self.lock.acquire();
        let mut components = self.components.lock();

        if components.contains_key(&key) {
            if safe.unwrap_or(self.options.safe) {
                return Ok(false);
            }
            return Err(RegistryError::exists(&key));
        }

        debug!(key = %key, pending = entry.is_pending(), "登记组件");
        components.insert(key, entry);
        Ok(true)
    }
}

impl Default for DefaultComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 正在解析的键，离开作用域（包括工厂 panic）时移除
struct ResolvingMarker<'a> {
    resolving: &'a Mutex<HashSet<ComponentKey>>,
    key: ComponentKey,
}

impl<'a> ResolvingMarker<'a> {
    /// 键已在解析中时返回 `None`
    fn enter(resolving: &'a Mutex<HashSet<ComponentKey>>, key: &ComponentKey) -> Option<Self> {
        if !resolving.lock().insert(key.clone()) {
            return None;
        }
        Some(Self {
            resolving,
            key: key.clone(),
        })
    }
}

impl Drop for ResolvingMarker<'_> {
    fn drop(&mut self) {
        self.resolving.lock().remove(&self.key);
    }
}

/// 查找满足 `(capability, name)` 的键：先精确匹配，再按能力层级多态匹配
///
/// 多个子能力同名登记时，返回哪一个取决于哈希表的迭代顺序。
fn find_key(
    components: &HashMap<ComponentKey, ComponentEntry>,
    capability: CapabilityId,
    name: Option<&str>,
) -> Option<ComponentKey> {
    let exact = ComponentKey::new(capability, name);
    if components.contains_key(&exact) {
        return Some(exact);
    }

    components
        .keys()
        .find(|key| key.satisfies(&capability, name))
        .cloned()
}

impl ComponentRegistry for DefaultComponentRegistry {
    fn add_component(
        &self,
        component: Component,
        capability: CapabilityId,
        name: Option<&str>,
        safe: Option<bool>,
    ) -> RegistryResult<bool> {
        self.add_entry(
            ComponentEntry::Resolved(component),
            ComponentKey::new(capability, name),
            safe,
        )
    }

    fn add_factory(
        &self,
        factory: ComponentFactory,
        capability: CapabilityId,
        name: Option<&str>,
        safe: Option<bool>,
    ) -> RegistryResult<bool> {
        self.add_entry(
            ComponentEntry::Pending(factory),
            ComponentKey::new(capability, name),
            safe,
        )
    }

    fn remove_component(
        &self,
        capability: CapabilityId,
        name: Option<&str>,
        safe: bool,
    ) -> RegistryResult<Option<ComponentEntry>> {
        let _guard = self.lock.acquire();
        let key = ComponentKey::new(capability, name);

        match self.components.lock().remove(&key) {
            Some(entry) => {
                debug!(key = %key, "移除组件");
                Ok(Some(entry))
            }
            None if safe => Ok(None),
            None => Err(RegistryError::does_not_exist(&key)),
        }
    }

    fn get_component(&self, capability: CapabilityId, name: Option<&str>) -> Option<Component> {
        // 协调锁覆盖 检查-调用-回写 全过程，保证同一工厂至多调用一次
        let _guard = self.lock.acquire();

        let (key, factory) = {
            let components = self.components.lock();
            let key = find_key(&components, capability, name)?;
            match components.get(&key)? {
                ComponentEntry::Resolved(component) => return Some(component.clone()),
                ComponentEntry::Pending(factory) => (key, factory.clone()),
            }
        };

        let Some(_marker) = ResolvingMarker::enter(&self.resolving, &key) else {
            debug!(key = %key, "工厂正在解析中，忽略重入获取");
            return None;
        };

        trace!(key = %key, "调用组件工厂");
        let component = factory.create();

        let mut components = self.components.lock();
        if let Some(entry) = components.get_mut(&key) {
            let still_pending = entry
                .factory()
                .is_some_and(|pending| pending.ptr_eq(&factory));
            if still_pending {
                *entry = ComponentEntry::Resolved(component.clone());
                debug!(key = %key, "工厂已解析为组件实例");
            }
        }

        Some(component)
    }

    fn has_component(&self, capability: CapabilityId, name: Option<&str>) -> bool {
        let _guard = self.lock.acquire();
        find_key(&self.components.lock(), capability, name).is_some()
    }

    fn entries(&self) -> Vec<(ComponentKey, ComponentEntry)> {
        let _guard = self.lock.acquire();
        self.components
            .lock()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        let _guard = self.lock.acquire();
        self.components.lock().len()
    }

    fn options(&self) -> RegistryOptions {
        self.options
    }
}

impl fmt::Debug for DefaultComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components = self.components.lock();
        let mut map = f.debug_map();
        for (key, entry) in components.iter() {
            map.entry(&format_args!("{key}"), entry);
        }
        map.finish()
    }
}
