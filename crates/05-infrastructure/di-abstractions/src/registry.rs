//! 组件注册表抽象接口

use crate::capability::{Capability, CapabilityId};
use crate::factory::{Component, ComponentEntry, ComponentFactory};
use crate::key::{ComponentKey, IntoComponentKey};
use infrastructure_common::{RegistryError, RegistryOptions, RegistryResult};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// 组件注册表 trait
///
/// 以 `(能力, 名称)` 为键存放组件实例或延迟工厂。`safe` 参数为 `None` 时
/// 使用注册表配置的默认安全模式。
pub trait ComponentRegistry: Send + Sync + Debug {
    /// 登记组件实例
    ///
    /// 键已存在时：安全模式返回 `Ok(false)` 且不修改状态，
    /// 严格模式返回 [`RegistryError::ComponentExists`]。从不覆盖已有条目。
    fn add_component(
        &self,
        component: Component,
        capability: CapabilityId,
        name: Option<&str>,
        safe: Option<bool>,
    ) -> RegistryResult<bool>;

    /// 登记延迟工厂，首次获取组件时才调用
    fn add_factory(
        &self,
        factory: ComponentFactory,
        capability: CapabilityId,
        name: Option<&str>,
        safe: Option<bool>,
    ) -> RegistryResult<bool>;

    /// 按精确键移除条目，返回被移除的条目
    ///
    /// 键不存在时：安全模式返回 `Ok(None)`，
    /// 严格模式返回 [`RegistryError::ComponentDoesNotExist`]。
    fn remove_component(
        &self,
        capability: CapabilityId,
        name: Option<&str>,
        safe: bool,
    ) -> RegistryResult<Option<ComponentEntry>>;

    /// 获取组件，必要时解析待定工厂
    fn get_component(&self, capability: CapabilityId, name: Option<&str>) -> Option<Component>;

    /// 检查组件是否存在，不会调用工厂
    fn has_component(&self, capability: CapabilityId, name: Option<&str>) -> bool;

    /// 列出所有原始条目，待定工厂保持未解析
    fn entries(&self) -> Vec<(ComponentKey, ComponentEntry)>;

    /// 条目数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 构造选项
    fn options(&self) -> RegistryOptions;
}

/// 组件注册表扩展方法
///
/// 提供类型化的登记/获取以及严格语义的索引式访问。
pub trait ComponentRegistryExt: ComponentRegistry {
    /// 以实例自身的类型为能力登记组件
    fn register<T>(&self, instance: T, name: Option<&str>) -> RegistryResult<bool>
    where
        T: Capability + Send + Sync,
    {
        self.add_component(Arc::new(instance), CapabilityId::of::<T>(), name, None)
    }

    /// 以 `T` 为能力登记工厂
    fn register_factory<T, F>(&self, factory: F, name: Option<&str>) -> RegistryResult<bool>
    where
        T: Capability + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_factory(
            ComponentFactory::typed(factory),
            CapabilityId::of::<T>(),
            name,
            None,
        )
    }

    /// 以 `T` 为能力获取组件并向下转换
    fn resolve<T>(&self, name: Option<&str>) -> Option<Arc<T>>
    where
        T: Capability + Send + Sync,
    {
        self.get_as::<T>(CapabilityId::of::<T>(), name)
    }

    /// 按任意能力获取组件，并向下转换为具体类型 `T`
    fn get_as<T>(&self, capability: CapabilityId, name: Option<&str>) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get_component(capability, name)
            .and_then(|component| component.downcast::<T>().ok())
    }

    /// 获取组件，不存在时返回 `default`
    fn get_component_or(
        &self,
        capability: CapabilityId,
        name: Option<&str>,
        default: Component,
    ) -> Component {
        self.get_component(capability, name).unwrap_or(default)
    }

    /// 成员检查
    fn contains(&self, key: impl IntoComponentKey) -> bool {
        let key = key.into_component_key();
        self.has_component(key.capability(), key.name())
    }

    /// 索引式获取，不存在时返回 [`RegistryError::ComponentDoesNotExist`]
    fn lookup(&self, key: impl IntoComponentKey) -> RegistryResult<Component> {
        let key = key.into_component_key();
        self.get_component(key.capability(), key.name())
            .ok_or_else(|| RegistryError::does_not_exist(&key))
    }

    /// 索引式登记，键已存在时返回 [`RegistryError::ComponentExists`]
    fn insert(&self, key: impl IntoComponentKey, component: Component) -> RegistryResult<()> {
        let key = key.into_component_key();
        self.add_component(component, key.capability(), key.name(), Some(false))
            .map(|_| ())
    }

    /// 索引式删除，键不存在时返回 [`RegistryError::ComponentDoesNotExist`]
    fn delete(&self, key: impl IntoComponentKey) -> RegistryResult<ComponentEntry> {
        let key = key.into_component_key();
        self.remove_component(key.capability(), key.name(), false)?
            .ok_or_else(|| RegistryError::does_not_exist(&key))
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistryExt for R {}
