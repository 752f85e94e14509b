//! 组件键

use crate::capability::{Capability, CapabilityId};
use infrastructure_common::{RegistryError, RegistryResult};
use std::any::Any;
use std::fmt;

/// 组件键
///
/// 由能力描述符和可选名称组成，两个字段都相等时键才相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    capability: CapabilityId,
    name: Option<String>,
}

impl ComponentKey {
    /// 创建组件键
    pub fn new(capability: CapabilityId, name: Option<&str>) -> Self {
        Self {
            capability,
            name: name.map(str::to_owned),
        }
    }

    /// 以能力类型 `C` 创建未命名的组件键
    pub fn of<C: Capability + ?Sized>() -> Self {
        Self::new(CapabilityId::of::<C>(), None)
    }

    /// 以能力类型 `C` 创建命名组件键
    pub fn named<C: Capability + ?Sized>(name: &str) -> Self {
        Self::new(CapabilityId::of::<C>(), Some(name))
    }

    /// 从类型擦除的值创建组件键
    ///
    /// `capability` 必须是 [`CapabilityId`]，否则返回
    /// [`RegistryError::InvalidCapability`]。
    pub fn from_dyn(capability: &dyn Any, name: Option<&str>) -> RegistryResult<Self> {
        match capability.downcast_ref::<CapabilityId>() {
            Some(capability) => Ok(Self::new(*capability, name)),
            None => Err(RegistryError::InvalidCapability {
                found: format!("{:?}", capability.type_id()),
            }),
        }
    }

    /// 从简写形式创建组件键
    ///
    /// 接受 `CapabilityId`、`ComponentKey`，以及 `(CapabilityId, &'static str)`、
    /// `(CapabilityId, String)`、`(CapabilityId, Option<String>)` 二元组；
    /// 其它值返回 [`RegistryError::InvalidArgument`]。
    pub fn from_shorthand(arg: &dyn Any) -> RegistryResult<Self> {
        if let Some(key) = arg.downcast_ref::<ComponentKey>() {
            return Ok(key.clone());
        }
        if let Some(capability) = arg.downcast_ref::<CapabilityId>() {
            return Ok(Self::new(*capability, None));
        }
        if let Some((capability, name)) = arg.downcast_ref::<(CapabilityId, &'static str)>() {
            return Ok(Self::new(*capability, Some(*name)));
        }
        if let Some((capability, name)) = arg.downcast_ref::<(CapabilityId, String)>() {
            return Ok(Self::new(*capability, Some(name.as_str())));
        }
        if let Some((capability, name)) = arg.downcast_ref::<(CapabilityId, Option<String>)>() {
            return Ok(Self::new(*capability, name.as_deref()));
        }

        Err(RegistryError::invalid_argument(
            "期望能力描述符或 (能力描述符, 名称) 二元组",
        ))
    }

    /// 能力描述符
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    /// 组件名称
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 判断本键是否能满足对 `(capability, name)` 的多态查找
    pub fn satisfies(&self, capability: &CapabilityId, name: Option<&str>) -> bool {
        self.name() == name && self.capability.is_subtype_of(capability)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.capability, name),
            None => write!(f, "{}", self.capability),
        }
    }
}

/// 可转换为组件键的简写形式
pub trait IntoComponentKey {
    /// 转换为组件键
    fn into_component_key(self) -> ComponentKey;
}

impl IntoComponentKey for ComponentKey {
    fn into_component_key(self) -> ComponentKey {
        self
    }
}

impl IntoComponentKey for &ComponentKey {
    fn into_component_key(self) -> ComponentKey {
        self.clone()
    }
}

impl IntoComponentKey for CapabilityId {
    fn into_component_key(self) -> ComponentKey {
        ComponentKey::new(self, None)
    }
}

impl IntoComponentKey for (CapabilityId, &str) {
    fn into_component_key(self) -> ComponentKey {
        ComponentKey::new(self.0, Some(self.1))
    }
}

impl IntoComponentKey for (CapabilityId, String) {
    fn into_component_key(self) -> ComponentKey {
        ComponentKey {
            capability: self.0,
            name: Some(self.1),
        }
    }
}

impl IntoComponentKey for (CapabilityId, Option<&str>) {
    fn into_component_key(self) -> ComponentKey {
        ComponentKey::new(self.0, self.1)
    }
}

impl IntoComponentKey for (CapabilityId, Option<String>) {
    fn into_component_key(self) -> ComponentKey {
        ComponentKey {
            capability: self.0,
            name: self.1,
        }
    }
}
