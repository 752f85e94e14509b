//! 能力类型描述符
//!
//! 组件以“能力”为类型登记。能力可以是具体类型，也可以是 `dyn Trait`；
//! 其父能力通过 [`Capability::supertypes`] 显式声明，多态查找只沿着
//! 声明的层级进行，不依赖运行时反射。

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 可作为组件登记键的能力类型
///
/// 通常使用 [`capability!`](crate::capability) 宏实现。
pub trait Capability: 'static {
    /// 直接父能力列表
    fn supertypes() -> Vec<CapabilityId> {
        Vec::new()
    }
}

/// 能力描述符
///
/// 相等性与哈希只取决于底层 `TypeId`。
#[derive(Clone, Copy)]
pub struct CapabilityId {
    type_id: TypeId,
    type_name: &'static str,
    supertypes: fn() -> Vec<CapabilityId>,
}

impl CapabilityId {
    /// 获取能力 `C` 的描述符
    pub fn of<C: Capability + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
            supertypes: C::supertypes,
        }
    }

    /// 底层类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 直接父能力
    pub fn supertypes(&self) -> Vec<CapabilityId> {
        (self.supertypes)()
    }

    /// 判断 `self` 是否为 `other` 本身或其（间接）子能力
    pub fn is_subtype_of(&self, other: &CapabilityId) -> bool {
        if self == other {
            return true;
        }

        // 扁平层级（无父能力或父能力即目标）无需遍历
        let direct = self.supertypes();
        if direct.is_empty() {
            return false;
        }
        if direct.contains(other) {
            return true;
        }

        let mut visited = HashSet::from([self.type_id]);
        let mut pending = direct;

        while let Some(current) = pending.pop() {
            if current == *other {
                return true;
            }
            if visited.insert(current.type_id) {
                pending.extend(current.supertypes());
            }
        }

        false
    }
}

impl PartialEq for CapabilityId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CapabilityId {}

impl Hash for CapabilityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityId").field(&self.type_name).finish()
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 为类型实现 [`Capability`]，可选地声明父能力
///
/// ```
/// use di_abstractions::{capability, CapabilityId};
///
/// pub trait Connection: Send + Sync {}
/// pub struct LdapConnection;
///
/// capability!(dyn Connection);
/// capability!(LdapConnection: dyn Connection);
///
/// assert!(CapabilityId::of::<LdapConnection>()
///     .is_subtype_of(&CapabilityId::of::<dyn Connection>()));
/// ```
#[macro_export]
macro_rules! capability {
    ($ty:ty $(: $($supertype:ty),+ $(,)?)?) => {
        impl $crate::Capability for $ty {
            fn supertypes() -> ::std::vec::Vec<$crate::CapabilityId> {
                ::std::vec![$($($crate::CapabilityId::of::<$supertype>()),+)?]
            }
        }
    };
}
