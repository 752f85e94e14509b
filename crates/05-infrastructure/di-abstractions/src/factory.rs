//! 组件与组件工厂
//!
//! 注册表中的每个条目要么是已解析的组件实例，要么是尚未调用的工厂。

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 注册表中存放的组件实例
pub type Component = Arc<dyn Any + Send + Sync>;

/// 零参数组件工厂
///
/// 克隆后的工厂与原工厂共享同一个闭包，可通过 [`ComponentFactory::ptr_eq`] 判定同一性。
#[derive(Clone)]
pub struct ComponentFactory {
    create: Arc<dyn Fn() -> Component + Send + Sync>,
}

impl ComponentFactory {
    /// 从返回类型擦除组件的闭包创建工厂
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> Component + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
        }
    }

    /// 从返回具体类型的闭包创建工厂
    pub fn typed<T, F>(create: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(move || Arc::new(create()) as Component)
    }

    /// 调用工厂创建组件实例
    pub fn create(&self) -> Component {
        (self.create)()
    }

    /// 判断两个工厂是否为同一个闭包
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.create, &other.create)
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentFactory(<function>)")
    }
}

/// 注册表条目
#[derive(Clone)]
pub enum ComponentEntry {
    /// 工厂已登记但尚未调用
    Pending(ComponentFactory),
    /// 已解析的组件实例
    Resolved(Component),
}

impl ComponentEntry {
    /// 是否仍为待解析的工厂
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// 已解析时返回组件实例
    pub fn component(&self) -> Option<&Component> {
        match self {
            Self::Resolved(component) => Some(component),
            Self::Pending(_) => None,
        }
    }

    /// 待解析时返回工厂
    pub fn factory(&self) -> Option<&ComponentFactory> {
        match self {
            Self::Pending(factory) => Some(factory),
            Self::Resolved(_) => None,
        }
    }

    /// 已解析时将组件向下转换为具体类型
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.component()
            .and_then(|component| Arc::clone(component).downcast::<T>().ok())
    }
}

impl fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(factory) => f.debug_tuple("Pending").field(factory).finish(),
            Self::Resolved(_) => f.write_str("Resolved(<component>)"),
        }
    }
}
