//! 注册表协调锁

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// 注册表协调锁
///
/// 启用时为可重入互斥锁，使工厂在同一线程内可以回读注册表；
/// 禁用时不做任何同步，只用于单线程场景。
#[derive(Debug)]
pub(crate) enum RegistryLock {
    Exclusive(ReentrantMutex<()>),
    Disabled,
}

impl RegistryLock {
    pub(crate) fn new(use_locking: bool) -> Self {
        if use_locking {
            Self::Exclusive(ReentrantMutex::new(()))
        } else {
            Self::Disabled
        }
    }

    pub(crate) fn acquire(&self) -> RegistryLockGuard<'_> {
        match self {
            Self::Exclusive(mutex) => RegistryLockGuard(Some(mutex.lock())),
            Self::Disabled => RegistryLockGuard(None),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        matches!(self, Self::Exclusive(_))
    }
}

/// 协调锁守卫，离开作用域时释放
pub(crate) struct RegistryLockGuard<'a>(#[allow(dead_code)] Option<ReentrantMutexGuard<'a, ()>>);
