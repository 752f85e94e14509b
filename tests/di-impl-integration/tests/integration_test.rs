//! 组件注册表的集中集成测试
use anyhow::Result;
use config_impl::SettingsLoader;
use di_abstractions::{
    capability, CapabilityId, ComponentKey, ComponentRegistry, ComponentRegistryExt,
};
use di_impl::{delete_registry, get_registry, get_registry_with, RegistryTable, SharedRegistry};
use infrastructure_common::{InfrastructureError, RegistryError, RegistryOptions};
use infrastructure_composition::{RegistryBootstrapper, RegistryLayer, RequestRegistryExt};
use std::convert::Infallible;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use tower::{service_fn, Layer, ServiceExt};

/// 目录服务能力
pub trait Directory: Send + Sync {
    fn host(&self) -> &str;
}

/// LDAP 连接
#[derive(Debug)]
pub struct LdapConnection {
    host: String,
}

impl Directory for LdapConnection {
    fn host(&self) -> &str {
        &self.host
    }
}

/// 带连接池的 LDAP 连接
#[derive(Debug)]
pub struct PooledLdapConnection {
    size: usize,
}

/// 与目录无关的组件
#[derive(Debug, PartialEq)]
pub struct Clock(u64);

capability!(dyn Directory);
capability!(LdapConnection: dyn Directory);
capability!(PooledLdapConnection: LdapConnection);
capability!(Clock);

fn ldap(host: &str) -> LdapConnection {
    LdapConnection {
        host: host.to_string(),
    }
}

fn isolated(name: &str, options: RegistryOptions) -> SharedRegistry {
    RegistryTable::new().get_or_create(name, options)
}

#[test]
fn test_polymorphic_lookup_through_declared_hierarchy() -> Result<()> {
    let registry = isolated("polymorphic", RegistryOptions::default());
    registry.register(PooledLdapConnection { size: 4 }, Some("ad"))?;

    let directory = CapabilityId::of::<dyn Directory>();
    assert!(registry.has_component(directory, Some("ad")));
    assert!(registry.contains((CapabilityId::of::<LdapConnection>(), "ad")));

    let pooled = registry
        .get_as::<PooledLdapConnection>(directory, Some("ad"))
        .expect("pooled connection satisfies the directory capability");
    assert_eq!(pooled.size, 4);

    // 名称必须一致，父能力不能反向满足子能力
    assert!(!registry.has_component(directory, None));
    assert!(registry
        .get_component(CapabilityId::of::<Clock>(), Some("ad"))
        .is_none());
    Ok(())
}

#[test]
fn test_exact_match_wins_over_subtype() -> Result<()> {
    let registry = isolated("exact", RegistryOptions::default());
    registry.register(PooledLdapConnection { size: 1 }, None)?;
    registry.register(ldap("exact.example.com"), None)?;

    let connection = registry
        .resolve::<LdapConnection>(None)
        .expect("exact registration");
    assert_eq!(connection.host(), "exact.example.com");
    Ok(())
}

#[test]
fn test_safe_and_strict_duplicate_registration() -> Result<()> {
    let registry = isolated("duplicates", RegistryOptions::default());
    assert!(registry.register(Clock(1), None)?);

    // 安全模式：不覆盖，返回 false
    assert!(!registry.register(Clock(2), None)?);
    assert_eq!(registry.resolve::<Clock>(None).as_deref(), Some(&Clock(1)));

    // 严格模式：返回冲突错误
    let error = registry
        .add_component(Arc::new(Clock(3)), CapabilityId::of::<Clock>(), None, Some(false))
        .unwrap_err();
    assert!(error.is_conflict());
    assert_eq!(registry.resolve::<Clock>(None).as_deref(), Some(&Clock(1)));

    let strict = isolated("strict", RegistryOptions::default().with_safe(false));
    strict.register(Clock(1), None)?;
    assert!(matches!(
        strict.register(Clock(2), None),
        Err(RegistryError::ComponentExists { .. })
    ));
    Ok(())
}

#[test]
fn test_remove_is_exact_and_respects_safe_flag() -> Result<()> {
    let registry = isolated("remove", RegistryOptions::default());
    registry.register(PooledLdapConnection { size: 2 }, None)?;

    // 父能力的键不会删除子能力的条目
    assert!(registry
        .remove_component(CapabilityId::of::<LdapConnection>(), None, true)?
        .is_none());
    assert!(matches!(
        registry.delete(CapabilityId::of::<LdapConnection>()),
        Err(RegistryError::ComponentDoesNotExist { .. })
    ));

    let removed = registry.delete(ComponentKey::of::<PooledLdapConnection>())?;
    assert_eq!(
        removed.downcast::<PooledLdapConnection>().map(|pooled| pooled.size),
        Some(2)
    );
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn test_index_style_access() -> Result<()> {
    let registry = isolated("index", RegistryOptions::default());
    let key = ComponentKey::named::<Clock>("utc");

    registry.insert(&key, Arc::new(Clock(42)))?;
    assert!(matches!(
        registry.insert(&key, Arc::new(Clock(0))),
        Err(RegistryError::ComponentExists { .. })
    ));

    let component = registry.lookup(&key)?;
    assert_eq!(component.downcast_ref::<Clock>(), Some(&Clock(42)));

    let missing = registry.lookup(ComponentKey::named::<Clock>("local"));
    assert!(matches!(
        missing,
        Err(RegistryError::ComponentDoesNotExist { .. })
    ));
    Ok(())
}

#[test]
fn test_shorthand_keys() -> Result<()> {
    let registry = isolated("shorthand", RegistryOptions::default());
    registry.register(Clock(7), Some("utc"))?;

    let shorthand: (CapabilityId, &'static str) = (CapabilityId::of::<Clock>(), "utc");
    let key = ComponentKey::from_shorthand(&shorthand)?;
    assert!(registry.contains(&key));

    assert!(matches!(
        ComponentKey::from_shorthand(&42_u32),
        Err(RegistryError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ComponentKey::from_dyn(&"not a capability", None),
        Err(RegistryError::InvalidCapability { .. })
    ));
    Ok(())
}

#[test]
fn test_factory_runs_once_and_is_replaced_by_instance() -> Result<()> {
    let registry = isolated("factory", RegistryOptions::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    registry.register_factory(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ldap("lazy.example.com")
        },
        Some("lazy"),
    )?;

    // 成员检查与列举都不会调用工厂
    assert!(registry.has_component(CapabilityId::of::<dyn Directory>(), Some("lazy")));
    assert!(registry.entries().iter().all(|(_, entry)| entry.is_pending()));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let first = registry
        .get_as::<LdapConnection>(CapabilityId::of::<dyn Directory>(), Some("lazy"))
        .expect("factory resolves through the parent capability");
    let second = registry
        .resolve::<LdapConnection>(Some("lazy"))
        .expect("resolved instance is stored");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.host(), "lazy.example.com");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.entries().iter().all(|(_, entry)| !entry.is_pending()));
    Ok(())
}

#[test]
fn test_factory_can_read_registry_on_same_thread() -> Result<()> {
    let registry = isolated("reentrant", RegistryOptions::default());
    registry.register(Clock(99), None)?;

    let inner = Arc::clone(&registry);
    registry.register_factory(
        move || {
            let clock = inner.resolve::<Clock>(None).map_or(0, |clock| clock.0);
            LdapConnection {
                host: format!("host-{}", clock),
            }
        },
        None,
    )?;

    let connection = registry
        .resolve::<LdapConnection>(None)
        .expect("factory resolved");
    assert_eq!(connection.host(), "host-99");
    Ok(())
}

#[test]
fn test_concurrent_registration_loses_no_updates() {
    let registry = isolated("concurrent-add", RegistryOptions::default());
    let threads = 8;
    let per_thread = 50;

    std::thread::scope(|scope| {
        for thread in 0..threads {
            let registry = &registry;
            scope.spawn(move || {
                for index in 0..per_thread {
                    let name = format!("clock-{}-{}", thread, index);
                    assert!(registry.register(Clock(index), Some(name.as_str())).unwrap());
                }
            });
        }
    });

    assert_eq!(registry.len(), threads * per_thread as usize);
}

#[test]
fn test_concurrent_same_key_registration_has_one_winner() {
    let registry = isolated("concurrent-same", RegistryOptions::default());
    let barrier = Barrier::new(8);

    let wins: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|value| {
                let registry = &registry;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    registry.register(Clock(value), None).unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| usize::from(handle.join().unwrap()))
            .sum()
    });

    assert_eq!(wins, 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_concurrent_resolution_invokes_factory_once() -> Result<()> {
    let registry = isolated("concurrent-factory", RegistryOptions::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    registry.register_factory(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            PooledLdapConnection { size: 16 }
        },
        None,
    )?;

    let barrier = Barrier::new(8);
    let resolved: Vec<Arc<PooledLdapConnection>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = &registry;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    registry
                        .get_as::<PooledLdapConnection>(CapabilityId::of::<dyn Directory>(), None)
                        .unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(resolved
        .iter()
        .all(|connection| Arc::ptr_eq(connection, &resolved[0])));
    Ok(())
}

#[test]
fn test_single_threaded_registry_behaves_the_same() -> Result<()> {
    let registry = isolated("single", RegistryOptions::single_threaded());
    assert!(!registry.options().use_locking);

    registry.register_factory(|| Clock(5), None)?;
    assert_eq!(registry.resolve::<Clock>(None).as_deref(), Some(&Clock(5)));
    assert!(!registry.register(Clock(6), None)?);
    Ok(())
}

#[test]
fn test_global_table_shares_registries_by_name() -> Result<()> {
    let name = "__integration_global__";
    let first = get_registry(name);
    first.register(Clock(1), None)?;

    // 已存在的注册表不会被新的选项替换
    let second = get_registry_with(name, RegistryOptions::single_threaded());
    assert!(second.options().use_locking);
    assert_eq!(second.resolve::<Clock>(None).as_deref(), Some(&Clock(1)));

    delete_registry(name);
    assert!(get_registry(name).is_empty());
    delete_registry(name);
    Ok(())
}

#[test]
fn test_bootstrap_from_settings_file() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[registry]\nsafe = false\nuse_locking = true")?;

    let loader = SettingsLoader::new()
        .without_default_file()
        .without_env()
        .with_file(file.path());

    let registry = RegistryBootstrapper::from_loader(&loader)?
        .with_registry_name("__integration_bootstrap__")
        .on_startup(|registry| registry.register(ldap("boot.example.com"), None).map(|_| ()))
        .bootstrap()?;

    assert!(!registry.options().safe);
    assert!(registry.contains(CapabilityId::of::<dyn Directory>()));
    assert!(matches!(
        registry.register(ldap("again.example.com"), None),
        Err(RegistryError::ComponentExists { .. })
    ));

    delete_registry("__integration_bootstrap__");
    Ok(())
}

#[test]
fn test_bootstrap_reports_missing_settings_file() {
    let loader = SettingsLoader::new()
        .without_default_file()
        .without_env()
        .with_file("/no/such/registry.toml");

    assert!(matches!(
        RegistryBootstrapper::from_loader(&loader),
        Err(InfrastructureError::ConfigError { .. })
    ));
}

#[tokio::test]
async fn test_middleware_exposes_registry_to_handlers() -> Result<()> {
    let registry = isolated("middleware", RegistryOptions::default());
    registry.register(ldap("request.example.com"), Some("ad"))?;

    let service = RegistryLayer::with_registry(registry).layer(service_fn(
        |request: http::Request<()>| async move {
            let host = request
                .registry()
                .and_then(|registry| {
                    registry.get_as::<LdapConnection>(CapabilityId::of::<dyn Directory>(), Some("ad"))
                })
                .map(|connection| connection.host().to_string());
            Ok::<_, Infallible>(host)
        },
    ));

    let host = service.oneshot(http::Request::new(())).await?;
    assert_eq!(host.as_deref(), Some("request.example.com"));
    Ok(())
}
