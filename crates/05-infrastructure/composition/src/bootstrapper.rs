//! 注册表启动器

use config_impl::SettingsLoader;
use di_impl::{RegistryTable, SharedRegistry, DEFAULT_REGISTRY};
use infrastructure_common::{
    InfrastructureError, InfrastructureResult, LoggingSettings, RegistryResult, Settings,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 启动阶段登记组件的回调
pub type StartupHook = Box<dyn FnOnce(&SharedRegistry) -> RegistryResult<()> + Send>;

/// 注册表启动器
///
/// 负责加载设置、初始化日志、获取（或创建）注册表，并依次执行启动回调登记组件。
pub struct RegistryBootstrapper {
    /// 应用设置
    settings: Settings,
    /// 注册表名称
    registry_name: String,
    /// 目标注册表集合，`None` 表示全局表
    table: Option<&'static RegistryTable>,
    /// 是否初始化日志系统
    init_logging: bool,
    /// 启动回调
    hooks: Vec<StartupHook>,
}

impl RegistryBootstrapper {
    /// 使用给定设置创建启动器
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry_name: DEFAULT_REGISTRY.to_string(),
            table: None,
            init_logging: false,
            hooks: Vec::new(),
        }
    }

    /// 通过设置加载器创建启动器
    pub fn from_loader(loader: &SettingsLoader) -> InfrastructureResult<Self> {
        Ok(Self::new(loader.load()?))
    }

    /// 设置注册表名称
    pub fn with_registry_name(mut self, name: impl Into<String>) -> Self {
        self.registry_name = name.into();
        self
    }

    /// 使用指定的注册表集合而非全局表
    pub fn with_table(mut self, table: &'static RegistryTable) -> Self {
        self.table = Some(table);
        self
    }

    /// 设置是否初始化日志系统
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    /// 添加启动回调，按添加顺序执行
    pub fn on_startup<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&SharedRegistry) -> RegistryResult<()> + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// 当前设置
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 启动：返回已完成组件登记的注册表
    pub fn bootstrap(self) -> InfrastructureResult<SharedRegistry> {
        if self.init_logging {
            init_logging(&self.settings.logging)?;
        }

        info!(registry = %self.registry_name, "开始启动组件注册表");

        let table = self.table.unwrap_or_else(RegistryTable::global);
        let registry = table.get_or_create(&self.registry_name, self.settings.registry);

        let hook_count = self.hooks.len();
        for (index, hook) in self.hooks.into_iter().enumerate() {
            debug!(hook = index, "执行启动回调");
            hook(&registry)?;
        }

        info!(
            registry = %self.registry_name,
            hooks = hook_count,
            components = registry.len(),
            "组件注册表启动完成"
        );
        Ok(registry)
    }
}

impl std::fmt::Debug for RegistryBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBootstrapper")
            .field("settings", &self.settings)
            .field("registry_name", &self.registry_name)
            .field("init_logging", &self.init_logging)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// 初始化日志系统
///
/// 设置了 `RUST_LOG` 时以其为准，否则使用配置中的级别。重复初始化返回错误。
pub fn init_logging(settings: &LoggingSettings) -> InfrastructureResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志级别无效: {}", e),
        })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.show_target);

    if settings.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
