//! 请求中间件：把注册表挂到每个请求的扩展上
//!
//! ```rust,no_run
//! use infrastructure_composition::{RegistryLayer, RequestRegistryExt};
//! use tower::{service_fn, ServiceBuilder};
//!
//! let service = ServiceBuilder::new()
//!     .layer(RegistryLayer::new())
//!     .service(service_fn(|request: http::Request<()>| async move {
//!         let registry = request.registry().expect("RegistryLayer 已挂载");
//!         Ok::<_, std::convert::Infallible>(registry.len())
//!     }));
//! ```

use di_impl::{default_registry, SharedRegistry};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// 挂在请求扩展上的注册表
#[derive(Clone, Debug)]
pub struct RequestRegistry(pub SharedRegistry);

/// 注册表中间件层
#[derive(Clone, Debug)]
pub struct RegistryLayer {
    registry: SharedRegistry,
}

impl RegistryLayer {
    /// 挂载全局默认注册表
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    /// 挂载指定注册表
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self { registry }
    }
}

impl Default for RegistryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RegistryLayer {
    type Service = RegistryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RegistryService {
            inner,
            registry: self.registry.clone(),
        }
    }
}

/// 注册表中间件服务
#[derive(Clone, Debug)]
pub struct RegistryService<S> {
    inner: S,
    registry: SharedRegistry,
}

impl<S, B> Service<http::Request<B>> for RegistryService<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: http::Request<B>) -> Self::Future {
        request
            .extensions_mut()
            .insert(RequestRegistry(self.registry.clone()));
        self.inner.call(request)
    }
}

/// 从请求中取回注册表
pub trait RequestRegistryExt {
    /// 中间件挂载的注册表
    fn registry(&self) -> Option<SharedRegistry>;
}

impl<B> RequestRegistryExt for http::Request<B> {
    fn registry(&self) -> Option<SharedRegistry> {
        self.extensions()
            .get::<RequestRegistry>()
            .map(|attached| attached.0.clone())
    }
}
