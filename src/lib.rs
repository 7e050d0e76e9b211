//! HadithHouse 客户端核心
//!
//! 与平台无关的前端胶水层：
//! - `route`: 路由表（URL 模式 -> 模板 + 控制器）
//! - `request`: HTTP 抽象层
//! - `interceptor`: 请求拦截管线（令牌注入 + 挂起请求计数）
//! - `tracker`: 挂起请求计数器
//! - `auth`: Facebook SDK 回调 -> Future 适配器
//! - `api`: HadithHouse REST API 客户端

// =========================================================
// 跨平台日志宏
// =========================================================

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub use web_sys::console as __console;

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod request;
pub mod route;
pub mod session;
pub mod tracker;

pub use api::{ApiUser, HadithHouseApi};
pub use auth::{AuthAdapter, FacebookSdk, FacebookService, SdkCallback};
pub use config::{Bootstrap, PipelineConfig};
pub use error::{AuthError, AuthErrorKind, AuthResult, HttpError, HttpResult};
pub use interceptor::{ApiInterceptor, InterceptedClient, Interceptor};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use route::{ROUTES, ResolvedRoute, RouteEntry};
pub use session::{FacebookUser, Session};
pub use tracker::{PendingRequests, PendingRequestsView};

// =========================================================
// 应用上下文 (替代 $rootScope 全局可变状态)
// =========================================================

/// 显式的应用上下文
///
/// 在启动时创建一次，之后以克隆的句柄传给拦截管线与认证适配器。
#[derive(Clone)]
pub struct AppContext {
    pub config: PipelineConfig,
    pub session: Session,
    pub pending: PendingRequests,
}

impl AppContext {
    /// 根据外部注入的启动参数初始化上下文，计数器归零
    pub fn bootstrap(bootstrap: &Bootstrap) -> Self {
        Self::with_config(PipelineConfig::default(), bootstrap)
    }

    pub fn with_config(config: PipelineConfig, bootstrap: &Bootstrap) -> Self {
        log_info!(
            "[Bootstrap] login status fetched: {}, token present: {}",
            bootstrap.fetched_login_status,
            bootstrap.access_token.is_some()
        );
        Self {
            config,
            session: Session::bootstrap(bootstrap),
            pending: PendingRequests::new(),
        }
    }

    /// 构建挂载到任意 HTTP 客户端上的拦截管线
    pub fn intercepted<C: HttpClient>(&self, client: C) -> InterceptedClient<C> {
        InterceptedClient::new(client).with_interceptor(ApiInterceptor::new(self))
    }

    /// 构建绑定到当前会话的认证适配器
    pub fn facebook<S: FacebookSdk>(&self, sdk: S) -> FacebookService<S> {
        FacebookService::new(sdk, self.session.clone())
    }
}
