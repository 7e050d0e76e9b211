//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API：所有对 window.history 的操作都集中在此模块。
//! 路径解析使用 `hadithhouse::route` 中的静态路由表。

use hadithhouse::ResolvedRoute;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 根路径重定向的目标（菜单第一项）
pub const DEFAULT_PATH: &str = "/hadiths";

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 根路径映射到默认页面，其余原样返回
fn normalize(path: &str) -> &str {
    if path.is_empty() || path == "/" {
        DEFAULT_PATH
    } else {
        path
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。未命中路由表时为 None。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<Option<ResolvedRoute>>,
    set_route: WriteSignal<Option<ResolvedRoute>>,
}

impl RouterService {
    fn new() -> Self {
        let path = current_path();
        let target = normalize(&path);
        if target != path {
            replace_history_state(target);
        }
        let (current_route, set_route) = signal(ResolvedRoute::resolve(target));

        Self {
            current_route,
            set_route,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<Option<ResolvedRoute>> {
        self.current_route
    }

    /// 导航到指定路径并推入 History
    pub fn navigate(&self, path: &str) {
        let target = normalize(path);
        let route = ResolvedRoute::resolve(target);
        match &route {
            Some(route) => hadithhouse::log_info!("[Router] {}", route),
            None => hadithhouse::log_warn!("[Router] no route for {}", target),
        }
        push_history_state(target);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            set_route.set(ResolvedRoute::resolve(normalize(&path)));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new();
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router();

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(Option<ResolvedRoute>) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
