//! HadithHouse 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `services`: 会话、拦截管线与认证适配器（来自 `hadithhouse` 核心库）
//! - `web::router`: 路由服务（基于静态路由表）
//! - `auth`: 认证状态镜像
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod auth_bar;
    pub mod loading;
    pub mod template_view;
}
mod serde_helper;
mod services;

use crate::auth::{AuthContext, init_auth};
use crate::components::auth_bar::AuthBar;
use crate::components::loading::LoadingIndicator;
use crate::components::template_view::TemplateView;
use crate::services::Services;

use hadithhouse::ResolvedRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 与页面全局对象的轻量级封装。
pub(crate) mod web {
    mod facebook;
    mod globals;
    mod http;
    pub mod router;

    pub use facebook::JsFacebookSdk;
    pub use globals::read_bootstrap;
    pub use http::FetchHttpClient;
}

use web::router::{DEFAULT_PATH, Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 命中路由表时加载模板，否则显示 404。
fn route_matcher(route: Option<ResolvedRoute>) -> AnyView {
    match route {
        Some(route) => view! { <TemplateView route=route /> }.into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <button class="btn btn-link mt-4" on:click=move |_| router.navigate(DEFAULT_PATH)>
                    "Back to hadiths"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取页面注入的启动参数，创建会话与拦截管线
    let services = Services::new(web::read_bootstrap());
    provide_context(services);

    // 2. 创建认证上下文并拉取用户信息
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx, services);

    view! {
        <LoadingIndicator />
        <AuthBar />
        <Router>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
