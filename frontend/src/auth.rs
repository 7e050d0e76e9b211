//! 认证模块
//!
//! 把核心库会话中的登录信息镜像为 Leptos 信号，供 UI 订阅。
//! 会话本身只由认证适配器写入。

use hadithhouse::{ApiUser, AuthAdapter, AuthErrorKind, FacebookUser};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::services::Services;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 是否已解析过登录状态
    pub fetched_login_status: bool,
    /// 当前 Facebook 用户
    pub fb_user: Option<FacebookUser>,
    /// 当前 API 用户（含权限）
    pub app_user: Option<ApiUser>,
    /// 是否正在登录 / 注销
    pub is_busy: bool,
    /// 最近一次失败的原因
    pub error: Option<String>,
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    pub fn is_logged_in_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().fb_user.is_some())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态并拉取用户信息
pub fn init_auth(ctx: &AuthContext, services: Services) {
    let fetched = services.session().login_status_fetched();
    ctx.set_state.update(|state| state.fetched_login_status = fetched);

    let ctx = *ctx;
    spawn_local(async move {
        refresh_user_info(&ctx, services).await;
    });
}

/// 拉取 Facebook 用户与 API 用户
pub async fn refresh_user_info(ctx: &AuthContext, services: Services) {
    let facebook = services.facebook();
    match facebook.get_current_user().await {
        Ok(Some(user)) => ctx.set_state.update(|state| {
            state.fetched_login_status = true;
            state.fb_user = Some(user);
        }),
        // 未登录同样是已解析的登录状态
        Ok(None) => ctx.set_state.update(|state| state.fetched_login_status = true),
        Err(e) => {
            hadithhouse::log_error!("[Auth] failed to load facebook user: {}", e);
            ctx.set_state.update(|state| state.fetched_login_status = true);
        }
    }

    match services.api().current_user().await {
        Ok(user) => {
            services.session().set_app_user(Some(user.clone()));
            ctx.set_state.update(|state| state.app_user = Some(user));
        }
        Err(e) => hadithhouse::log_warn!("[Auth] failed to load api user: {}", e),
    }
}

/// 登录，成功后刷新用户信息
pub async fn login(ctx: &AuthContext, services: Services) {
    ctx.set_state.update(|state| {
        state.is_busy = true;
        state.error = None;
    });

    let facebook = services.facebook();
    match facebook.login().await {
        Ok(_) => refresh_user_info(ctx, services).await,
        Err(e) if e.kind == AuthErrorKind::AuthCancelled => {
            ctx.set_state.update(|state| state.error = Some(e.message));
        }
        Err(e) => {
            hadithhouse::log_error!("[Auth] login failed: {}", e);
            ctx.set_state.update(|state| state.error = Some(e.to_string()));
        }
    }

    ctx.set_state.update(|state| state.is_busy = false);
}

/// 注销并清除用户信息
pub async fn logout(ctx: &AuthContext, services: Services) {
    ctx.set_state.update(|state| state.is_busy = true);

    let facebook = services.facebook();
    match facebook.logout().await {
        Ok(_) => ctx.set_state.update(|state| {
            state.fb_user = None;
            state.app_user = None;
        }),
        Err(e) => {
            hadithhouse::log_error!("[Auth] logout failed: {}", e);
            ctx.set_state.update(|state| state.error = Some(e.to_string()));
        }
    }

    ctx.set_state.update(|state| state.is_busy = false);
}
