//! 会话状态
//!
//! 单实例，生命周期与应用相同，不做持久化。外部组件只能读取；
//! 写入只发生在启动时和认证适配器内部。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::ApiUser;
use crate::config::Bootstrap;

/// 规范化后的 Facebook 用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookUser {
    pub id: String,
    pub link: Option<String>,
    pub picture_url: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    login_status_fetched: bool,
    current_user: Option<FacebookUser>,
    app_user: Option<ApiUser>,
}

/// 会话句柄，可廉价克隆
#[derive(Clone, Default)]
pub struct Session {
    state: Rc<RefCell<SessionState>>,
}

impl Session {
    pub fn bootstrap(bootstrap: &Bootstrap) -> Self {
        let state = SessionState {
            access_token: bootstrap.access_token.clone(),
            login_status_fetched: bootstrap.fetched_login_status,
            current_user: None,
            app_user: None,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().access_token.is_some()
    }

    pub fn login_status_fetched(&self) -> bool {
        self.state.borrow().login_status_fetched
    }

    pub fn current_user(&self) -> Option<FacebookUser> {
        self.state.borrow().current_user.clone()
    }

    pub fn app_user(&self) -> Option<ApiUser> {
        self.state.borrow().app_user.clone()
    }

    /// 当前 API 用户是否拥有某项权限
    pub fn has_permission(&self, permission: &str) -> bool {
        self.state
            .borrow()
            .app_user
            .as_ref()
            .is_some_and(|u| u.has_permission(permission))
    }

    /// 保存从 API 取得的当前用户
    pub fn set_app_user(&self, user: Option<ApiUser>) {
        self.state.borrow_mut().app_user = user;
    }

    pub(crate) fn set_access_token(&self, token: Option<String>) {
        self.state.borrow_mut().access_token = token.filter(|t| !t.is_empty());
    }

    pub(crate) fn mark_login_status_fetched(&self) {
        self.state.borrow_mut().login_status_fetched = true;
    }

    pub(crate) fn set_current_user(&self, user: Option<FacebookUser>) {
        self.state.borrow_mut().current_user = user;
    }

    pub(crate) fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.access_token = None;
        state.current_user = None;
        state.app_user = None;
    }
}
