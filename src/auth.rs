//! Facebook 认证适配器
//!
//! 把基于回调的 Facebook JS SDK 转换为 async 操作。所有回调到 Future 的
//! 转换都集中在本模块。SDK 调用只发一次：不重试、不设超时。
//!
//! 会话状态的写入也只发生在这里（登录、注销、状态查询、获取当前用户）。

use futures::channel::oneshot;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AuthError, AuthResult};
use crate::session::{FacebookUser, Session};

#[cfg(test)]
mod tests;

/// SDK 回调：接收单个响应对象，可能带 `error` 字段
pub type SdkCallback = Box<dyn FnOnce(Value)>;

/// 外部 SDK 边界
///
/// 与 `window.FB` 的形状一致。实现方必须最多调用一次回调。
pub trait FacebookSdk {
    fn login(&self, callback: SdkCallback);
    fn logout(&self, callback: SdkCallback);
    fn get_login_status(&self, callback: SdkCallback);
    fn api(&self, path: &str, params: Value, callback: SdkCallback);
}

/// 认证能力集合，UI 层依赖此特性而不是具体 SDK
#[async_trait::async_trait(?Send)]
pub trait AuthAdapter {
    async fn login(&self) -> AuthResult<Value>;
    async fn logout(&self) -> AuthResult<Value>;
    async fn get_login_status(&self) -> AuthResult<Value>;
    async fn get_current_user(&self) -> AuthResult<Option<FacebookUser>>;
    async fn get_profile_picture_url(&self, user_id: &str) -> AuthResult<String>;
    async fn get_friends(&self, user_id: &str) -> AuthResult<Option<String>>;
}

const CANCELLED_REASON: &str = "User cancelled login";
const STATUS_CONNECTED: &str = "connected";

// =========================================================
// SDK 响应结构
// =========================================================

#[derive(Deserialize)]
struct RawUser {
    id: Value,
    link: Option<String>,
    picture: Option<RawPicture>,
}

#[derive(Deserialize)]
struct RawPicture {
    data: Option<RawPictureData>,
}

#[derive(Deserialize)]
struct RawPictureData {
    url: Option<String>,
}

impl RawUser {
    fn normalize(self) -> Option<FacebookUser> {
        let id = match self.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(FacebookUser {
            id,
            link: self.link,
            picture_url: self.picture.and_then(|p| p.data).and_then(|d| d.url),
        })
    }
}

/// JavaScript 的真值判断
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn access_token_of(response: &Value) -> Option<String> {
    response
        .get("authResponse")
        .and_then(|auth| auth.get("accessToken"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{ data: { url } }` 中的 url 字段
fn data_url_of(response: &Value) -> Option<String> {
    response
        .get("data")
        .and_then(|data| data.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn has_error(response: &Value) -> bool {
    response.get("error").is_some_and(is_truthy)
}

// =========================================================
// 适配器实现
// =========================================================

pub struct FacebookService<S> {
    sdk: S,
    session: Session,
}

impl<S: FacebookSdk> FacebookService<S> {
    pub fn new(sdk: S, session: Session) -> Self {
        Self { sdk, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 发起一次 SDK 调用并等待其回调
    ///
    /// 回调被丢弃而未调用时返回 `NullFailure`；回调一直不被调用时保持挂起。
    async fn invoke<F>(&self, operation: &str, call: F) -> AuthResult<Value>
    where
        F: FnOnce(&S, SdkCallback),
    {
        let (tx, rx) = oneshot::channel();
        call(
            &self.sdk,
            Box::new(move |response| {
                let _ = tx.send(response);
            }),
        );
        rx.await.map_err(|_| {
            crate::log_error!("[Auth] {} callback dropped without a response", operation);
            AuthError::null_failure()
        })
    }

    async fn data_url(&self, path: String) -> AuthResult<Option<String>> {
        let response = self
            .invoke("api", |sdk, cb| sdk.api(&path, json!({}), cb))
            .await?;
        if has_error(&response) {
            crate::log_warn!("[Auth] {} failed", path);
            return Err(AuthError::null_failure());
        }
        Ok(data_url_of(&response))
    }
}

#[async_trait::async_trait(?Send)]
impl<S: FacebookSdk> AuthAdapter for FacebookService<S> {
    async fn login(&self) -> AuthResult<Value> {
        let response = self.invoke("login", |sdk, cb| sdk.login(cb)).await?;

        let authorized = response.get("authResponse").is_some_and(is_truthy);
        if !authorized {
            crate::log_info!("[Auth] login cancelled");
            return Err(AuthError::cancelled(CANCELLED_REASON));
        }

        if let Some(token) = access_token_of(&response) {
            self.session.set_access_token(Some(token));
        }
        self.session.mark_login_status_fetched();
        crate::log_info!("[Auth] logged in");
        Ok(response)
    }

    async fn logout(&self) -> AuthResult<Value> {
        let response = self.invoke("logout", |sdk, cb| sdk.logout(cb)).await?;
        self.session.clear();
        crate::log_info!("[Auth] logged out");
        Ok(response)
    }

    async fn get_login_status(&self) -> AuthResult<Value> {
        let response = self
            .invoke("getLoginStatus", |sdk, cb| sdk.get_login_status(cb))
            .await?;

        self.session.mark_login_status_fetched();
        let connected = response.get("status").and_then(Value::as_str) == Some(STATUS_CONNECTED);
        if connected {
            if let Some(token) = access_token_of(&response) {
                self.session.set_access_token(Some(token));
            }
        }
        Ok(response)
    }

    async fn get_current_user(&self) -> AuthResult<Option<FacebookUser>> {
        // 未登录是合法的终态，不是错误
        if !self.session.is_logged_in() {
            return Ok(None);
        }

        let response = self
            .invoke("api", |sdk, cb| {
                sdk.api("/me", json!({ "fields": "link,picture" }), cb)
            })
            .await?;

        if let Some(error) = response.get("error").filter(|e| is_truthy(e)) {
            return Err(AuthError::sdk(error.clone()));
        }

        let user = serde_json::from_value::<RawUser>(response)
            .ok()
            .and_then(RawUser::normalize)
            .ok_or_else(AuthError::null_failure)?;

        self.session.mark_login_status_fetched();
        self.session.set_current_user(Some(user.clone()));
        Ok(Some(user))
    }

    async fn get_profile_picture_url(&self, user_id: &str) -> AuthResult<String> {
        self.data_url(format!("/{}/picture", user_id))
            .await?
            .ok_or_else(AuthError::null_failure)
    }

    /// 读取 `/{user_id}/friends` 响应中的 `data.url` 字段
    ///
    /// 与图片接口形状相同；好友列表本身不会被返回。
    async fn get_friends(&self, user_id: &str) -> AuthResult<Option<String>> {
        self.data_url(format!("/{}/friends", user_id)).await
    }
}
