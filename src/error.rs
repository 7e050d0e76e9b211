use std::fmt;

use serde_json::Value;

// =========================================================
// HTTP 错误
// =========================================================

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// 请求构建失败（尚未发出）
    RequestBuild(String),
    /// 网络请求失败
    Network(String),
    /// 服务端返回非 2xx 状态
    Status { status: u16, body: String },
    /// 响应解析失败
    ResponseParse(String),
}

impl HttpError {
    /// 请求是否在发出之前就失败了
    pub fn is_request_error(&self) -> bool {
        matches!(self, HttpError::RequestBuild(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::RequestBuild(msg) => write!(f, "request build failed: {}", msg),
            HttpError::Network(msg) => write!(f, "network error: {}", msg),
            HttpError::Status { status, .. } => write!(f, "unexpected status: {}", status),
            HttpError::ResponseParse(msg) => write!(f, "response parse failed: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<serde_json::Error> for HttpError {
    fn from(e: serde_json::Error) -> Self {
        HttpError::ResponseParse(e.to_string())
    }
}

pub type HttpResult<T> = std::result::Result<T, HttpError>;

// =========================================================
// 认证错误
// =========================================================

/// 认证错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// 用户取消或拒绝了登录，可恢复
    AuthCancelled,
    /// SDK 响应中带有 `error` 字段
    SdkError,
    /// SDK 调用失败且没有结构化错误信息
    NullFailure,
}

impl AuthErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthErrorKind::AuthCancelled => "AUTH_CANCELLED",
            AuthErrorKind::SdkError => "SDK_ERROR",
            AuthErrorKind::NullFailure => "NULL_FAILURE",
        }
    }
}

/// Facebook 认证适配器的错误
///
/// - kind: 错误分类
/// - message: 可读的原因
/// - payload: SDK 返回的原始 `error` 对象（仅 `SdkError`）
#[derive(Debug, Clone, PartialEq)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
    payload: Option<Value>,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            payload: None,
        }
    }

    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::AuthCancelled, reason)
    }

    pub fn sdk(payload: Value) -> Self {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("facebook sdk reported an error")
            .to_string();
        Self {
            kind: AuthErrorKind::SdkError,
            message,
            payload: Some(payload),
        }
    }

    pub fn null_failure() -> Self {
        Self::new(AuthErrorKind::NullFailure, "facebook sdk call failed")
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// SDK 原始错误载荷
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)
    }
}

impl std::error::Error for AuthError {}

pub type AuthResult<T> = std::result::Result<T, AuthError>;
