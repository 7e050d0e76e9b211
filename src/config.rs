//! 运行时配置
//!
//! `PipelineConfig` 描述拦截管线使用的约定；`Bootstrap` 是页面在加载时
//! 注入的全局变量（模板根路径、登录状态、访问令牌）。

// =========================================================
// 默认值
// =========================================================

/// API 请求前缀，命中此前缀的请求会附带访问令牌
pub const DEFAULT_API_PREFIX: &str = "/apis/";
/// 承载访问令牌的查询参数名
pub const DEFAULT_TOKEN_PARAM: &str = "fb_token";
/// 携带此请求头的请求不计入挂起计数（如输入联想）
pub const DEFAULT_GLOBAL_HEADER: &str = "X-global";
/// 未注入模板根路径时使用的默认值
pub const DEFAULT_HTML_BASE_PATH: &str = "/static/hadiths/html/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub api_prefix: String,
    pub token_param: String,
    pub global_header: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token_param: DEFAULT_TOKEN_PARAM.to_string(),
            global_header: DEFAULT_GLOBAL_HEADER.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn is_api_url(&self, url: &str) -> bool {
        url.starts_with(&self.api_prefix)
    }
}

/// 启动参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// 模板文件的根路径 (`getHtmlBasePath()`)
    pub html_base_path: String,
    /// 服务端是否已解析过登录状态 (`fbFetchedLoginStatus`)
    pub fetched_login_status: bool,
    /// 服务端注入的访问令牌 (`fbAccessToken`)
    pub access_token: Option<String>,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            html_base_path: DEFAULT_HTML_BASE_PATH.to_string(),
            fetched_login_status: false,
            access_token: None,
        }
    }
}

impl Bootstrap {
    /// 空字符串令牌视为未登录
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn template_url(&self, template: &str) -> String {
        if self.html_base_path.ends_with('/') {
            format!("{}{}", self.html_base_path, template)
        } else {
            format!("{}/{}", self.html_base_path, template)
        }
    }
}
