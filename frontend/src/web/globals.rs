//! 页面注入的全局变量
//!
//! 服务端模板在加载 WASM 之前写入 `getHtmlBasePath()`、`fbFetchedLoginStatus`
//! 和 `fbAccessToken`。缺失时回退到默认值。

use hadithhouse::Bootstrap;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// 读取 `window[name]`，undefined / null 视为不存在
fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn html_base_path() -> Option<String> {
    let function = global("getHtmlBasePath")?.dyn_into::<Function>().ok()?;
    function.call0(&JsValue::NULL).ok()?.as_string()
}

/// 从 window 读取启动参数
pub fn read_bootstrap() -> Bootstrap {
    let mut bootstrap = Bootstrap::default();

    match html_base_path() {
        Some(path) => bootstrap.html_base_path = path,
        None => hadithhouse::log_warn!(
            "[Bootstrap] getHtmlBasePath() unavailable, using {}",
            bootstrap.html_base_path
        ),
    }

    bootstrap.fetched_login_status = global("fbFetchedLoginStatus")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    bootstrap.with_access_token(global("fbAccessToken").and_then(|v| v.as_string()))
}
