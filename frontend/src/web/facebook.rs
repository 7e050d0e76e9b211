//! `window.FB` 绑定
//!
//! 只负责把 JS 回调桥接到核心库的 `SdkCallback`；回调到 Future 的转换
//! 在 `hadithhouse::auth` 中完成。

use std::cell::RefCell;
use std::rc::Rc;

use hadithhouse::{FacebookSdk, SdkCallback};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::serde_helper;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = FB, js_name = login)]
    fn fb_login(callback: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = FB, js_name = logout)]
    fn fb_logout(callback: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = FB, js_name = getLoginStatus)]
    fn fb_get_login_status(callback: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = FB, js_name = api)]
    fn fb_api(path: &str, params: &JsValue, callback: &JsValue) -> Result<(), JsValue>;
}

/// 将 SDK 的响应对象转换为 JSON 值，无法转换时为 null
fn to_json(response: JsValue) -> Value {
    serde_helper::from_value::<Value>(response).unwrap_or_else(|e| {
        hadithhouse::log_error!("[Facebook] unreadable sdk response: {}", e);
        Value::Null
    })
}

/// 调用 SDK 入口
///
/// 入口抛出异常时（例如 SDK 尚未加载）回调被丢弃，等待方得到 `NullFailure`。
fn invoke<F>(operation: &str, callback: SdkCallback, call: F)
where
    F: FnOnce(&JsValue) -> Result<(), JsValue>,
{
    let slot = Rc::new(RefCell::new(Some(callback)));
    let js_slot = slot.clone();

    let js_callback = Closure::once_into_js(move |response: JsValue| {
        let callback = js_slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(to_json(response));
        }
    });

    if let Err(e) = call(&js_callback) {
        hadithhouse::log_error!("[Facebook] FB.{} threw: {:?}", operation, e);
        slot.borrow_mut().take();
    }
}

/// 基于全局 `FB` 对象的 SDK 实现
#[derive(Clone, Copy, Default)]
pub struct JsFacebookSdk;

impl FacebookSdk for JsFacebookSdk {
    fn login(&self, callback: SdkCallback) {
        invoke("login", callback, fb_login);
    }

    fn logout(&self, callback: SdkCallback) {
        invoke("logout", callback, fb_logout);
    }

    fn get_login_status(&self, callback: SdkCallback) {
        invoke("getLoginStatus", callback, fb_get_login_status);
    }

    fn api(&self, path: &str, params: Value, callback: SdkCallback) {
        let params = match serde_helper::to_value(&params) {
            Ok(params) => params,
            Err(e) => {
                hadithhouse::log_error!("[Facebook] cannot encode params for {}: {}", path, e);
                // 丢弃回调，等待方得到 NullFailure
                drop(callback);
                return;
            }
        };
        invoke("api", callback, |cb| fb_api(path, &params, cb));
    }
}
