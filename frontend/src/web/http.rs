//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`，拦截管线挂在它外面。

use async_trait::async_trait;
use hadithhouse::{HttpClient, HttpError, HttpRequest, HttpResponse, HttpResult};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 基于浏览器 fetch 的 HTTP 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build_request(req: &HttpRequest) -> HttpResult<Request> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuild(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuild(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_headers(&headers.into());

        Request::new_with_str_and_init(&req.full_url(), &opts)
            .map_err(|e| HttpError::RequestBuild(format!("{:?}", e)))
    }

    async fn read_text(response: &Response) -> HttpResult<String> {
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParse(format!("{:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParse(format!("{:?}", e)))?;

        text.as_string()
            .ok_or_else(|| HttpError::ResponseParse("无法转换为字符串".to_string()))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> HttpResult<HttpResponse> {
        let request = Self::build_request(&req)?;

        let window =
            web_sys::window().ok_or_else(|| HttpError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::Network(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParse(format!("Response 类型转换失败: {:?}", e))
        })?;

        Ok(HttpResponse {
            status: response.status(),
            body: Self::read_text(&response).await?,
        })
    }
}
