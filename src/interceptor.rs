//! 请求拦截管线
//!
//! 每个 HTTP 调用在发出前经过所有拦截器的 `on_request`，完成后按相反顺序
//! 经过 `on_response` / `on_response_error`。对同一个调用，每个接受了请求的
//! 拦截器恰好收到一次完成回调。

use crate::AppContext;
use crate::config::PipelineConfig;
use crate::error::{HttpError, HttpResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::Session;
use crate::tracker::PendingRequests;

#[cfg(test)]
mod tests;

/// 拦截器的四个钩子
///
/// 默认实现原样放行。钩子是同步的，不允许阻塞。
pub trait Interceptor {
    fn on_request(&self, req: HttpRequest) -> HttpResult<HttpRequest> {
        Ok(req)
    }

    /// 请求未能发出；只能记账后继续向上抛出
    fn on_request_error(&self, rejection: HttpError) -> HttpError {
        rejection
    }

    fn on_response(&self, resp: HttpResponse) -> HttpResult<HttpResponse> {
        Ok(resp)
    }

    fn on_response_error(&self, rejection: HttpError) -> HttpResult<HttpResponse> {
        Err(rejection)
    }
}

// =========================================================
// 管线驱动
// =========================================================

/// 包装任意 HTTP 客户端，在每次调用前后执行拦截器
pub struct InterceptedClient<C> {
    client: C,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl<C: HttpClient> InterceptedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            interceptors: Vec::new(),
        }
    }

    pub fn with_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    /// 让前 `accepted` 个拦截器（逆序）处理请求错误
    fn reject_request(&self, accepted: usize, rejection: HttpError) -> HttpError {
        self.interceptors[..accepted]
            .iter()
            .rev()
            .fold(rejection, |e, interceptor| interceptor.on_request_error(e))
    }

    fn complete(&self, outcome: HttpResult<HttpResponse>) -> HttpResult<HttpResponse> {
        self.interceptors
            .iter()
            .rev()
            .fold(outcome, |outcome, interceptor| match outcome {
                Ok(resp) => interceptor.on_response(resp),
                Err(e) => interceptor.on_response_error(e),
            })
    }
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> HttpClient for InterceptedClient<C> {
    async fn send(&self, req: HttpRequest) -> HttpResult<HttpResponse> {
        let mut req = req;
        for (accepted, interceptor) in self.interceptors.iter().enumerate() {
            match interceptor.on_request(req) {
                Ok(next) => req = next,
                Err(e) => return Err(self.reject_request(accepted, e)),
            }
        }

        match self.client.send(req).await {
            Err(e) if e.is_request_error() => {
                Err(self.reject_request(self.interceptors.len(), e))
            }
            Err(e) => self.complete(Err(e)),
            Ok(resp) if resp.ok() => self.complete(Ok(resp)),
            Ok(resp) => self.complete(Err(HttpError::Status {
                status: resp.status,
                body: resp.body,
            })),
        }
    }
}

// =========================================================
// API 拦截器：挂起计数 + 令牌注入
// =========================================================

/// 维护挂起请求计数并为 API 请求附加访问令牌
///
/// 计数器的唯一写入者。
pub struct ApiInterceptor {
    config: PipelineConfig,
    session: Session,
    pending: PendingRequests,
}

impl ApiInterceptor {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            config: ctx.config.clone(),
            session: ctx.session.clone(),
            pending: ctx.pending.clone(),
        }
    }

    fn settle(&self) {
        self.pending.decrement();
    }
}

impl Interceptor for ApiInterceptor {
    fn on_request(&self, mut req: HttpRequest) -> HttpResult<HttpRequest> {
        // 带全局标记的请求（如输入联想）不触发加载指示器
        if !req.has_header(&self.config.global_header) {
            self.pending.increment();
        }

        if self.config.is_api_url(&req.url) {
            if let Some(token) = self.session.access_token() {
                req.set_param(&self.config.token_param, &token);
            }
        }

        Ok(req)
    }

    fn on_request_error(&self, rejection: HttpError) -> HttpError {
        self.settle();
        crate::log_warn!("[Pipeline] request failed before sending: {}", rejection);
        rejection
    }

    fn on_response(&self, resp: HttpResponse) -> HttpResult<HttpResponse> {
        self.settle();
        Ok(resp)
    }

    fn on_response_error(&self, rejection: HttpError) -> HttpResult<HttpResponse> {
        self.settle();
        crate::log_warn!("[Pipeline] response error: {}", rejection);
        Err(rejection)
    }
}
