use super::*;
use crate::config::Bootstrap;
use crate::request::MockHttpClient;
use futures::channel::oneshot;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

// =========================================================
// 辅助函数
// =========================================================

fn create_ctx(token: Option<&str>) -> AppContext {
    let bootstrap = Bootstrap::default().with_access_token(token.map(str::to_string));
    AppContext::bootstrap(&bootstrap)
}

/// 每个 URL 的响应由测试手动放行，用于模拟任意交错顺序
struct GatedClient {
    gates: RefCell<HashMap<String, oneshot::Receiver<HttpResult<HttpResponse>>>>,
}

impl GatedClient {
    fn new(urls: &[String]) -> (Self, Vec<oneshot::Sender<HttpResult<HttpResponse>>>) {
        let mut gates = HashMap::new();
        let mut senders = Vec::new();
        for url in urls {
            let (tx, rx) = oneshot::channel();
            gates.insert(url.clone(), rx);
            senders.push(tx);
        }
        (
            Self {
                gates: RefCell::new(gates),
            },
            senders,
        )
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GatedClient {
    async fn send(&self, req: HttpRequest) -> HttpResult<HttpResponse> {
        let gate = self.gates.borrow_mut().remove(&req.url);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(HttpError::Network("gate dropped".to_string()))),
            None => Err(HttpError::Network("no gate".to_string())),
        }
    }
}

/// 记录钩子调用顺序的拦截器
struct RecordingInterceptor {
    name: &'static str,
    log: std::rc::Rc<RefCell<Vec<String>>>,
    reject_requests: bool,
}

impl Interceptor for RecordingInterceptor {
    fn on_request(&self, req: HttpRequest) -> HttpResult<HttpRequest> {
        self.log.borrow_mut().push(format!("{}:request", self.name));
        if self.reject_requests {
            return Err(HttpError::RequestBuild("rejected".to_string()));
        }
        Ok(req)
    }

    fn on_request_error(&self, rejection: HttpError) -> HttpError {
        self.log
            .borrow_mut()
            .push(format!("{}:request_error", self.name));
        rejection
    }

    fn on_response(&self, resp: HttpResponse) -> HttpResult<HttpResponse> {
        self.log.borrow_mut().push(format!("{}:response", self.name));
        Ok(resp)
    }

    fn on_response_error(&self, rejection: HttpError) -> HttpResult<HttpResponse> {
        self.log
            .borrow_mut()
            .push(format!("{}:response_error", self.name));
        Err(rejection)
    }
}

// =========================================================
// 令牌注入
// =========================================================

#[tokio::test]
async fn test_api_request_carries_token() {
    let ctx = create_ctx(Some("tok-123"));
    let mock = MockHttpClient::new();
    mock.mock_response("/apis/hadiths", 200, json!([]));
    let client = ctx.intercepted(mock);

    client.send(HttpRequest::get("/apis/hadiths")).await.unwrap();

    let sent = client.inner().last_request().unwrap();
    assert_eq!(sent.param("fb_token"), Some("tok-123"));
    assert_eq!(sent.full_url(), "/apis/hadiths?fb_token=tok-123");
}

#[tokio::test]
async fn test_non_api_request_never_gets_token() {
    let ctx = create_ctx(Some("tok-123"));
    let mock = MockHttpClient::new();
    mock.mock_response("/static/hadiths/html/books.html", 200, json!("<div></div>"));
    let client = ctx.intercepted(mock);

    client
        .send(HttpRequest::get("/static/hadiths/html/books.html"))
        .await
        .unwrap();

    let sent = client.inner().last_request().unwrap();
    assert_eq!(sent.param("fb_token"), None);
}

#[tokio::test]
async fn test_api_request_without_token_is_untouched() {
    let ctx = create_ctx(None);
    let mock = MockHttpClient::new();
    mock.mock_response("/apis/books", 200, json!([]));
    let client = ctx.intercepted(mock);

    client
        .send(HttpRequest::get("/apis/books").with_param("page", "1"))
        .await
        .unwrap();

    let sent = client.inner().last_request().unwrap();
    assert_eq!(sent.params, vec![("page".to_string(), "1".to_string())]);
}

#[tokio::test]
async fn test_token_follows_session_changes() {
    let ctx = create_ctx(None);
    let mock = MockHttpClient::new();
    mock.mock_response("/apis/tags", 200, json!([]));
    let client = ctx.intercepted(mock);

    ctx.session.set_access_token(Some("late".to_string()));
    client.send(HttpRequest::get("/apis/tags")).await.unwrap();

    let sent = client.inner().last_request().unwrap();
    assert_eq!(sent.param("fb_token"), Some("late"));
}

// =========================================================
// 挂起计数
// =========================================================

#[tokio::test]
async fn test_global_header_is_not_counted() {
    let ctx = create_ctx(Some("tok"));
    let interceptor = ApiInterceptor::new(&ctx);

    let req = HttpRequest::get("/apis/persons").with_header("X-global", "true");
    let req = interceptor.on_request(req).unwrap();

    assert_eq!(ctx.pending.count(), 0);
    // 豁免计数不影响令牌注入
    assert_eq!(req.param("fb_token"), Some("tok"));
}

#[tokio::test]
async fn test_error_hooks_at_zero_keep_counter_at_zero() {
    let ctx = create_ctx(None);
    let interceptor = ApiInterceptor::new(&ctx);

    let err = interceptor.on_response_error(HttpError::Network("offline".into()));
    assert!(err.is_err());
    assert_eq!(ctx.pending.count(), 0);

    let err = interceptor.on_request_error(HttpError::RequestBuild("bad".into()));
    assert_eq!(err, HttpError::RequestBuild("bad".into()));
    assert_eq!(ctx.pending.count(), 0);
}

#[tokio::test]
async fn test_counter_returns_to_zero_after_interleaved_calls() {
    const N: usize = 6;
    let ctx = create_ctx(Some("tok"));
    let urls: Vec<String> = (0..N).map(|i| format!("/apis/hadiths/{}", i)).collect();
    let (gated, senders) = GatedClient::new(&urls);
    let client = ctx.intercepted(gated);
    let pending = ctx.pending.view();

    let calls = futures::future::join_all(urls.iter().map(|u| client.send(HttpRequest::get(u))));

    let driver = async {
        tokio::task::yield_now().await;
        assert_eq!(pending.count(), N);

        // 逆序放行，成功、网络错误、服务端错误交替
        for (i, tx) in senders.into_iter().enumerate().rev() {
            let outcome = match i % 3 {
                0 => Ok(HttpResponse {
                    status: 200,
                    body: "{}".to_string(),
                }),
                1 => Err(HttpError::Network("reset".to_string())),
                _ => Ok(HttpResponse {
                    status: 500,
                    body: "boom".to_string(),
                }),
            };
            let _ = tx.send(outcome);
            tokio::task::yield_now().await;
        }
    };

    let (results, _) = futures::join!(calls, driver);

    assert_eq!(pending.count(), 0);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    assert_eq!(
        results[2],
        Err(HttpError::Status {
            status: 500,
            body: "boom".to_string()
        })
    );
}

#[tokio::test]
async fn test_global_header_name_is_case_insensitive() {
    let ctx = create_ctx(None);
    let interceptor = ApiInterceptor::new(&ctx);

    interceptor
        .on_request(HttpRequest::get("/apis/persons").with_header("x-global", "1"))
        .unwrap();

    assert_eq!(ctx.pending.count(), 0);
}

#[tokio::test]
async fn test_exempt_completion_still_decrements() {
    let ctx = create_ctx(Some("tok"));
    let urls = vec!["/apis/books".to_string(), "/apis/tags".to_string()];
    let (gated, mut senders) = GatedClient::new(&urls);
    let client = ctx.intercepted(gated);
    let pending = ctx.pending.view();

    let counted = client.send(HttpRequest::get(&urls[0]));
    let exempt = client.send(HttpRequest::get(&urls[1]).with_header("X-global", "true"));

    let driver = async {
        tokio::task::yield_now().await;
        assert_eq!(pending.count(), 1);

        // 豁免请求先完成，仍然递减计数
        let exempt_tx = senders.pop().unwrap();
        let _ = exempt_tx.send(Ok(HttpResponse {
            status: 200,
            body: "[]".to_string(),
        }));
        tokio::task::yield_now().await;
        assert_eq!(pending.count(), 0);

        // 计数已为 0，计数请求完成时不会下溢
        let counted_tx = senders.pop().unwrap();
        let _ = counted_tx.send(Ok(HttpResponse {
            status: 200,
            body: "[]".to_string(),
        }));
        tokio::task::yield_now().await;
    };

    let (counted, exempt, _) = futures::join!(counted, exempt, driver);

    assert!(counted.is_ok());
    assert!(exempt.is_ok());
    assert_eq!(pending.count(), 0);
}

#[tokio::test]
async fn test_non_2xx_routes_to_response_error() {
    let ctx = create_ctx(None);
    let mock = MockHttpClient::new();
    let client = ctx.intercepted(mock);

    // 未注册的 URL 返回 404
    let result = client.send(HttpRequest::get("/apis/missing")).await;

    assert_eq!(result.unwrap_err().status(), Some(404));
    assert_eq!(ctx.pending.count(), 0);
}

#[tokio::test]
async fn test_build_failure_routes_to_request_error() {
    let ctx = create_ctx(None);
    let mock = MockHttpClient::new();
    mock.mock_error("/apis/books", HttpError::RequestBuild("bad header".into()));
    let log = std::rc::Rc::new(RefCell::new(Vec::new()));
    let client = ctx.intercepted(mock).with_interceptor(RecordingInterceptor {
        name: "rec",
        log: log.clone(),
        reject_requests: false,
    });

    let result = client.send(HttpRequest::get("/apis/books")).await;

    assert_eq!(
        result,
        Err(HttpError::RequestBuild("bad header".into()))
    );
    assert_eq!(*log.borrow(), vec!["rec:request", "rec:request_error"]);
    assert_eq!(ctx.pending.count(), 0);
}

// =========================================================
// 钩子顺序
// =========================================================

#[tokio::test]
async fn test_response_hooks_run_in_reverse_order() {
    let log = std::rc::Rc::new(RefCell::new(Vec::new()));
    let mock = MockHttpClient::new();
    mock.mock_response("/apis/tags", 200, json!([]));
    let client = InterceptedClient::new(mock)
        .with_interceptor(RecordingInterceptor {
            name: "a",
            log: log.clone(),
            reject_requests: false,
        })
        .with_interceptor(RecordingInterceptor {
            name: "b",
            log: log.clone(),
            reject_requests: false,
        });

    client.send(HttpRequest::get("/apis/tags")).await.unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["a:request", "b:request", "b:response", "a:response"]
    );
}

#[tokio::test]
async fn test_rejected_request_settles_earlier_interceptors_only() {
    let ctx = create_ctx(None);
    let log = std::rc::Rc::new(RefCell::new(Vec::new()));
    let mock = MockHttpClient::new();
    let client = ctx.intercepted(mock).with_interceptor(RecordingInterceptor {
        name: "guard",
        log: log.clone(),
        reject_requests: true,
    });

    let result = client.send(HttpRequest::get("/apis/hadiths")).await;

    assert!(result.is_err());
    // 请求没有发出
    assert!(client.inner().requests.borrow().is_empty());
    // 拒绝者自身不会收到 request_error
    assert_eq!(*log.borrow(), vec!["guard:request"]);
    // ApiInterceptor 已计数，随后被 request_error 抵消
    assert_eq!(ctx.pending.count(), 0);
}
