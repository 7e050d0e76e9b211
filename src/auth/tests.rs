use super::*;
use crate::config::Bootstrap;
use crate::error::AuthErrorKind;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::task::{Context, Poll};

// =========================================================
// Mock SDK
// =========================================================

#[derive(Clone, Copy, PartialEq)]
enum CallbackMode {
    /// 立即以预设响应调用回调
    Respond,
    /// 丢弃回调，不调用
    Drop,
    /// 保留回调，永不调用
    Hold,
}

struct MockFacebookSdk {
    responses: RefCell<HashMap<String, Value>>,
    calls: RefCell<Vec<(String, Value)>>,
    held: RefCell<Vec<SdkCallback>>,
    mode: Cell<CallbackMode>,
}

impl MockFacebookSdk {
    fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            held: RefCell::new(Vec::new()),
            mode: Cell::new(CallbackMode::Respond),
        }
    }

    fn mock(&self, key: &str, response: Value) -> &Self {
        self.responses
            .borrow_mut()
            .insert(key.to_string(), response);
        self
    }

    fn dispatch(&self, key: &str, params: Value, callback: SdkCallback) {
        self.calls.borrow_mut().push((key.to_string(), params));
        match self.mode.get() {
            CallbackMode::Respond => {
                let response = self
                    .responses
                    .borrow()
                    .get(key)
                    .cloned()
                    .unwrap_or(Value::Null);
                callback(response);
            }
            CallbackMode::Drop => drop(callback),
            CallbackMode::Hold => self.held.borrow_mut().push(callback),
        }
    }

    fn call_keys(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl FacebookSdk for MockFacebookSdk {
    fn login(&self, callback: SdkCallback) {
        self.dispatch("login", Value::Null, callback);
    }

    fn logout(&self, callback: SdkCallback) {
        self.dispatch("logout", Value::Null, callback);
    }

    fn get_login_status(&self, callback: SdkCallback) {
        self.dispatch("getLoginStatus", Value::Null, callback);
    }

    fn api(&self, path: &str, params: Value, callback: SdkCallback) {
        self.dispatch(path, params, callback);
    }
}

fn create_service(token: Option<&str>) -> FacebookService<MockFacebookSdk> {
    let bootstrap = Bootstrap::default().with_access_token(token.map(str::to_string));
    FacebookService::new(MockFacebookSdk::new(), Session::bootstrap(&bootstrap))
}

// =========================================================
// login / logout / status
// =========================================================

#[tokio::test]
async fn test_login_resolves_with_auth_response() {
    let service = create_service(None);
    let response = json!({
        "status": "connected",
        "authResponse": { "accessToken": "fresh", "userID": "42" }
    });
    service.sdk.mock("login", response.clone());

    let result = service.login().await.unwrap();

    assert_eq!(result, response);
    assert_eq!(service.session().access_token().as_deref(), Some("fresh"));
    assert!(service.session().login_status_fetched());
}

#[tokio::test]
async fn test_login_without_auth_response_is_cancelled() {
    let service = create_service(None);
    service
        .sdk
        .mock("login", json!({ "status": "unknown", "authResponse": null }));

    let err = service.login().await.unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::AuthCancelled);
    assert_eq!(err.message, "User cancelled login");
    assert!(!service.session().is_logged_in());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let service = create_service(Some("tok"));
    service.sdk.mock("logout", json!({ "status": "unknown" }));
    service.session().set_current_user(Some(FacebookUser {
        id: "1".to_string(),
        link: None,
        picture_url: None,
    }));

    let result = service.logout().await.unwrap();

    assert_eq!(result, json!({ "status": "unknown" }));
    assert!(!service.session().is_logged_in());
    assert!(service.session().current_user().is_none());
}

#[tokio::test]
async fn test_login_status_adopts_connected_token() {
    let service = create_service(None);
    service.sdk.mock(
        "getLoginStatus",
        json!({ "status": "connected", "authResponse": { "accessToken": "s1" } }),
    );

    let status = service.get_login_status().await.unwrap();

    assert_eq!(status["status"], "connected");
    assert!(service.session().login_status_fetched());
    assert_eq!(service.session().access_token().as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_login_status_not_connected_keeps_token() {
    let service = create_service(Some("server"));
    service
        .sdk
        .mock("getLoginStatus", json!({ "status": "not_authorized" }));

    service.get_login_status().await.unwrap();

    assert_eq!(service.session().access_token().as_deref(), Some("server"));
}

// =========================================================
// get_current_user
// =========================================================

#[tokio::test]
async fn test_current_user_without_token_is_none() {
    let service = create_service(None);

    let user = service.get_current_user().await.unwrap();

    assert!(user.is_none());
    assert!(service.sdk.call_keys().is_empty());
}

#[tokio::test]
async fn test_current_user_is_normalized() {
    let service = create_service(Some("tok"));
    service.sdk.mock(
        "/me",
        json!({
            "id": "1001",
            "link": "https://facebook.com/1001",
            "picture": { "data": { "url": "https://cdn/p.jpg" } }
        }),
    );

    let user = service.get_current_user().await.unwrap().unwrap();

    assert_eq!(
        user,
        FacebookUser {
            id: "1001".to_string(),
            link: Some("https://facebook.com/1001".to_string()),
            picture_url: Some("https://cdn/p.jpg".to_string()),
        }
    );
    assert_eq!(service.session().current_user(), Some(user));

    let calls = service.sdk.calls.borrow();
    assert_eq!(calls[0].1, json!({ "fields": "link,picture" }));
}

#[tokio::test]
async fn test_current_user_sdk_error_carries_payload() {
    let service = create_service(Some("tok"));
    service
        .sdk
        .mock("/me", json!({ "error": { "message": "denied" } }));

    let err = service.get_current_user().await.unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::SdkError);
    assert_eq!(err.payload(), Some(&json!({ "message": "denied" })));
    assert!(service.session().current_user().is_none());
}

#[tokio::test]
async fn test_current_user_numeric_id() {
    let service = create_service(Some("tok"));
    service.sdk.mock("/me", json!({ "id": 7 }));

    let user = service.get_current_user().await.unwrap().unwrap();

    assert_eq!(user.id, "7");
    assert_eq!(user.picture_url, None);
}

// =========================================================
// picture / friends
// =========================================================

#[tokio::test]
async fn test_profile_picture_url() {
    let service = create_service(Some("tok"));
    service
        .sdk
        .mock("/55/picture", json!({ "data": { "url": "https://cdn/55.jpg" } }));

    let url = service.get_profile_picture_url("55").await.unwrap();

    assert_eq!(url, "https://cdn/55.jpg");
}

#[tokio::test]
async fn test_profile_picture_error_is_null_failure() {
    let service = create_service(Some("tok"));
    service
        .sdk
        .mock("/55/picture", json!({ "error": { "code": 100 } }));

    let err = service.get_profile_picture_url("55").await.unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::NullFailure);
    assert!(err.payload().is_none());
}

#[tokio::test]
async fn test_friends_reads_data_url_field() {
    let service = create_service(Some("tok"));
    service
        .sdk
        .mock("/55/friends", json!({ "data": [{ "id": "9" }] }));

    let result = service.get_friends("55").await.unwrap();

    assert_eq!(result, None);
    assert_eq!(service.sdk.call_keys(), vec!["/55/friends"]);
}

// =========================================================
// 回调生命周期
// =========================================================

#[tokio::test]
async fn test_dropped_callback_is_null_failure() {
    let service = create_service(None);
    service.sdk.mode.set(CallbackMode::Drop);

    let err = service.logout().await.unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::NullFailure);
}

#[test]
fn test_held_callback_stays_pending() {
    let service = create_service(None);
    service.sdk.mode.set(CallbackMode::Hold);

    let waker = futures::task::noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut fut = service.login();

    assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
    assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
    assert_eq!(service.sdk.held.borrow().len(), 1);
}
