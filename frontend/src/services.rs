//! 应用服务
//!
//! 启动时创建一次：会话、挂起计数、带拦截管线的 HTTP 客户端、认证适配器。
//! 这些类型基于 `Rc`，因此以本地 StoredValue 的形式放入 Context。

use std::rc::Rc;

use hadithhouse::{
    AppContext, Bootstrap, FacebookService, HadithHouseApi, InterceptedClient,
    PendingRequestsView, Session,
};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;

use crate::web::{FetchHttpClient, JsFacebookSdk};

pub type ApiClient = InterceptedClient<FetchHttpClient>;
pub type Facebook = FacebookService<JsFacebookSdk>;

struct AppServices {
    bootstrap: Bootstrap,
    session: Session,
    pending: PendingRequestsView,
    client: Rc<ApiClient>,
    facebook: Rc<Facebook>,
}

#[derive(Clone, Copy)]
pub struct Services(StoredValue<AppServices, LocalStorage>);

impl Services {
    pub fn new(bootstrap: Bootstrap) -> Self {
        let ctx = AppContext::bootstrap(&bootstrap);
        let services = AppServices {
            session: ctx.session.clone(),
            pending: ctx.pending.view(),
            client: Rc::new(ctx.intercepted(FetchHttpClient)),
            facebook: Rc::new(ctx.facebook(JsFacebookSdk)),
            bootstrap,
        };
        Self(StoredValue::new_local(services))
    }

    pub fn client(&self) -> Rc<ApiClient> {
        self.0.with_value(|s| s.client.clone())
    }

    pub fn api(&self) -> HadithHouseApi<Rc<ApiClient>> {
        HadithHouseApi::new(self.client())
    }

    pub fn facebook(&self) -> Rc<Facebook> {
        self.0.with_value(|s| s.facebook.clone())
    }

    pub fn session(&self) -> Session {
        self.0.with_value(|s| s.session.clone())
    }

    pub fn pending(&self) -> PendingRequestsView {
        self.0.with_value(|s| s.pending.clone())
    }

    pub fn template_url(&self, template: &str) -> String {
        self.0.with_value(|s| s.bootstrap.template_url(template))
    }
}

pub fn use_services() -> Services {
    use_context::<Services>().expect("Services should be provided")
}
