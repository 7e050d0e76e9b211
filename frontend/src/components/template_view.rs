use hadithhouse::{HttpClient, HttpRequest, ResolvedRoute};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::services::use_services;

/// 加载路由对应的模板并注入到页面
///
/// 模板请求经过拦截管线，因此会驱动加载指示器。
#[component]
pub fn TemplateView(route: ResolvedRoute) -> impl IntoView {
    let services = use_services();
    let (html, set_html) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);

    let url = services.template_url(route.template());
    let client = services.client();
    spawn_local(async move {
        match client.send(HttpRequest::get(&url)).await {
            Ok(resp) => {
                let _ = set_html.try_set(resp.body);
            }
            Err(e) => {
                hadithhouse::log_error!("[Router] failed to load template {}: {}", url, e);
                let _ = set_error.try_set(Some(e.to_string()));
            }
        }
    });

    let params = route
        .params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    view! {
        <section data-controller=route.controller() data-params=params class="p-4">
            <Show when=move || error.get().is_some()>
                <div role="alert" class="alert alert-error">
                    {move || error.get().unwrap_or_default()}
                </div>
            </Show>
            <div inner_html=move || html.get()></div>
        </section>
    }
}
