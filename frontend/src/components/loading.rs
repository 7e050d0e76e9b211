use leptos::prelude::*;

use crate::services::use_services;

/// 全局加载指示器
///
/// 订阅挂起请求计数，大于 0 时显示。
#[component]
pub fn LoadingIndicator() -> impl IntoView {
    let pending = use_services().pending();
    let (count, set_count) = signal(pending.count());
    pending.subscribe(move |n| {
        let _ = set_count.try_set(n);
    });

    view! {
        <Show when=move || { count.get() > 0 }>
            <div class="fixed top-0 inset-x-0 z-50">
                <progress class="progress progress-primary w-full h-1"></progress>
            </div>
        </Show>
    }
}
