use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, logout, use_auth};
use crate::services::use_services;

/// 新增圣训所需的 Django 权限
const ADD_HADITH_PERMISSION: &str = "add_hadith";

#[component]
pub fn AuthBar() -> impl IntoView {
    let services = use_services();
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in_signal();
    let is_busy = move || auth.state.get().is_busy;
    let fetched = move || auth.state.get().fetched_login_status;

    let on_login = move |_| {
        spawn_local(async move {
            login(&auth, services).await;
        });
    };

    let on_logout = move |_| {
        spawn_local(async move {
            logout(&auth, services).await;
        });
    };

    let profile_link = move || {
        auth.state
            .get()
            .fb_user
            .and_then(|u| u.link)
            .unwrap_or_default()
    };
    let picture_url = move || {
        auth.state
            .get()
            .fb_user
            .and_then(|u| u.picture_url)
            .unwrap_or_default()
    };
    // 权限存于会话中，读取 state 以便 app_user 变化时重新计算
    let can_add_hadith = move || {
        auth.state.track();
        services.session().has_permission(ADD_HADITH_PERMISSION)
    };
    let display_name = move || {
        auth.state
            .get()
            .app_user
            .map(|u| format!("{} {}", u.first_name, u.last_name).trim().to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="navbar bg-base-100 shadow">
            <div class="flex-1">
                <a class="text-xl font-bold" href="/hadiths">"Hadith House"</a>
            </div>
            <Show when=move || auth.state.get().error.is_some()>
                <span class="text-error text-sm mr-2">
                    {move || auth.state.get().error.unwrap_or_default()}
                </span>
            </Show>
            <Show
                when=fetched
                fallback=|| view! { <span class="loading loading-spinner loading-sm"></span> }
            >
                <Show
                    when=move || is_logged_in.get()
                    fallback=move || {
                        view! {
                            <button class="btn btn-primary btn-sm" disabled=is_busy on:click=on_login>
                                "Login with Facebook"
                            </button>
                        }
                    }
                >
                    <Show when=can_add_hadith>
                        <a class="btn btn-outline btn-sm mr-2" href="/hadith/new">"Add hadith"</a>
                    </Show>
                    <span class="mr-2 text-sm">{display_name}</span>
                    <a href=profile_link target="_blank">
                        <img class="w-8 h-8 rounded-full" src=picture_url />
                    </a>
                    <button class="btn btn-ghost btn-sm" disabled=is_busy on:click=on_logout>
                        "Logout"
                    </button>
                </Show>
            </Show>
        </div>
    }
}
