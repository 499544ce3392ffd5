use crate::api::use_api;
use crate::cart::use_cart;
use crate::components::icons::{LogOut, ShoppingCart, Store};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 已登录界面的外壳：导航栏 + 页面内容
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let cart = use_cart();
    let router = use_router();

    let cart_count = move || cart.with(|c| c.len());
    let tab_class = move |route: AppRoute| {
        move || {
            if router.current_route().get() == route {
                "btn btn-ghost btn-active"
            } else {
                "btn btn-ghost"
            }
        }
    };

    let on_logout = move |_| {
        cart.update(|c| c.clear());
        api.client().logout();
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Store attr:class="text-primary h-6 w-6" />
                        <span class="text-xl font-bold px-2">"ManaiBay"</span>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || session.role().map(|r| r.as_str()).unwrap_or_default()}
                        </span>
                    </div>
                    <div class="flex-none gap-2">
                        <Show when=move || session.is_admin()>
                            <Link to="/accounts">
                                <span class=tab_class(AppRoute::Accounts)>"Accounts"</span>
                            </Link>
                        </Show>
                        <Link to="/products">
                            <span class=tab_class(AppRoute::Products)>"Products"</span>
                        </Link>
                        <Link to="/cart">
                            <span class=tab_class(AppRoute::Cart)>
                                <ShoppingCart attr:class="h-4 w-4" />
                                <span class="badge badge-sm badge-primary">{cart_count}</span>
                            </span>
                        </Link>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Log out"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}
