//! ManaiBay 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（订阅/通知 + 本地持久化）
//! - `api`: 资源客户端（账户、商品、登录注册）
//! - `sync`: 列表/详情的加载状态与请求票据
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `components`: UI 组件层

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod session;
pub mod sync;

mod components {
    pub mod accounts;
    pub mod cart_page;
    mod icons;
    pub mod login;
    mod pagination;
    mod product_dialog;
    pub mod product_detail;
    pub mod products;
    mod register;
    pub mod shell;
    pub mod toast;
}

// 浏览器 API 封装模块
// 对 fetch / LocalStorage / History 的轻量封装；
// 路由定义、存储抽象与传输抽象不依赖 DOM，可在本机测试。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchClient, HttpClient, HttpMethod, HttpRequest, HttpResponse};
    pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage};

    #[cfg(test)]
    pub use http::mock::MockHttpClient;
}

use crate::api::{ApiClient, provide_api};
use crate::cart::provide_cart;
use crate::components::accounts::AccountsPage;
use crate::components::cart_page::CartPage;
use crate::components::login::AuthPage;
use crate::components::product_detail::ProductDetailPage;
use crate::components::products::ProductsPage;
use crate::components::shell::Shell;
use crate::components::toast::{Toast, provide_toast};
use crate::config::AppConfig;
use crate::session::{SessionStore, provide_session};
use crate::web::{BrowserStorage, FetchClient};

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件；已登录页面统一包在 `Shell` 中。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Auth => view! { <AuthPage /> }.into_any(),
        AppRoute::Accounts => view! { <Shell><AccountsPage /></Shell> }.into_any(),
        AppRoute::Products => view! { <Shell><ProductsPage /></Shell> }.into_any(),
        AppRoute::ProductDetail(id) => {
            view! { <Shell><ProductDetailPage id=id /></Shell> }.into_any()
        }
        AppRoute::Cart => view! { <Shell><CartPage /></Shell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-link">"Go home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // 1. 从本地存储恢复会话，并提供会话上下文
    let store = SessionStore::restore(BrowserStorage);
    let session = provide_session(store.clone());

    // 2. 资源客户端与会话存储共享同一份状态
    provide_api(ApiClient::new(FetchClient, &config, store));
    provide_cart();
    provide_toast();

    tracing::info!(
        api = %config.api_base_url,
        accounts = %config.accounts_path,
        "application started"
    );

    view! {
        // 3. 路由器组件：注入会话信号实现守卫
        <Router session=session.session_signal()>
            <Toast />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
