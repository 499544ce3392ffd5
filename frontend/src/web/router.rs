//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 验证规则由 `route::guard` 决定。

use leptos::prelude::*;
use manaibay_shared::Session;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, guard};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话信号由外部注入，与会话存储解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Option<Session>>,
}

impl RouterService {
    fn new(session: Signal<Option<Session>>) -> Self {
        // 初始路由同样要经过守卫
        let requested = AppRoute::from_path(&current_path());
        let initial = session.with_untracked(|s| guard(requested.clone(), s.as_ref()));
        if initial != requested {
            replace_history_state(&initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        self.apply(target, true);
    }

    /// 对目标路由执行守卫并加载
    ///
    /// `use_push` 为 true 时使用 pushState，否则 replaceState；
    /// 发生重定向时总是 replace，避免在历史中留下被拒绝的条目。
    fn apply(&self, target: AppRoute, use_push: bool) {
        let resolved = self
            .session
            .with_untracked(|s| guard(target.clone(), s.as_ref()));

        if resolved != target {
            tracing::info!(from = %target, to = %resolved, "navigation redirected");
        } else {
            tracing::debug!(to = %resolved, "navigating");
        }

        let path = resolved.to_path();
        if use_push && resolved == target {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.apply(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时对当前路由重新执行守卫
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let session = router.session.get();
            let route = router.current_route.get_untracked();
            let resolved = guard(route.clone(), session.as_ref());

            if resolved != route {
                tracing::info!(
                    authenticated = session.is_some(),
                    to = %resolved,
                    "session changed, redirecting"
                );
                push_history_state(&resolved.to_path());
                router.set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Option<Session>>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Option<Session>>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击并交给路由服务
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
