//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、顶层界面的选择规则以及导航守卫。

use manaibay_shared::{EntityId, Session};
use std::fmt::Display;

const PRODUCTS_PREFIX: &str = "/products/";

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录/注册页面 (默认路由)
    #[default]
    Auth,
    /// 账户管理 (仅管理员)
    Accounts,
    /// 商品列表
    Products,
    /// 商品详情
    ProductDetail(EntityId),
    /// 购物车
    Cart,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/login" => Self::Auth,
            "/accounts" => Self::Accounts,
            "/products" => Self::Products,
            "/cart" => Self::Cart,
            other => match other.strip_prefix(PRODUCTS_PREFIX) {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::ProductDetail(EntityId::from(id))
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Auth => "/".to_string(),
            Self::Accounts => "/accounts".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("{}{}", PRODUCTS_PREFIX, id),
            Self::Cart => "/cart".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Accounts | Self::Products | Self::ProductDetail(_) | Self::Cart
        )
    }

    /// 该路由是否仅对管理员开放
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Accounts)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 顶层界面选择
// =========================================================

/// 顶层界面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Auth,
    Accounts,
    Products,
}

impl Surface {
    /// 根据会话决定挂载哪个顶层界面
    pub fn gate(session: Option<&Session>) -> Self {
        match session {
            None => Self::Auth,
            Some(s) if s.role.is_admin() => Self::Accounts,
            Some(_) => Self::Products,
        }
    }

    /// 界面对应的落地路由
    pub fn route(&self) -> AppRoute {
        match self {
            Self::Auth => AppRoute::Auth,
            Self::Accounts => AppRoute::Accounts,
            Self::Products => AppRoute::Products,
        }
    }
}

/// **核心守卫逻辑**：给定目标路由和当前会话，返回实际应进入的路由
///
/// 返回值与 `target` 不同即表示发生了重定向。
pub fn guard(target: AppRoute, session: Option<&Session>) -> AppRoute {
    let Some(session) = session else {
        return if target.requires_auth() {
            AppRoute::Auth
        } else {
            target
        };
    };

    match target {
        AppRoute::Auth => Surface::gate(Some(session)).route(),
        route if route.requires_admin() && !session.role.is_admin() => AppRoute::Products,
        route => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manaibay_shared::Role;

    fn admin() -> Session {
        Session::new("t1", Role::Admin)
    }

    fn standard() -> Session {
        Session::new("t2", Role::Standard)
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Auth);
        assert_eq!(AppRoute::from_path("/accounts"), AppRoute::Accounts);
        assert_eq!(AppRoute::from_path("/products/"), AppRoute::Products);
        assert_eq!(AppRoute::from_path("/cart"), AppRoute::Cart);
        assert_eq!(
            AppRoute::from_path("/products/42"),
            AppRoute::ProductDetail(EntityId::from("42"))
        );
        assert_eq!(AppRoute::from_path("/products/42/edit"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn paths_parse_back_to_the_same_route() {
        let routes = [
            AppRoute::Auth,
            AppRoute::Accounts,
            AppRoute::Products,
            AppRoute::ProductDetail(EntityId::from("abc")),
            AppRoute::Cart,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn gate_picks_surface_from_session() {
        assert_eq!(Surface::gate(None), Surface::Auth);
        assert_eq!(Surface::gate(Some(&admin())), Surface::Accounts);
        assert_eq!(Surface::gate(Some(&standard())), Surface::Products);
    }

    #[test]
    fn anonymous_users_only_reach_public_routes() {
        assert_eq!(guard(AppRoute::Accounts, None), AppRoute::Auth);
        assert_eq!(guard(AppRoute::Cart, None), AppRoute::Auth);
        assert_eq!(
            guard(AppRoute::ProductDetail(EntityId::from("1")), None),
            AppRoute::Auth
        );
        assert_eq!(guard(AppRoute::Auth, None), AppRoute::Auth);
        assert_eq!(guard(AppRoute::NotFound, None), AppRoute::NotFound);
    }

    #[test]
    fn authenticated_users_leave_the_auth_page() {
        assert_eq!(guard(AppRoute::Auth, Some(&admin())), AppRoute::Accounts);
        assert_eq!(guard(AppRoute::Auth, Some(&standard())), AppRoute::Products);
    }

    #[test]
    fn account_management_is_admin_only() {
        assert_eq!(guard(AppRoute::Accounts, Some(&admin())), AppRoute::Accounts);
        assert_eq!(
            guard(AppRoute::Accounts, Some(&standard())),
            AppRoute::Products
        );
        // 管理员也可以浏览商品
        assert_eq!(guard(AppRoute::Cart, Some(&admin())), AppRoute::Cart);
    }
}
