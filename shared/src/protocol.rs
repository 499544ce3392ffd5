use crate::{Account, AccountFields, EntityId, Product, ProductFields, Role, Session};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

// =========================================================
// 资源类型 (Resource Kinds)
// =========================================================

pub const PATH_LOGIN: &str = "/login";
pub const PATH_REGISTER: &str = "/register";
pub const PATH_CLIENTS: &str = "/clients/";
pub const PATH_USERS: &str = "/users/";
pub const PATH_PRODUCTS: &str = "/products/";

/// 运行时的资源类别，用于路径解析和日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Accounts,
    Products,
}

impl ResourceKind {
    /// 默认集合路径（带结尾斜杠，与后端路由一致）
    pub fn default_path(&self) -> &'static str {
        match self {
            ResourceKind::Accounts => PATH_CLIENTS,
            ResourceKind::Products => PATH_PRODUCTS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Accounts => "account",
            ResourceKind::Products => "product",
        }
    }
}

/// 定义一类远端资源的实体、请求体以及检索规则
pub trait Resource: 'static {
    type Entity: Serialize + DeserializeOwned + Clone + PartialEq + 'static;
    type Fields: Serialize + DeserializeOwned + Clone + PartialEq + 'static;

    const KIND: ResourceKind;

    fn id(entity: &Self::Entity) -> &EntityId;

    /// 客户端检索：`needle` 已转为小写且非空
    fn matches(entity: &Self::Entity, needle: &str) -> bool;
}

pub struct Accounts;

impl Resource for Accounts {
    type Entity = Account;
    type Fields = AccountFields;

    const KIND: ResourceKind = ResourceKind::Accounts;

    fn id(entity: &Account) -> &EntityId {
        &entity.id
    }

    fn matches(entity: &Account, needle: &str) -> bool {
        entity.display_name().to_lowercase().contains(needle)
            || entity.email.to_lowercase().contains(needle)
    }
}

pub struct Products;

impl Resource for Products {
    type Entity = Product;
    type Fields = ProductFields;

    const KIND: ResourceKind = ResourceKind::Products;

    fn id(entity: &Product) -> &EntityId {
        &entity.id
    }

    fn matches(entity: &Product, needle: &str) -> bool {
        entity.title.to_lowercase().contains(needle)
            || entity.description.to_lowercase().contains(needle)
    }
}

// =========================================================
// 认证请求 (Auth Requests)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// 早期后端不返回角色
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        let role = self
            .role
            .as_deref()
            .map(Role::from_wire)
            .unwrap_or_default();
        Session::new(self.access_token, role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

// =========================================================
// 错误响应 (Error Payloads)
// =========================================================

/// FastAPI 风格的错误体：`{"detail": "..."}` 或 `{"detail": [{"msg": "..."}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

impl ErrorBody {
    /// 从响应体中提取可展示的错误信息；无法识别时返回 None
    pub fn parse(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let message = match parsed.detail {
            ErrorDetail::Message(msg) => msg,
            ErrorDetail::Items(items) => items
                .into_iter()
                .map(|item| item.msg)
                .collect::<Vec<_>>()
                .join("; "),
        };
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}
