use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod protocol;
pub mod validation;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STANDARD: &str = "standard";

// =========================================================
// 标识符 (Identifiers)
// =========================================================

/// 服务端分配的实体 ID
///
/// 线上可能是 UUID 字符串，也可能是整数，客户端统一按不透明字符串处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
        })
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 会话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    #[default]
    Standard,
}

impl Role {
    /// 从线上/存储中的字符串解析角色
    ///
    /// 只有 `admin`（大小写不敏感）被视为管理员，其余一律为普通用户。
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(ROLE_ADMIN) {
            Role::Admin
        } else {
            Role::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Standard => ROLE_STANDARD,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_wire(&raw))
    }
}

/// 已认证的身份：令牌 + 角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 账户 / 客户记录
///
/// 早期 API 只有 `name` + `email`，后期的 `/users/` 变体带有拆分的姓名及联系方式，
/// 因此除 `id` 外所有字段都允许缺省。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Account {
    /// 用于列表展示的名称：`name` 优先，其次是 `first_name last_name`，最后回落到邮箱
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }

        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }

    /// 只有 `first_name` / `last_name` 而没有 `name` 的账户（`/users/` 变体）
    pub fn has_split_name(&self) -> bool {
        let has_name = self.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        !has_name && (self.first_name.is_some() || self.last_name.is_some())
    }

    /// 提取可编辑字段（用于表单回填），保留实体原有的姓名格式
    pub fn fields(&self) -> AccountFields {
        let (name, first_name, last_name) = if self.has_split_name() {
            (String::new(), self.first_name.clone(), self.last_name.clone())
        } else {
            (self.display_name(), None, None)
        };
        AccountFields {
            name,
            first_name,
            last_name,
            email: self.email.clone(),
            phone: self.phone.clone(),
            location: self.location.clone(),
        }
    }
}

/// 账户创建 / 更新请求体
///
/// 姓名二选一：`name`，或 `first_name` + `last_name`。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountFields {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AccountFields {
    pub fn is_split(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    /// 表单中展示的完整姓名
    pub fn full_name(&self) -> String {
        if !self.is_split() {
            return self.name.clone();
        }
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 把完整姓名拆成 `first_name` 与 `last_name`：第一个词为名，其余为姓
    pub fn split_name(mut self) -> Self {
        let full = std::mem::take(&mut self.name);
        let mut parts = full.trim().splitn(2, char::is_whitespace);
        self.first_name = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
        self.last_name = parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        self
    }
}

/// 商品评价
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user: String,
    /// 1-5 星
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// 评分的算术平均值；没有评价时为 0
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(sum) / reviews.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 线上为数字，客户端展示时格式化为字符串
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// base64 图片内容（后期 API 变体）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    pub fn average_rating(&self) -> f64 {
        average_rating(&self.reviews)
    }

    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// `<img src>` 的值：优先使用内嵌的 base64 数据
    pub fn image_src(&self) -> Option<String> {
        match self.image_data.as_deref().filter(|d| !d.is_empty()) {
            Some(data) => Some(format!("data:image/png;base64,{}", data)),
            None => self.image.clone().filter(|url| !url.is_empty()),
        }
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            image: self.image.clone(),
            image_data: self.image_data.clone(),
        }
    }
}

/// 商品创建 / 更新请求体
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review(rating: u8) -> Review {
        Review {
            user: "alice".into(),
            rating,
            comment: String::new(),
        }
    }

    #[test]
    fn average_rating_of_five_and_four_is_four_and_a_half() {
        assert_eq!(average_rating(&[review(5), review(4)]), 4.5);
    }

    #[test]
    fn split_name_accounts_keep_their_shape_when_edited() {
        let account: Account = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert!(account.has_split_name());

        let fields = account.fields();
        assert_eq!(fields.full_name(), "Ada Lovelace");
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({ "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" })
        );

        let renamed = AccountFields {
            name: "Ada King Lovelace".into(),
            ..fields
        }
        .split_name();
        assert_eq!(renamed.first_name.as_deref(), Some("Ada"));
        assert_eq!(renamed.last_name.as_deref(), Some("King Lovelace"));
        assert_eq!(renamed.name, "");
    }

    #[test]
    fn named_accounts_edit_through_name() {
        let account: Account = serde_json::from_value(json!({
            "id": "a1",
            "name": "Grace Hopper",
            "email": "grace@navy.mil"
        }))
        .unwrap();
        let fields = account.fields();
        assert!(!fields.is_split());
        assert_eq!(fields.full_name(), "Grace Hopper");
    }

    #[test]
    fn average_rating_without_reviews_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn entity_id_accepts_strings_and_integers() {
        let a: EntityId = serde_json::from_value(json!("5f0c")).unwrap();
        let b: EntityId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(a.as_str(), "5f0c");
        assert_eq!(b.as_str(), "42");
    }

    #[test]
    fn role_parsing_only_promotes_admin() {
        assert_eq!(Role::from_wire("admin"), Role::Admin);
        assert_eq!(Role::from_wire(" ADMIN "), Role::Admin);
        assert_eq!(Role::from_wire("user"), Role::Standard);
        assert_eq!(Role::from_wire(""), Role::Standard);
    }

    #[test]
    fn product_decodes_numeric_price_and_missing_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "title": "Lamp",
            "price": 19.5
        }))
        .unwrap();

        assert_eq!(product.id, EntityId::from("7"));
        assert_eq!(product.display_price(), "$19.50");
        assert!(product.reviews.is_empty());
        assert_eq!(product.image_src(), None);
    }

    #[test]
    fn product_fields_serialize_price_as_number() {
        let fields = ProductFields {
            title: "Lamp".into(),
            price: Decimal::new(1950, 2),
            ..Default::default()
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["price"], json!(19.5));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn image_data_takes_precedence_over_url() {
        let product = Product {
            id: EntityId::from("1"),
            title: "Mug".into(),
            description: String::new(),
            price: Decimal::ZERO,
            image: Some("https://cdn/mug.png".into()),
            image_data: Some("AAAA".into()),
            reviews: vec![],
        };
        assert_eq!(
            product.image_src().as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn account_display_name_falls_back_to_split_name_then_email() {
        let mut account: Account = serde_json::from_value(json!({
            "id": "u1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(account.display_name(), "Ada Lovelace");

        account.first_name = None;
        account.last_name = None;
        assert_eq!(account.display_name(), "ada@example.com");

        account.name = Some("Countess".into());
        assert_eq!(account.display_name(), "Countess");
    }
}
