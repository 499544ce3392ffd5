//! 表单状态管理模块
//!
//! 将零散的 signal 整合为表单状态结构体，负责：
//! - 数据的持有
//! - 从实体回填（编辑模式）与重置（创建模式）
//! - 校验并转换为请求体

use leptos::prelude::*;
use manaibay_shared::protocol::{RegisterRequest, Resource};
use manaibay_shared::validation::{ValidationError, parse_price};
use manaibay_shared::{Account, AccountFields, EntityId, Product, ProductFields};

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::web::HttpClient;

/// 表单模式：创建新实体，或编辑已有实体
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(EntityId),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Update",
        }
    }
}

/// 按模式提交：创建走 `create`，编辑走 `update`
pub async fn submit<R: Resource, C: HttpClient>(
    api: &ApiClient<C>,
    mode: &FormMode,
    fields: &R::Fields,
) -> ApiResult<R::Entity> {
    match mode {
        FormMode::Create => api.create::<R>(fields).await,
        FormMode::Edit(id) => api.update::<R>(id, fields).await,
    }
}

fn require(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =========================================================
// 账户表单
// =========================================================

/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct AccountFormState {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub location: RwSignal<String>,
    /// 被编辑的账户使用 `first_name` / `last_name`
    split_name: RwSignal<bool>,
}

impl AccountFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
            split_name: RwSignal::new(false),
        }
    }

    /// 用实体回填
    pub fn seed(&self, account: &Account) {
        let fields = account.fields();
        self.name.set(fields.full_name());
        self.split_name.set(fields.is_split());
        self.email.set(fields.email);
        self.phone.set(fields.phone.unwrap_or_default());
        self.location.set(fields.location.unwrap_or_default());
    }

    pub fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.phone.set(String::new());
        self.location.set(String::new());
        self.split_name.set(false);
    }

    pub fn to_fields(&self) -> Result<AccountFields, ValidationError> {
        let mut fields = AccountFields {
            name: self.name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            phone: optional(self.phone.get_untracked()),
            location: optional(self.location.get_untracked()),
            ..Default::default()
        };
        fields.validate()?;
        if self.split_name.get_untracked() {
            fields = fields.split_name();
        }
        Ok(fields)
    }
}

impl Default for AccountFormState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 商品表单
// =========================================================

#[derive(Clone, Copy)]
pub struct ProductFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub price: RwSignal<String>,
    pub image: RwSignal<String>,
    /// 编辑时保留已有的内嵌图片
    image_data: RwSignal<Option<String>>,
}

impl ProductFormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            image: RwSignal::new(String::new()),
            image_data: RwSignal::new(None),
        }
    }

    pub fn seed(&self, product: &Product) {
        self.title.set(product.title.clone());
        self.description.set(product.description.clone());
        self.price.set(product.price.to_string());
        self.image.set(product.image.clone().unwrap_or_default());
        self.image_data.set(product.image_data.clone());
    }

    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.price.set(String::new());
        self.image.set(String::new());
        self.image_data.set(None);
    }

    pub fn to_fields(&self) -> Result<ProductFields, ValidationError> {
        // 价格输入是原始文本，解析前先确认非空
        let price = self.price.get_untracked();
        require(&[price.clone()])?;

        let fields = ProductFields {
            title: self.title.get_untracked().trim().to_string(),
            description: self.description.get_untracked().trim().to_string(),
            price: parse_price(&price)?,
            image: optional(self.image.get_untracked()),
            image_data: self.image_data.get_untracked(),
        };
        fields.validate()?;
        Ok(fields)
    }
}

impl Default for ProductFormState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 注册表单
// =========================================================

#[derive(Clone, Copy)]
pub struct RegisterFormState {
    pub first_name: RwSignal<String>,
    pub last_name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub location: RwSignal<String>,
}

impl RegisterFormState {
    pub fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        for field in [
            self.first_name,
            self.last_name,
            self.email,
            self.password,
            self.phone,
            self.location,
        ] {
            field.set(String::new());
        }
    }

    /// 校验通过后生成注册请求（密码保持原样，其余字段去除首尾空白）
    pub fn to_request(&self) -> Result<RegisterRequest, ValidationError> {
        let request = RegisterRequest {
            first_name: self.first_name.get_untracked().trim().to_string(),
            last_name: self.last_name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
            phone: self.phone.get_untracked().trim().to_string(),
            location: self.location.get_untracked().trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }
}

impl Default for RegisterFormState {
    fn default() -> Self {
        Self::new()
    }
}
