//! 资源客户端
//!
//! 面向两类资源（账户、商品）以及登录/注册的类型化 HTTP 封装。
//! 会话存在时，每个请求都会附带 `Authorization: Bearer <token>`。

use std::rc::Rc;

use leptos::prelude::*;
use manaibay_shared::protocol::{
    LoginRequest, LoginResponse, PATH_LOGIN, PATH_REGISTER, RegisterRequest, Resource,
    ResourceKind,
};
use manaibay_shared::{EntityId, HEADER_AUTHORIZATION, Session};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::web::{FetchClient, HttpClient, HttpMethod, HttpRequest, HttpResponse};

#[cfg(test)]
mod tests;

pub struct ApiClient<C> {
    http: Rc<C>,
    base_url: String,
    accounts_path: String,
    session: SessionStore,
}

// 手动实现以避免对 C 施加 Clone 约束
impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            accounts_path: self.accounts_path.clone(),
            session: self.session.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(http: C, config: &AppConfig, session: SessionStore) -> Self {
        Self {
            http: Rc::new(http),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            accounts_path: config.accounts_path.clone(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn collection_path(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Accounts => &self.accounts_path,
            ResourceKind::Products => kind.default_path(),
        }
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        self.url(self.collection_path(kind))
    }

    fn entity_url(&self, kind: ResourceKind, id: &EntityId) -> String {
        format!("{}{}", self.collection_url(kind), id)
    }

    /// 认证头：有会话时附加 Bearer 令牌，否则不带认证
    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.session.current_session() {
            Some(session) => req.with_header(HEADER_AUTHORIZATION, &session.bearer()),
            None => req,
        }
    }

    async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let req = self.authorize(req);
        let method = req.method.as_str();
        let url = req.url.clone();
        tracing::debug!(method, %url, "sending request");

        let res = self.http.send(req).await.inspect_err(|e| {
            tracing::warn!(method, %url, error = %e, "request failed before a response");
        })?;

        if !res.ok() {
            let err = ApiError::from_response(res.status, &res.body);
            tracing::warn!(method, %url, status = res.status, error = %err, "request rejected");
            return Err(err);
        }
        Ok(res)
    }

    async fn execute_json<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        self.execute(req).await?.json::<T>()
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 登录并写入会话存储
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let req = HttpRequest::new(self.url(PATH_LOGIN), HttpMethod::Post).with_json(&body)?;
        let session = self
            .execute_json::<LoginResponse>(req)
            .await?
            .into_session();

        self.session
            .set_session(session.token.clone(), session.role);
        Ok(session)
    }

    /// 注册新用户；成功后不会自动登录
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        let req = HttpRequest::new(self.url(PATH_REGISTER), HttpMethod::Post).with_json(request)?;
        self.execute(req).await?;
        tracing::info!("registration accepted");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.clear_session();
    }

    // =========================================================
    // 资源 CRUD
    // =========================================================

    pub async fn list<R: Resource>(&self) -> ApiResult<Vec<R::Entity>> {
        let req = HttpRequest::new(self.collection_url(R::KIND), HttpMethod::Get);
        let items = self.execute_json::<Vec<R::Entity>>(req).await?;
        tracing::debug!(kind = R::KIND.label(), count = items.len(), "collection loaded");
        Ok(items)
    }

    pub async fn get<R: Resource>(&self, id: &EntityId) -> ApiResult<R::Entity> {
        let req = HttpRequest::new(self.entity_url(R::KIND, id), HttpMethod::Get);
        self.execute_json(req).await
    }

    pub async fn create<R: Resource>(&self, fields: &R::Fields) -> ApiResult<R::Entity> {
        let req = HttpRequest::new(self.collection_url(R::KIND), HttpMethod::Post).with_json(fields)?;
        let created: R::Entity = self.execute_json(req).await?;
        tracing::info!(kind = R::KIND.label(), id = %R::id(&created), "created");
        Ok(created)
    }

    pub async fn update<R: Resource>(
        &self,
        id: &EntityId,
        fields: &R::Fields,
    ) -> ApiResult<R::Entity> {
        let req = HttpRequest::new(self.entity_url(R::KIND, id), HttpMethod::Put).with_json(fields)?;
        let updated = self.execute_json(req).await?;
        tracing::info!(kind = R::KIND.label(), %id, "updated");
        Ok(updated)
    }

    pub async fn delete<R: Resource>(&self, id: &EntityId) -> ApiResult<()> {
        let req = HttpRequest::new(self.entity_url(R::KIND, id), HttpMethod::Delete);
        self.execute(req).await?;
        tracing::info!(kind = R::KIND.label(), %id, "deleted");
        Ok(())
    }
}

// =========================================================
// 组件层上下文
// =========================================================

/// 浏览器中使用的客户端
pub type WebApi = ApiClient<FetchClient>;

/// 客户端句柄；客户端内部持有 Rc，因此以本地存储方式挂载
#[derive(Clone, Copy)]
pub struct ApiContext(StoredValue<WebApi, LocalStorage>);

impl ApiContext {
    pub fn client(&self) -> WebApi {
        self.0.get_value()
    }
}

pub fn provide_api(api: WebApi) {
    provide_context(ApiContext(StoredValue::new_local(api)));
}

/// 从 Context 获取资源客户端句柄（Copy，可在视图闭包间自由传递）
pub fn use_api() -> ApiContext {
    use_context::<ApiContext>().expect("ApiContext should be provided")
}
