use super::*;
use crate::web::{KeyValueStore, MemoryStorage, MockHttpClient};
use async_trait::async_trait;
use manaibay_shared::protocol::{Accounts, Products};
use manaibay_shared::{AccountFields, ProductFields, Role};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

const BASE: &str = "http://api.test";

// =========================================================
// 测试工具: 带内存存储的假后端
// =========================================================

/// 按集合保存 JSON 实体，行为与真实后端的 CRUD 路由一致
#[derive(Default)]
struct FakeApi {
    collections: RefCell<BTreeMap<String, BTreeMap<u64, Value>>>,
    next_id: Cell<u64>,
    requests: RefCell<Vec<HttpRequest>>,
}

fn respond(status: u16, body: Value) -> ApiResult<HttpResponse> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

fn not_found() -> ApiResult<HttpResponse> {
    respond(404, json!({ "detail": "Item not found" }))
}

#[async_trait(?Send)]
impl HttpClient for FakeApi {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        let path = req.url.strip_prefix(BASE).unwrap_or(&req.url);
        let Some((collection, raw_id)) = path.trim_start_matches('/').split_once('/') else {
            return not_found();
        };
        let body: Option<Value> = req
            .body
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let mut collections = self.collections.borrow_mut();
        let items = collections.entry(collection.to_string()).or_default();

        if raw_id.is_empty() {
            return match req.method {
                HttpMethod::Get => respond(200, Value::Array(items.values().cloned().collect())),
                HttpMethod::Post => {
                    let id = self.next_id.get() + 1;
                    self.next_id.set(id);
                    let mut entity = body.unwrap_or_else(|| json!({}));
                    entity["id"] = json!(id);
                    items.insert(id, entity.clone());
                    respond(201, entity)
                }
                _ => respond(405, json!({ "detail": "Method Not Allowed" })),
            };
        }

        let Ok(id) = raw_id.parse::<u64>() else {
            return not_found();
        };
        match req.method {
            HttpMethod::Get => match items.get(&id) {
                Some(entity) => respond(200, entity.clone()),
                None => not_found(),
            },
            HttpMethod::Put => match items.get_mut(&id) {
                Some(entity) => {
                    let mut updated = body.unwrap_or_else(|| json!({}));
                    updated["id"] = json!(id);
                    *entity = updated.clone();
                    respond(200, updated)
                }
                None => not_found(),
            },
            HttpMethod::Delete => match items.remove(&id) {
                Some(_) => respond(200, json!({ "message": "deleted" })),
                None => not_found(),
            },
            HttpMethod::Post => respond(405, json!({ "detail": "Method Not Allowed" })),
        }
    }
}

struct TestContext<C> {
    api: ApiClient<C>,
    storage: MemoryStorage,
}

impl<C: HttpClient> TestContext<C> {
    fn new(http: C) -> Self {
        Self::with_config(http, test_config())
    }

    fn with_config(http: C, config: AppConfig) -> Self {
        let storage = MemoryStorage::new();
        let session = SessionStore::restore(storage.clone());
        Self {
            api: ApiClient::new(http, &config, session),
            storage,
        }
    }

    fn http(&self) -> &C {
        &self.api.http
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        api_base_url: BASE.to_string(),
        ..AppConfig::default()
    }
}

fn lamp() -> ProductFields {
    ProductFields {
        title: "Desk Lamp".to_string(),
        description: "Warm white".to_string(),
        price: Decimal::new(1950, 2),
        image: Some("https://img.test/lamp.png".to_string()),
        image_data: None,
    }
}

// =========================================================
// CRUD
// =========================================================

#[tokio::test]
async fn created_entity_appears_in_list() {
    let ctx = TestContext::new(FakeApi::default());

    let created = ctx.api.create::<Products>(&lamp()).await.unwrap();
    let listed = ctx.api.list::<Products>().await.unwrap();

    assert!(listed.iter().any(|p| p.id == created.id));
    assert_eq!(created.title, "Desk Lamp");
    assert_eq!(created.display_price(), "$19.50");
}

#[tokio::test]
async fn update_then_get_round_trips_fields() {
    let ctx = TestContext::new(FakeApi::default());
    let created = ctx.api.create::<Products>(&lamp()).await.unwrap();

    let changed = ProductFields {
        title: "Floor Lamp".to_string(),
        price: Decimal::new(4200, 2),
        ..lamp()
    };
    ctx.api.update::<Products>(&created.id, &changed).await.unwrap();

    let fetched = ctx.api.get::<Products>(&created.id).await.unwrap();
    assert_eq!(fetched.fields(), changed);

    let last = ctx.http().requests.borrow().iter().rev().nth(1).cloned().unwrap();
    assert_eq!(last.method, HttpMethod::Put);
    assert_eq!(last.url, format!("{}/products/{}", BASE, created.id));
    assert_eq!(last.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn deleted_entity_is_not_found() {
    let ctx = TestContext::new(FakeApi::default());
    let created = ctx.api.create::<Products>(&lamp()).await.unwrap();

    ctx.api.delete::<Products>(&created.id).await.unwrap();

    let err = ctx.api.get::<Products>(&created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(ctx.api.list::<Products>().await.unwrap().is_empty());
}

#[tokio::test]
async fn accounts_use_configured_collection_path() {
    let config = AppConfig {
        accounts_path: "/users/".to_string(),
        ..test_config()
    };
    let ctx = TestContext::with_config(FakeApi::default(), config);

    let fields = AccountFields {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        location: Some("London".to_string()),
        ..Default::default()
    };
    let created = ctx.api.create::<Accounts>(&fields).await.unwrap();
    assert_eq!(created.fields(), fields);

    let urls: Vec<String> = ctx
        .http()
        .requests
        .borrow()
        .iter()
        .map(|r| r.url.clone())
        .collect();
    assert_eq!(urls, vec![format!("{}/users/", BASE)]);
}

// =========================================================
// 认证
// =========================================================

#[tokio::test]
async fn login_sets_session_and_authorizes_next_call() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/login", BASE),
        200,
        json!({ "access_token": "t1", "role": "admin", "token_type": "bearer" }),
    );
    mock.mock_response(HttpMethod::Get, &format!("{}/products/", BASE), 200, json!([]));
    let ctx = TestContext::new(mock);

    let session = ctx.api.login("a@b.com", "x").await.unwrap();
    assert_eq!(session, Session::new("t1", Role::Admin));
    assert_eq!(ctx.api.session().current_session(), Some(session));
    assert_eq!(
        ctx.storage.get(crate::session::STORAGE_TOKEN_KEY).as_deref(),
        Some("t1")
    );

    let login_req = ctx.http().last_request().unwrap();
    assert_eq!(login_req.header(HEADER_AUTHORIZATION), None);
    assert_eq!(
        serde_json::from_str::<Value>(login_req.body.as_deref().unwrap()).unwrap(),
        json!({ "email": "a@b.com", "password": "x" })
    );

    ctx.api.list::<Products>().await.unwrap();
    let next = ctx.http().last_request().unwrap();
    assert_eq!(next.header(HEADER_AUTHORIZATION), Some("Bearer t1"));
}

#[tokio::test]
async fn login_without_role_defaults_to_standard() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/login", BASE),
        200,
        json!({ "access_token": "t2" }),
    );
    let ctx = TestContext::new(mock);

    let session = ctx.api.login("u@b.com", "pw").await.unwrap();
    assert_eq!(session.role, Role::Standard);
}

#[tokio::test]
async fn rejected_login_leaves_session_empty() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/login", BASE),
        401,
        json!({ "detail": "Incorrect email or password" }),
    );
    let ctx = TestContext::new(mock);

    let err = ctx.api.login("a@b.com", "wrong").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Unauthorized {
            status: 401,
            message: "Incorrect email or password".to_string()
        }
    );
    assert_eq!(ctx.api.session().current_session(), None);
}

#[tokio::test]
async fn logout_drops_the_authorization_header() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, &format!("{}/products/", BASE), 200, json!([]));
    let ctx = TestContext::new(mock);
    ctx.api.session().set_session("t1", Role::Standard);

    ctx.api.logout();
    ctx.api.list::<Products>().await.unwrap();

    let req = ctx.http().last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
    assert_eq!(ctx.storage.get(crate::session::STORAGE_TOKEN_KEY), None);
}

#[tokio::test]
async fn register_surfaces_validation_detail() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        &format!("{}/register", BASE),
        422,
        json!({ "detail": [{ "msg": "value is not a valid email address" }, { "msg": "field required" }] }),
    );
    let ctx = TestContext::new(mock);

    let err = ctx
        .api
        .register(&RegisterRequest::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "value is not a valid email address; field required"
    );
}

// =========================================================
// 失败处理
// =========================================================

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let mock = MockHttpClient::new();
    mock.fail_transport();
    let ctx = TestContext::new(mock);

    let err = ctx.api.list::<Products>().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(ctx.http().requests.borrow().len(), 1);
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Get,
        &format!("{}/products/", BASE),
        200,
        json!({ "items": [] }),
    );
    let ctx = TestContext::new(mock);

    let err = ctx.api.list::<Products>().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
