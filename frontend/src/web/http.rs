//! HTTP 传输层
//!
//! `HttpClient` 特性把具体的 fetch 实现与资源客户端解耦：
//! 浏览器中使用 `gloo-net`，测试中使用内存实现。

use async_trait::async_trait;
use gloo_net::http::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 设置请求头（同名头会被覆盖）
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置 JSON 请求体
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> ApiResult<Self> {
        let json = serde_json::to_string(body)
            .map_err(|e| ApiError::Decode(format!("请求体序列化失败: {}", e)))?;
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = Some(json);
        Ok(req)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP 客户端特性
///
/// (?Send) 是因为浏览器中的 fetch future 不是 Send 的。
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = RequestBuilder::new(&req.url).method(req.method.into());
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(format!("请求构建失败: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(format!("响应读取失败: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 按 (方法, URL) 返回预设响应，并记录所有发出的请求
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: RefCell<HashMap<(&'static str, String), (u16, String)>>,
        pub requests: RefCell<Vec<HttpRequest>>,
        fail_transport: RefCell<bool>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(
            &self,
            method: HttpMethod,
            url: &str,
            status: u16,
            body: serde_json::Value,
        ) {
            self.responses
                .borrow_mut()
                .insert((method.as_str(), url.to_string()), (status, body.to_string()));
        }

        pub fn fail_transport(&self) {
            *self.fail_transport.borrow_mut() = true;
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.borrow_mut().push(req.clone());

            if *self.fail_transport.borrow() {
                return Err(ApiError::Network("connection refused".to_string()));
            }

            let responses = self.responses.borrow();
            match responses.get(&(req.method.as_str(), req.url.clone())) {
                Some((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => Ok(HttpResponse {
                    status: 404,
                    body: r#"{"detail":"Not Found"}"#.to_string(),
                }),
            }
        }
    }
}
