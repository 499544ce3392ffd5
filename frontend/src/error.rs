use manaibay_shared::protocol::ErrorBody;
use manaibay_shared::validation::ValidationError;
use thiserror::Error;

/// 资源客户端的统一错误
///
/// 所有失败最终都以 `message()` 的形式展示给用户，客户端从不自动重试。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 网络 / 传输层失败
    #[error("Network error: {0}")]
    Network(String),
    /// 401 / 403: 凭据无效或令牌过期
    #[error("{message}")]
    Unauthorized { status: u16, message: String },
    /// 400 / 422: 后端校验失败
    #[error("{message}")]
    Validation { status: u16, message: String },
    /// 404: 资源不存在
    #[error("{0}")]
    NotFound(String),
    /// 其他非 2xx 响应
    #[error("Request failed ({status}): {message}")]
    Server { status: u16, message: String },
    /// 响应体无法解析
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// 提交前的本地校验失败
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
}

impl ApiError {
    /// 将非 2xx 响应映射为错误，优先使用后端返回的 `detail`
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = ErrorBody::parse(body);
        match status {
            401 | 403 => ApiError::Unauthorized {
                status,
                message: detail.unwrap_or_else(|| "Not authenticated".to_string()),
            },
            404 => ApiError::NotFound(detail.unwrap_or_else(|| "Not found".to_string())),
            400 | 422 => ApiError::Validation {
                status,
                message: detail.unwrap_or_else(|| "Invalid request".to_string()),
            },
            _ => ApiError::Server {
                status,
                message: detail.unwrap_or_else(|| "Unexpected server error".to_string()),
            },
        }
    }

    /// 面向用户的提示信息
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// 响应携带的 HTTP 状态码；本地错误与传输失败时为 None
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::Server { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidInput(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
