//! 运行时配置
//!
//! WASM 中没有进程环境变量，配置在编译期通过 `option_env!` 注入：
//!
//! - `MANAIBAY_API_URL` - 后端地址（默认：本机为 `http://localhost:8000`，
//!   否则为 `http://{当前主机名}:8000`）
//! - `MANAIBAY_ACCOUNTS_PATH` - 账户集合路径，`/clients/`（默认）或 `/users/`
//! - `MANAIBAY_LOG` - 日志级别（默认 `info`）

use manaibay_shared::protocol::{PATH_CLIENTS, PATH_USERS};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

const DEFAULT_API_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub accounts_path: String,
    pub log_level: Level,
}

impl AppConfig {
    /// 从编译期变量和当前页面主机名加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let hostname = web_sys::window().and_then(|w| w.location().hostname().ok());
        Self::resolve(compile_time_var, hostname.as_deref())
    }

    /// 纯函数形式的配置解析，便于测试
    pub fn resolve<F>(var: F, hostname: Option<&str>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match var("MANAIBAY_API_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => default_base_url(hostname),
        };

        let accounts_path = match var("MANAIBAY_ACCOUNTS_PATH") {
            None => PATH_CLIENTS.to_string(),
            Some(raw) => match raw.trim().trim_matches('/') {
                "clients" => PATH_CLIENTS.to_string(),
                "users" => PATH_USERS.to_string(),
                _ => return Err(ConfigError::InvalidValue("MANAIBAY_ACCOUNTS_PATH", raw)),
            },
        };

        let log_level = match var("MANAIBAY_LOG") {
            None => DEFAULT_LOG_LEVEL,
            Some(raw) => Level::from_str(raw.trim())
                .map_err(|_| ConfigError::InvalidValue("MANAIBAY_LOG", raw))?,
        };

        Ok(Self {
            api_base_url,
            accounts_path,
            log_level,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(None),
            accounts_path: PATH_CLIENTS.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

fn default_base_url(hostname: Option<&str>) -> String {
    match hostname.filter(|h| !h.is_empty() && *h != "localhost") {
        Some(host) => format!("http://{}:{}", host, DEFAULT_API_PORT),
        None => format!("http://localhost:{}", DEFAULT_API_PORT),
    }
}

fn compile_time_var(key: &str) -> Option<String> {
    let value = match key {
        "MANAIBAY_API_URL" => option_env!("MANAIBAY_API_URL"),
        "MANAIBAY_ACCOUNTS_PATH" => option_env!("MANAIBAY_ACCOUNTS_PATH"),
        "MANAIBAY_LOG" => option_env!("MANAIBAY_LOG"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_localhost_api() {
        let config = AppConfig::resolve(vars(&[]), Some("localhost")).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.accounts_path, "/clients/");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn remote_host_targets_same_host_on_api_port() {
        let config = AppConfig::resolve(vars(&[]), Some("192.168.1.20")).unwrap();
        assert_eq!(config.api_base_url, "http://192.168.1.20:8000");
    }

    #[test]
    fn explicit_url_wins_and_loses_trailing_slash() {
        let config = AppConfig::resolve(
            vars(&[("MANAIBAY_API_URL", "https://api.example.com/")]),
            Some("shop.example.com"),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn accounts_path_variants() {
        let config =
            AppConfig::resolve(vars(&[("MANAIBAY_ACCOUNTS_PATH", "users")]), None).unwrap();
        assert_eq!(config.accounts_path, "/users/");

        let err = AppConfig::resolve(vars(&[("MANAIBAY_ACCOUNTS_PATH", "people")]), None);
        assert_eq!(
            err,
            Err(ConfigError::InvalidValue(
                "MANAIBAY_ACCOUNTS_PATH",
                "people".to_string()
            ))
        );
    }

    #[test]
    fn log_level_is_parsed() {
        let config = AppConfig::resolve(vars(&[("MANAIBAY_LOG", "debug")]), None).unwrap();
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(AppConfig::resolve(vars(&[("MANAIBAY_LOG", "loud")]), None).is_err());
    }
}
