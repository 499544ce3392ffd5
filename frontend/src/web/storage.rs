//! 本地存储封装模块
//!
//! `KeyValueStore` 抽象出会话持久化所需的最小接口，
//! 浏览器中由 `gloo-storage` 的 LocalStorage 实现。
//! 值按原始字符串读写（`setItem` / `getItem`），不经过 JSON 编码。

use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 字符串键值存储
pub trait KeyValueStore {
    /// 获取存储的字符串值，键不存在或出错时返回 None
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对
    fn delete(&self, key: &str);
}

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        LocalStorage::raw().set_item(key, value).is_ok()
    }

    fn delete(&self, key: &str) {
        if LocalStorage::raw().remove_item(key).is_err() {
            tracing::warn!(key, "failed to remove storage entry");
        }
    }
}

/// 内存存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
