//! 远端集合同步
//!
//! 列表和详情视图的加载状态机：`Idle -> Loading -> {Loaded | Errored}`。
//! 每次请求领取一张递增的票据，只有最后发出的请求才能写回结果，
//! 先发后至的旧响应会被丢弃。视图卸载后，写回对已销毁的信号是空操作。

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use manaibay_shared::protocol::Resource;

use crate::error::{ApiError, ApiResult};

/// 每页条目数
pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Errored(ApiError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// 请求票据
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Ticket(u64);

/// 带票据计数的加载状态
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    state: LoadState<T>,
    issued: Ticket,
}

impl<T> Default for Synced<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            issued: Ticket::default(),
        }
    }
}

impl<T> Synced<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发起新请求：进入 Loading 并返回新票据，之前的票据全部作废
    pub fn begin(&mut self) -> Ticket {
        self.issued = Ticket(self.issued.0 + 1);
        self.state = LoadState::Loading;
        self.issued
    }

    /// 写回结果；票据过期时丢弃并返回 false
    pub fn resolve(&mut self, ticket: Ticket, result: ApiResult<T>) -> bool {
        if ticket != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued.0,
                "discarding stale response"
            );
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => LoadState::Errored(e),
        };
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// 失败时面向用户的提示
    pub fn error(&self) -> Option<String> {
        self.failure().map(ApiError::message)
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match &self.state {
            LoadState::Errored(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> Synced<Vec<T>> {
    /// 当前展示的集合；加载中或失败时为空
    pub fn items(&self) -> &[T] {
        self.value().map(Vec::as_slice).unwrap_or(&[])
    }
}

// =========================================================
// 状态槽
// =========================================================

/// 可以承载 `Synced` 的容器
///
/// 组件中是 `RwSignal`，测试中是 `Rc<RefCell<_>>`。
pub trait SyncSlot<T>: Clone + 'static {
    /// 领取票据；容器已销毁时返回 None
    fn begin(&self) -> Option<Ticket>;

    fn resolve(&self, ticket: Ticket, result: ApiResult<T>);
}

impl<T: Send + Sync + 'static> SyncSlot<T> for RwSignal<Synced<T>> {
    fn begin(&self) -> Option<Ticket> {
        self.try_update(|s| s.begin())
    }

    fn resolve(&self, ticket: Ticket, result: ApiResult<T>) {
        if self.try_update(|s| s.resolve(ticket, result)).is_none() {
            tracing::debug!("view disposed before response arrived");
        }
    }
}

impl<T: 'static> SyncSlot<T> for Rc<RefCell<Synced<T>>> {
    fn begin(&self) -> Option<Ticket> {
        Some(self.borrow_mut().begin())
    }

    fn resolve(&self, ticket: Ticket, result: ApiResult<T>) {
        self.borrow_mut().resolve(ticket, result);
    }
}

/// 同步领取票据，然后返回等待请求并写回结果的 future
///
/// 票据在调用时立即领取，因此“最后发出者胜出”与 future 何时被轮询无关。
pub fn drive<T, S, F>(slot: S, fetch: F) -> impl Future<Output = ()>
where
    S: SyncSlot<T>,
    F: Future<Output = ApiResult<T>>,
{
    let ticket = slot.begin();
    async move {
        let Some(ticket) = ticket else {
            return;
        };
        let result = fetch.await;
        slot.resolve(ticket, result);
    }
}

/// 在浏览器事件循环上执行 `drive`
pub fn spawn_sync<T, S, F>(slot: S, fetch: F)
where
    S: SyncSlot<T>,
    F: Future<Output = ApiResult<T>> + 'static,
    T: 'static,
{
    leptos::task::spawn_local(drive(slot, fetch));
}

// =========================================================
// 检索与分页
// =========================================================

/// 按关键字过滤（大小写不敏感，空白关键字匹配全部）
pub fn filter<R: Resource>(items: &[R::Entity], search: &str) -> Vec<R::Entity> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| R::matches(item, &needle))
        .cloned()
        .collect()
}

/// 总页数，至少为 1
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

/// 把页码夹回有效范围（页码从 1 开始）
pub fn clamp_page(page: usize, len: usize) -> usize {
    page.clamp(1, page_count(len))
}

/// 取第 `page` 页；越界时为空
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    items.iter().skip(start).take(PAGE_SIZE).cloned().collect()
}
