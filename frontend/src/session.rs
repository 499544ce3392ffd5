//! 会话模块
//!
//! `SessionStore` 持有当前令牌与角色，持久化到本地存储，
//! 并通过显式的订阅/通知机制把变化推送给订阅者。
//! 组件层通过 `SessionContext` 以信号的形式读取会话，与路由系统解耦。

use crate::web::KeyValueStore;
use leptos::prelude::*;
use manaibay_shared::{Role, Session};
use std::cell::RefCell;
use std::rc::Rc;

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_ROLE_KEY: &str = "role";

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(Option<&Session>)>;

struct Inner {
    current: Option<Session>,
    storage: Box<dyn KeyValueStore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

/// 进程内唯一的会话存储
///
/// 克隆得到的是同一份状态的句柄。
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<RefCell<Inner>>,
}

impl SessionStore {
    /// 从存储中恢复会话
    ///
    /// 令牌缺失或为空时视为未登录；令牌存在但角色缺失时按普通用户恢复。
    pub fn restore(storage: impl KeyValueStore + 'static) -> Self {
        let current = storage
            .get(STORAGE_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                let role = storage
                    .get(STORAGE_ROLE_KEY)
                    .map(|raw| Role::from_wire(&raw))
                    .unwrap_or_default();
                Session::new(token, role)
            });

        if let Some(session) = &current {
            tracing::info!(role = session.role.as_str(), "session restored from storage");
        }

        Self {
            inner: Rc::new(RefCell::new(Inner {
                current,
                storage: Box::new(storage),
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner.borrow().current.clone()
    }

    /// 持久化并广播新会话，所有订阅者在返回前已被通知
    pub fn set_session(&self, token: impl Into<String>, role: Role) {
        let session = Session::new(token, role);
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.storage.set(STORAGE_TOKEN_KEY, &session.token)
                || !inner.storage.set(STORAGE_ROLE_KEY, role.as_str())
            {
                tracing::warn!("failed to persist session, it will not survive a reload");
            }
            inner.current = Some(session);
        }
        tracing::info!(role = role.as_str(), "session established");
        self.notify();
    }

    /// 清除会话（两个键一起删除）并广播
    pub fn clear_session(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.storage.delete(STORAGE_TOKEN_KEY);
            inner.storage.delete(STORAGE_ROLE_KEY);
            inner.current = None;
        }
        tracing::info!("session cleared");
        self.notify();
    }

    pub fn subscribe(&self, listener: impl Fn(Option<&Session>) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        // 先取出快照再回调，允许订阅者在回调中读取或修改 store
        let (current, listeners) = {
            let inner = self.inner.borrow();
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.current.clone(), listeners)
        };
        for listener in listeners {
            listener(current.as_ref());
        }
    }
}

// =========================================================
// 组件层上下文
// =========================================================

/// 会话上下文
///
/// `store` 以本地存储方式挂在响应式系统中（非 Send），
/// `session` 信号随 store 的通知同步更新。
#[derive(Clone, Copy)]
pub struct SessionContext {
    store: StoredValue<SessionStore, LocalStorage>,
    session: RwSignal<Option<Session>>,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        let session = RwSignal::new(store.current_session());
        store.subscribe(move |current| {
            let _ = session.try_set(current.cloned());
        });
        Self {
            store: StoredValue::new_local(store),
            session,
        }
    }

    /// 当前会话的只读信号（用于路由守卫注入）
    pub fn session_signal(&self) -> Signal<Option<Session>> {
        self.session.into()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(|s| s.as_ref().map(|s| s.role))
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|r| r.is_admin())
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }
}

/// 提供会话上下文
pub fn provide_session(store: SessionStore) -> SessionContext {
    let ctx = SessionContext::new(store);
    provide_context(ctx);
    ctx
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;
    use std::cell::Cell;

    #[test]
    fn restores_nothing_from_empty_storage() {
        let store = SessionStore::restore(MemoryStorage::new());
        assert_eq!(store.current_session(), None);
    }

    #[test]
    fn set_session_persists_and_survives_reload() {
        let storage = MemoryStorage::new();
        let store = SessionStore::restore(storage.clone());
        store.set_session("t1", Role::Admin);

        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(storage.get(STORAGE_ROLE_KEY).as_deref(), Some("admin"));

        let reloaded = SessionStore::restore(storage);
        assert_eq!(
            reloaded.current_session(),
            Some(Session::new("t1", Role::Admin))
        );
    }

    #[test]
    fn missing_role_restores_as_standard_and_blank_token_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_TOKEN_KEY, "t2");
        let store = SessionStore::restore(storage.clone());
        assert_eq!(store.current_session(), Some(Session::new("t2", Role::Standard)));

        storage.set(STORAGE_TOKEN_KEY, "  ");
        assert_eq!(SessionStore::restore(storage).current_session(), None);
    }

    #[test]
    fn restores_plain_string_entries_without_quoting() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_TOKEN_KEY, "t1");
        storage.set(STORAGE_ROLE_KEY, "admin");

        let store = SessionStore::restore(storage.clone());
        assert_eq!(store.current_session(), Some(Session::new("t1", Role::Admin)));

        store.set_session("t2", Role::Standard);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("t2"));
        assert_eq!(storage.get(STORAGE_ROLE_KEY).as_deref(), Some("standard"));
    }

    #[test]
    fn clear_session_removes_both_keys() {
        let storage = MemoryStorage::new();
        let store = SessionStore::restore(storage.clone());
        store.set_session("t1", Role::Standard);
        store.clear_session();

        assert_eq!(store.current_session(), None);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY), None);
        assert_eq!(storage.get(STORAGE_ROLE_KEY), None);
    }

    #[test]
    fn subscribers_are_notified_synchronously_until_unsubscribed() {
        let store = SessionStore::restore(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let calls = Rc::new(Cell::new(0));

        let id = store.subscribe({
            let seen = seen.clone();
            let calls = calls.clone();
            move |session| {
                calls.set(calls.get() + 1);
                seen.borrow_mut().push(session.map(|s| s.token.clone()));
            }
        });

        store.set_session("t1", Role::Admin);
        assert_eq!(calls.get(), 1);
        store.clear_session();
        assert_eq!(calls.get(), 2);

        store.unsubscribe(id);
        store.set_session("t2", Role::Admin);
        assert_eq!(calls.get(), 2);
        assert_eq!(*seen.borrow(), vec![Some("t1".to_string()), None]);
    }

    #[test]
    fn listener_may_read_the_store_during_notification() {
        let store = SessionStore::restore(MemoryStorage::new());
        let observed = Rc::new(RefCell::new(None));
        store.subscribe({
            let store = store.clone();
            let observed = observed.clone();
            move |_| *observed.borrow_mut() = store.current_session().map(|s| s.token)
        });
        store.set_session("t9", Role::Standard);
        assert_eq!(observed.borrow().as_deref(), Some("t9"));
    }
}
