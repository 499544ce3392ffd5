//! 全局通知提示
//!
//! 每条通知 3 秒后自动消失；新通知会顶替旧通知，旧的计时器不再生效。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const DISMISS_AFTER_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    serial: u64,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    notice: RwSignal<Option<Notice>>,
    serial: StoredValue<u64>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            notice: RwSignal::new(None),
            serial: StoredValue::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    fn show(&self, message: String, is_error: bool) {
        self.serial.update_value(|s| *s += 1);
        let serial = self.serial.get_value();
        self.notice.set(Some(Notice {
            message,
            is_error,
            serial,
        }));

        let notice = self.notice;
        Timeout::new(DISMISS_AFTER_MS, move || {
            let _ = notice.try_update(|current| {
                if current.as_ref().is_some_and(|n| n.serial == serial) {
                    *current = None;
                }
            });
        })
        .forget();
    }
}

pub fn provide_toast() -> ToastContext {
    let ctx = ToastContext::new();
    provide_context(ctx);
    ctx
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// 通知提示框
#[component]
pub fn Toast() -> impl IntoView {
    let ctx = use_toast();

    move || {
        ctx.notice.get().map(|notice| {
            let class = if notice.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{notice.message}</span>
                    </div>
                </div>
            }
        })
    }
}
