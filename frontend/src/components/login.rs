use crate::api::use_api;
use crate::components::icons::Store;
use crate::components::register::RegisterForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 未登录时的界面：登录 / 注册切换
#[component]
pub fn AuthPage() -> impl IntoView {
    let (show_register, set_show_register) = signal(false);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Store attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"ManaiBay"</h1>
                        <p class="text-base-content/70">
                            {move || if show_register.get() {
                                "Create an account to start shopping"
                            } else {
                                "Sign in to continue"
                            }}
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || show_register.get()
                        fallback=|| view! { <LoginForm /> }
                    >
                        <RegisterForm on_registered=move |_| set_show_register.set(false) />
                    </Show>
                </div>

                <button
                    class="btn btn-link"
                    on:click=move |_| set_show_register.update(|v| *v = !*v)
                >
                    {move || if show_register.get() {
                        "Already have an account? Sign in"
                    } else {
                        "No account yet? Register"
                    }}
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 登录成功后会话变化，路由服务会把用户带到对应界面
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("All fields are required.".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.client();
        spawn_local(async move {
            if let Err(e) = api.login(&email.get_untracked(), &password.get_untracked()).await {
                let _ = set_error_msg.try_set(Some(e.message()));
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="form-control">
                <label class="label" for="email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                    class="input input-bordered"
                    required
                />
            </div>
            <div class="form-control">
                <label class="label" for="password">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    id="password"
                    type="password"
                    placeholder="••••••••"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                    class="input input-bordered"
                    required
                />
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() {
                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                    } else {
                        "Sign in".into_any()
                    }}
                </button>
            </div>
        </form>
    }
}
