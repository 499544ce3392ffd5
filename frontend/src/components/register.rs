use crate::api::use_api;
use crate::components::toast::use_toast;
use crate::form::RegisterFormState;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册表单；成功后回到登录视图，不自动登录
#[component]
pub fn RegisterForm(#[prop(into)] on_registered: Callback<()>) -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let form = RegisterFormState::new();

    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.client();
        spawn_local(async move {
            match api.register(&request).await {
                Ok(()) => {
                    toast.success("Registration successful. Please sign in.");
                    form.reset();
                    on_registered.run(());
                }
                Err(e) => {
                    let _ = set_error_msg.try_set(Some(e.message()));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    let field = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| value.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered w-full"
                />
            </div>
        }
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="grid grid-cols-2 gap-4">
                {field("first_name", "First name", "text", form.first_name)}
                {field("last_name", "Last name", "text", form.last_name)}
            </div>
            {field("reg_email", "Email", "email", form.email)}
            {field("reg_password", "Password", "password", form.password)}
            <div class="grid grid-cols-2 gap-4">
                {field("phone", "Phone", "tel", form.phone)}
                {field("location", "Location", "text", form.location)}
            </div>

            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() {
                        view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                    } else {
                        "Create account".into_any()
                    }}
                </button>
            </div>
        </form>
    }
}
