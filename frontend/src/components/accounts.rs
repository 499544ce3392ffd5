use crate::api::use_api;
use crate::components::icons::*;
use crate::components::pagination::Pagination;
use crate::components::toast::use_toast;
use crate::form::{AccountFormState, FormMode, submit};
use crate::sync::{Synced, clamp_page, filter, page_count, paginate, spawn_sync};
use leptos::prelude::*;
use leptos::task::spawn_local;
use manaibay_shared::protocol::Accounts;
use manaibay_shared::{Account, EntityId};

/// 账户管理（管理员）
#[component]
pub fn AccountsPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let accounts = RwSignal::new(Synced::<Vec<Account>>::new());
    let refresh = RwSignal::new(0u32);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1usize);
    let editing = RwSignal::new(Option::<Account>::None);

    // 挂载、刷新计数、检索或翻页变化时重新拉取
    Effect::new(move |_| {
        refresh.track();
        search.track();
        page.track();
        let api = api.client();
        spawn_sync(accounts, async move { api.list::<Accounts>().await });
    });

    let filtered = Memo::new(move |_| accounts.with(|s| filter::<Accounts>(s.items(), &search.get())));
    let current_page = move || clamp_page(page.get(), filtered.with(|f| f.len()));
    let total_pages = Signal::derive(move || page_count(filtered.with(|f| f.len())));
    let visible = move || filtered.with(|f| paginate(f, current_page()));
    let is_loading = move || accounts.with(|s| s.is_loading());

    let on_saved = move |_: ()| {
        editing.set(None);
        refresh.update(|n| *n += 1);
    };

    let handle_delete = move |id: EntityId| {
        let api = api.client();
        spawn_local(async move {
            match api.delete::<Accounts>(&id).await {
                Ok(()) => {
                    toast.success("Account deleted");
                    let _ = editing.try_update(|e| {
                        if e.as_ref().is_some_and(|a| a.id == id) {
                            *e = None;
                        }
                    });
                    let _ = refresh.try_update(|n| *n += 1);
                }
                Err(e) => toast.error(format!("Failed to delete account: {}", e.message())),
            }
        });
    };

    view! {
        <div class="grid gap-8 lg:grid-cols-3">
            <AccountForm editing=editing on_saved=on_saved />

            <div class="card bg-base-100 shadow-xl lg:col-span-2">
                <div class="card-body p-0">
                    <div class="flex flex-wrap items-center justify-between gap-4 p-6 pb-2">
                        <div>
                            <h3 class="card-title">"Accounts"</h3>
                            <p class="text-base-content/70 text-sm">"Manage registered customers."</p>
                        </div>
                        <div class="flex items-center gap-2">
                            <label class="input input-bordered input-sm flex items-center gap-2">
                                <Search attr:class="h-4 w-4 opacity-50" />
                                <input
                                    type="text"
                                    placeholder="Search name or email"
                                    on:input=move |ev| {
                                        search.set(event_target_value(&ev));
                                        page.set(1);
                                    }
                                    prop:value=search
                                />
                            </label>
                            <button
                                on:click=move |_| refresh.update(|n| *n += 1)
                                disabled=is_loading
                                class="btn btn-ghost btn-circle"
                            >
                                <RefreshCw attr:class=move || if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                            </button>
                        </div>
                    </div>

                    <Show when=move || accounts.with(|s| s.error().is_some())>
                        <div role="alert" class="alert alert-error mx-6">
                            <span>{move || accounts.with(|s| s.error().unwrap_or_default())}</span>
                        </div>
                    </Show>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th class="hidden md:table-cell">"Phone"</th>
                                    <th class="hidden md:table-cell">"Location"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=is_loading>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !is_loading() && filtered.with(|f| f.is_empty())>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No accounts found."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=visible
                                    key=|a| a.id.clone()
                                    children=move |account| {
                                        let id = account.id.clone();
                                        let selected = account.clone();
                                        view! {
                                            <tr>
                                                <td class="font-bold">{account.display_name()}</td>
                                                <td class="font-mono text-sm opacity-70">{account.email.clone()}</td>
                                                <td class="hidden md:table-cell">{account.phone.clone().unwrap_or_default()}</td>
                                                <td class="hidden md:table-cell">{account.location.clone().unwrap_or_default()}</td>
                                                <td class="flex gap-1 justify-end">
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square"
                                                        on:click=move |_| editing.set(Some(selected.clone()))
                                                    >
                                                        <Pencil attr:class="h-4 w-4" />
                                                    </button>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                        on:click=move |_| handle_delete(id.clone())
                                                    >
                                                        <Trash2 attr:class="h-4 w-4" />
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <Pagination page=Signal::derive(current_page) total=total_pages on_change=move |p| page.set(p) />
                </div>
            </div>
        </div>
    }
}

/// 账户表单：`editing` 为空时是创建模式，否则为编辑模式
#[component]
fn AccountForm(
    editing: RwSignal<Option<Account>>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let form = AccountFormState::new();
    let (loading, set_loading) = signal(false);

    let mode = Memo::new(move |_| {
        editing.with(|e| match e {
            Some(account) => FormMode::Edit(account.id.clone()),
            None => FormMode::Create,
        })
    });

    // 选中实体变化时回填，回到创建模式时清空
    Effect::new(move |_| {
        editing.with(|e| match e {
            Some(account) => form.seed(account),
            None => form.reset(),
        })
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let fields = match form.to_fields() {
            Ok(fields) => fields,
            Err(e) => {
                toast.error(e.to_string());
                return;
            }
        };

        set_loading.set(true);
        let api = api.client();
        let mode = mode.get_untracked();
        spawn_local(async move {
            match submit::<Accounts, _>(&api, &mode, &fields).await {
                Ok(_) => {
                    toast.success(if mode.is_edit() {
                        "Account updated"
                    } else {
                        "Account created"
                    });
                    form.reset();
                    on_saved.run(());
                }
                Err(e) => toast.error(e.message()),
            }
            let _ = set_loading.try_set(false);
        });
    };

    let input = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label for=id class="label">
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
        <div class="card bg-base-100 shadow-xl h-fit">
            <form class="card-body space-y-2" on:submit=on_submit>
                <h3 class="card-title">
                    {move || if mode.get().is_edit() { "Edit account" } else { "New account" }}
                </h3>
                {input("acc_name", "Name", "text", form.name)}
                {input("acc_email", "Email", "email", form.email)}
                {input("acc_phone", "Phone", "tel", form.phone)}
                {input("acc_location", "Location", "text", form.location)}

                <div class="card-actions justify-end pt-4">
                    <Show when=move || mode.get().is_edit()>
                        <button type="button" class="btn" on:click=move |_| editing.set(None)>
                            "Cancel"
                        </button>
                    </Show>
                    <button type="submit" class="btn btn-primary gap-2" disabled=move || loading.get()>
                        <Show when=move || loading.get()>
                            <span class="loading loading-spinner"></span>
                        </Show>
                        {move || mode.get().submit_label()}
                    </button>
                </div>
            </form>
        </div>
    }
}
