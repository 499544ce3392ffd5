use crate::api::use_api;
use crate::components::toast::use_toast;
use crate::form::{FormMode, ProductFormState, submit};
use leptos::prelude::*;
use leptos::task::spawn_local;
use manaibay_shared::Product;
use manaibay_shared::protocol::Products;

/// 商品新增 / 编辑模态框
///
/// `editing` 为空时创建新商品，否则编辑该商品；保存成功后关闭并回调。
#[component]
pub fn ProductDialog(
    open: RwSignal<bool>,
    editing: RwSignal<Option<Product>>,
    #[prop(into)] on_saved: Callback<Product>,
) -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let form = ProductFormState::new();
    let (loading, set_loading) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let mode = Memo::new(move |_| {
        editing.with(|e| match e {
            Some(product) => FormMode::Edit(product.id.clone()),
            None => FormMode::Create,
        })
    });

    Effect::new(move |_| {
        editing.with(|e| match e {
            Some(product) => form.seed(product),
            None => form.reset(),
        })
    });

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close = move || {
        open.set(false);
        editing.set(None);
    };

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
            match submit::<Products, _>(&api, &mode, &fields).await {
                Ok(product) => {
                    toast.success(if mode.is_edit() {
                        "Product updated"
                    } else {
                        "Product added"
                    });
                    let _ = open.try_set(false);
                    let _ = editing.try_set(None);
                    on_saved.run(product);
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
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || if mode.get().is_edit() { "Edit product" } else { "New product" }}
                </h3>

                <form on:submit=on_submit class="space-y-4 pt-4">
                    {input("title", "Title", "text", form.title)}
                    <div class="form-control">
                        <label for="description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="description"
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=form.description
                        ></textarea>
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        {input("price", "Price", "text", form.price)}
                        {input("image", "Image URL", "url", form.image)}
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                            <Show when=move || loading.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                            {move || mode.get().submit_label()}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
