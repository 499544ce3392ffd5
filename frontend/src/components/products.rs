use crate::api::use_api;
use crate::cart::use_cart;
use crate::components::icons::*;
use crate::components::pagination::Pagination;
use crate::components::product_dialog::ProductDialog;
use crate::components::toast::use_toast;
use crate::session::use_session;
use crate::sync::{Synced, clamp_page, filter, page_count, paginate, spawn_sync};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use manaibay_shared::protocol::Products;
use manaibay_shared::{EntityId, Product};

/// 商品列表：所有已登录用户可见，管理员可增删改
#[component]
pub fn ProductsPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let session = use_session();
    let cart = use_cart();

    let products = RwSignal::new(Synced::<Vec<Product>>::new());
    let refresh = RwSignal::new(0u32);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1usize);

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Product>::None);

    Effect::new(move |_| {
        refresh.track();
        search.track();
        page.track();
        let api = api.client();
        spawn_sync(products, async move { api.list::<Products>().await });
    });

    let filtered = Memo::new(move |_| products.with(|s| filter::<Products>(s.items(), &search.get())));
    let current_page = move || clamp_page(page.get(), filtered.with(|f| f.len()));
    let total_pages = Signal::derive(move || page_count(filtered.with(|f| f.len())));
    let visible = move || filtered.with(|f| paginate(f, current_page()));
    let is_loading = move || products.with(|s| s.is_loading());
    let is_admin = move || session.is_admin();

    let open_create = move |_| {
        editing.set(None);
        dialog_open.set(true);
    };

    let open_edit = move |product: Product| {
        editing.set(Some(product));
        dialog_open.set(true);
    };

    let handle_delete = move |id: EntityId| {
        let api = api.client();
        spawn_local(async move {
            match api.delete::<Products>(&id).await {
                Ok(()) => {
                    toast.success("Product deleted");
                    let _ = refresh.try_update(|n| *n += 1);
                }
                Err(e) => toast.error(format!("Failed to delete product: {}", e.message())),
            }
        });
    };

    let add_to_cart = move |product: Product| {
        let title = product.title.clone();
        cart.update(|c| c.add(product));
        toast.success(format!("{} added to cart", title));
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Products"</h2>
                    <p class="text-base-content/70 text-sm">
                        {move || filtered.with(|f| format!("{} items", f.len()))}
                    </p>
                </div>
                <div class="flex items-center gap-2">
                    <label class="input input-bordered flex items-center gap-2">
                        <Search attr:class="h-4 w-4 opacity-50" />
                        <input
                            type="text"
                            placeholder="Search products"
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
                    <Show when=is_admin>
                        <button class="btn btn-primary gap-2" on:click=open_create>
                            <Plus attr:class="h-4 w-4" /> "Add product"
                        </button>
                    </Show>
                </div>
            </div>

            <Show when=move || products.with(|s| s.error().is_some())>
                <div role="alert" class="alert alert-error">
                    <span>{move || products.with(|s| s.error().unwrap_or_default())}</span>
                </div>
            </Show>

            <Show when=is_loading>
                <div class="flex justify-center py-12">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>
            <Show when=move || !is_loading() && filtered.with(|f| f.is_empty())>
                <div class="text-center py-12 text-base-content/50">"No products found."</div>
            </Show>

            <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-4">
                <For
                    each=visible
                    key=|p| p.id.clone()
                    children=move |product| {
                        view! {
                            <ProductCard
                                product=product
                                is_admin=Signal::derive(is_admin)
                                on_edit=open_edit
                                on_delete=handle_delete
                                on_add=add_to_cart
                            />
                        }
                    }
                />
            </div>

            <Pagination page=Signal::derive(current_page) total=total_pages on_change=move |p| page.set(p) />

            <ProductDialog
                open=dialog_open
                editing=editing
                on_saved=move |_| refresh.update(|n| *n += 1)
            />
        </div>
    }
}

#[component]
fn ProductCard(
    product: Product,
    #[prop(into)] is_admin: Signal<bool>,
    #[prop(into)] on_edit: Callback<Product>,
    #[prop(into)] on_delete: Callback<EntityId>,
    #[prop(into)] on_add: Callback<Product>,
) -> impl IntoView {
    let detail_path = AppRoute::ProductDetail(product.id.clone()).to_path();
    let image = product.image_src();
    let rating = product.average_rating();
    let review_count = product.reviews.len();

    let for_edit = product.clone();
    let for_cart = product.clone();
    let id = product.id.clone();
    let title = product.title.clone();

    view! {
        <div class="card bg-base-100 shadow-xl">
            {image.map(|src| view! {
                <figure class="h-48 bg-base-200">
                    <img src=src alt=product.title.clone() class="object-cover h-full w-full" />
                </figure>
            })}
            <div class="card-body">
                <Link to=detail_path class="card-title link link-hover">
                    {title}
                </Link>
                <p class="text-sm text-base-content/70 line-clamp-2">{product.description.clone()}</p>
                <div class="flex items-center justify-between">
                    <span class="text-lg font-bold text-primary">{product.display_price()}</span>
                    <span class="flex items-center gap-1 text-sm">
                        <Star attr:class="h-4 w-4 text-warning" />
                        {format!("{:.1}", rating)}
                        <span class="opacity-50">{format!("({})", review_count)}</span>
                    </span>
                </div>
                <div class="card-actions justify-end">
                    <Show
                        when=move || is_admin.get()
                        fallback=move || {
                            let product = for_cart.clone();
                            view! {
                                <button class="btn btn-primary btn-sm gap-2" on:click=move |_| on_add.run(product.clone())>
                                    <ShoppingCart attr:class="h-4 w-4" /> "Add to cart"
                                </button>
                            }
                        }
                    >
                        {
                            let product = for_edit.clone();
                            let id = id.clone();
                            view! {
                                <button class="btn btn-ghost btn-sm btn-square" on:click=move |_| on_edit.run(product.clone())>
                                    <Pencil attr:class="h-4 w-4" />
                                </button>
                                <button class="btn btn-ghost btn-sm btn-square text-error" on:click=move |_| on_delete.run(id.clone())>
                                    <Trash2 attr:class="h-4 w-4" />
                                </button>
                            }
                        }
                    </Show>
                </div>
            </div>
        </div>
    }
}
