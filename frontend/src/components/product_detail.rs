use crate::api::use_api;
use crate::cart::use_cart;
use crate::components::icons::*;
use crate::components::product_dialog::ProductDialog;
use crate::components::toast::use_toast;
use crate::error::ApiError;
use crate::session::use_session;
use crate::sync::{Synced, spawn_sync};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use manaibay_shared::protocol::Products;
use manaibay_shared::{EntityId, Product};

/// 商品详情：评价、平均分；管理员可编辑删除，其他角色可加入购物车
#[component]
pub fn ProductDetailPage(id: EntityId) -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let session = use_session();
    let cart = use_cart();
    let router = use_router();

    let product = RwSignal::new(Synced::<Product>::new());
    let refresh = RwSignal::new(0u32);
    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Product>::None);
    let id = StoredValue::new(id);

    Effect::new(move |_| {
        refresh.track();
        let api = api.client();
        let id = id.get_value();
        spawn_sync(product, async move { api.get::<Products>(&id).await });
    });

    let handle_delete = move |_| {
        let api = api.client();
        let id = id.get_value();
        spawn_local(async move {
            match api.delete::<Products>(&id).await {
                Ok(()) => {
                    toast.success("Product deleted");
                    router.navigate_to(AppRoute::Products);
                }
                Err(e) => toast.error(format!("Failed to delete product: {}", e.message())),
            }
        });
    };

    let loaded = move || product.with(|s| s.value().cloned());

    view! {
        <div class="space-y-6">
            <Link to="/products" class="btn btn-ghost gap-2">
                <ArrowLeft attr:class="h-4 w-4" /> "Back to products"
            </Link>

            <Show when=move || product.with(|s| s.is_loading())>
                <div class="flex justify-center py-12">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>
            <Show when=move || product.with(|s| s.failure().is_some_and(ApiError::is_not_found))>
                <div class="text-center py-12">
                    <p class="text-xl text-base-content/70">"This product no longer exists."</p>
                    <Link to="/products" class="btn btn-link">"Browse products"</Link>
                </div>
            </Show>
            <Show when=move || product.with(|s| s.failure().is_some_and(|e| !e.is_not_found()))>
                <div role="alert" class="alert alert-error">
                    <span>{move || product.with(|s| s.error().unwrap_or_default())}</span>
                </div>
            </Show>

            {move || loaded().map(|p| {
                let rating = p.average_rating();
                let for_edit = p.clone();
                let for_cart = p.clone();
                view! {
                    <div class="card lg:card-side bg-base-100 shadow-xl">
                        {p.image_src().map(|src| view! {
                            <figure class="lg:w-1/2 bg-base-200">
                                <img src=src alt=p.title.clone() class="object-cover w-full" />
                            </figure>
                        })}
                        <div class="card-body">
                            <h2 class="card-title text-3xl">{p.title.clone()}</h2>
                            <p class="text-base-content/70">{p.description.clone()}</p>
                            <div class="flex items-center gap-4">
                                <span class="text-2xl font-bold text-primary">{p.display_price()}</span>
                                <span class="flex items-center gap-1">
                                    <Star attr:class="h-5 w-5 text-warning" />
                                    {format!("{:.1} / 5", rating)}
                                </span>
                            </div>

                            <div class="card-actions justify-end pt-4">
                                <Show
                                    when=move || session.is_admin()
                                    fallback=move || {
                                        let product = for_cart.clone();
                                        view! {
                                            <button
                                                class="btn btn-primary gap-2"
                                                on:click=move |_| {
                                                    let title = product.title.clone();
                                                    cart.update(|c| c.add(product.clone()));
                                                    toast.success(format!("{} added to cart", title));
                                                }
                                            >
                                                <ShoppingCart attr:class="h-4 w-4" /> "Add to cart"
                                            </button>
                                        }
                                    }
                                >
                                    {
                                        let product = for_edit.clone();
                                        view! {
                                            <button
                                                class="btn gap-2"
                                                on:click=move |_| {
                                                    editing.set(Some(product.clone()));
                                                    dialog_open.set(true);
                                                }
                                            >
                                                <Pencil attr:class="h-4 w-4" /> "Edit"
                                            </button>
                                            <button class="btn btn-error gap-2" on:click=handle_delete>
                                                <Trash2 attr:class="h-4 w-4" /> "Delete"
                                            </button>
                                        }
                                    }
                                </Show>
                            </div>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">{format!("Reviews ({})", p.reviews.len())}</h3>
                            {if p.reviews.is_empty() {
                                view! { <p class="text-base-content/50">"No reviews yet."</p> }.into_any()
                            } else {
                                p.reviews
                                    .iter()
                                    .map(|review| view! {
                                        <div class="border-b border-base-200 py-3">
                                            <div class="flex items-center justify-between">
                                                <span class="font-bold">{review.user.clone()}</span>
                                                <span class="flex items-center gap-1 text-sm">
                                                    <Star attr:class="h-4 w-4 text-warning" />
                                                    {review.rating}
                                                </span>
                                            </div>
                                            <p class="text-sm text-base-content/70">{review.comment.clone()}</p>
                                        </div>
                                    })
                                    .collect_view()
                                    .into_any()
                            }}
                        </div>
                    </div>
                }
            })}

            <ProductDialog
                open=dialog_open
                editing=editing
                on_saved=move |_| refresh.update(|n| *n += 1)
            />
        </div>
    }
}
