use crate::cart::use_cart;
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn CartPage() -> impl IntoView {
    let cart = use_cart();

    let lines = move || cart.with(|c| c.lines());
    let total = move || cart.with(|c| format!("${:.2}", c.total()));
    let is_empty = move || cart.with(|c| c.is_empty());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Cart"</h3>
                        <p class="text-base-content/70 text-sm">
                            {move || cart.with(|c| format!("{} items", c.len()))}
                        </p>
                    </div>
                    <button
                        class="btn btn-ghost btn-sm text-error"
                        disabled=is_empty
                        on:click=move |_| cart.update(|c| c.clear())
                    >
                        <Trash2 attr:class="h-4 w-4" /> "Clear"
                    </button>
                </div>

                <Show
                    when=move || !is_empty()
                    fallback=|| view! {
                        <div class="text-center py-12 text-base-content/50">
                            <p>"Your cart is empty."</p>
                            <Link to="/products" class="btn btn-link">"Browse products"</Link>
                        </div>
                    }
                >
                    <div class="overflow-x-auto w-full">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th>"Product"</th>
                                    <th>"Price"</th>
                                    <th>"Quantity"</th>
                                    <th>"Subtotal"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=lines
                                    key=|line| (line.product.id.clone(), line.quantity)
                                    children=move |line| {
                                        let id = line.product.id.clone();
                                        let again = line.product.clone();
                                        let title = line.product.title.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <Link
                                                        to=AppRoute::ProductDetail(id.clone()).to_path()
                                                        class="link link-hover font-bold"
                                                    >
                                                        {title}
                                                    </Link>
                                                </td>
                                                <td>{line.product.display_price()}</td>
                                                <td>
                                                    <div class="join">
                                                        <button
                                                            class="join-item btn btn-xs"
                                                            on:click=move |_| cart.update(|c| { c.remove_one(&id); })
                                                        >
                                                            "-"
                                                        </button>
                                                        <span class="join-item btn btn-xs btn-disabled">{line.quantity}</span>
                                                        <button
                                                            class="join-item btn btn-xs"
                                                            on:click=move |_| cart.update(|c| c.add(again.clone()))
                                                        >
                                                            <Plus attr:class="h-3 w-3" />
                                                        </button>
                                                    </div>
                                                </td>
                                                <td>{format!("${:.2}", line.subtotal())}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                    <div class="flex justify-end p-6 text-xl font-bold">
                        "Total: " {total}
                    </div>
                </Show>
            </div>
        </div>
    }
}
