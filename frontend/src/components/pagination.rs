use leptos::prelude::*;

/// 上一页 / 下一页（页码从 1 开始）
#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<usize>,
    #[prop(into)] total: Signal<usize>,
    #[prop(into)] on_change: Callback<usize>,
) -> impl IntoView {
    view! {
        <Show when=move || { total.get() > 1 }>
            <div class="flex justify-center p-4">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() <= 1
                        on:click=move |_| on_change.run(page.get_untracked().saturating_sub(1).max(1))
                    >
                        "«"
                    </button>
                    <button class="join-item btn btn-sm btn-disabled">
                        {move || format!("Page {} of {}", page.get(), total.get())}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() >= total.get()
                        on:click=move |_| on_change.run(page.get_untracked() + 1)
                    >
                        "»"
                    </button>
                </div>
            </div>
        </Show>
    }
}
