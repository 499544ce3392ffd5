use leptos::prelude::*;
use manaibay_frontend::App;
use manaibay_frontend::config::AppConfig;
use manaibay_frontend::logging;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();

    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|c| c.log_level)
        .unwrap_or(tracing::Level::INFO);
    logging::init(level);

    let config = loaded.unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid build configuration, using defaults");
        AppConfig::default()
    });

    mount_to_body(move || view! { <App config=config /> });
}
