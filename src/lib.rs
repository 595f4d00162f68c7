mod app;
mod board;
mod components;
mod config;
mod drag;
mod forms;
mod menu;
mod models;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger not installed: {e}").into());
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    mount_to_body(App);
}
