//! Bindings to the WebExtension `browser.*` APIs the board needs.
//!
//! `web-sys` does not cover extension namespaces, so these are declared by
//! hand. Every import is `catch` so that a page running outside an extension
//! gets an `Err` instead of a thrown `ReferenceError`.

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::StorageError;
use crate::util::js_error_message;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "local"], js_name = get)]
    fn local_get(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "local"], js_name = set)]
    fn local_set(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "onChanged"], js_name = addListener)]
    fn on_changed_add_listener(callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "onChanged"], js_name = removeListener)]
    fn on_changed_remove_listener(callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "windows"], js_name = create)]
    fn windows_create(create_data: &JsValue) -> Result<Promise, JsValue>;
}

/// Whether `globalThis.browser.<path...>` resolves to an object.
pub(crate) fn api_available(path: &[&str]) -> bool {
    let mut current: JsValue = js_sys::global().into();
    for key in std::iter::once(&"browser").chain(path.iter()) {
        match Reflect::get(&current, &JsValue::from_str(key)) {
            Ok(v) if !v.is_undefined() && !v.is_null() => current = v,
            _ => return false,
        }
    }
    true
}

pub(crate) async fn get_item(key: &str) -> Result<Option<String>, StorageError> {
    let promise = local_get(&JsValue::from_str(key)).map_err(StorageError::from_js)?;
    let result = JsFuture::from(promise).await.map_err(StorageError::from_js)?;
    let value = Reflect::get(&result, &JsValue::from_str(key)).map_err(StorageError::from_js)?;
    Ok(value.as_string())
}

pub(crate) async fn set_item(key: &str, value: &str) -> Result<(), StorageError> {
    let items = Object::new();
    Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_str(value))
        .map_err(StorageError::from_js)?;
    let promise = local_set(&items).map_err(StorageError::from_js)?;
    JsFuture::from(promise).await.map_err(StorageError::from_js)?;
    Ok(())
}

pub(crate) fn add_change_listener(callback: &Function) -> Result<(), StorageError> {
    on_changed_add_listener(callback).map_err(StorageError::from_js)
}

pub(crate) fn remove_change_listener(callback: &Function) -> Result<(), StorageError> {
    on_changed_remove_listener(callback).map_err(StorageError::from_js)
}

pub(crate) async fn open_window(url: &str) -> Result<(), String> {
    let data = Object::new();
    Reflect::set(&data, &JsValue::from_str("url"), &JsValue::from_str(url))
        .map_err(|e| js_error_message(&e))?;
    let promise = windows_create(&data).map_err(|e| js_error_message(&e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_error_message(&e))?;
    Ok(())
}
