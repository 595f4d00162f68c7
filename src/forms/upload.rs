use js_sys::Promise;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::util::js_error_message;

/// Read a user-selected file into a `data:` URI.
pub(crate) async fn read_as_data_uri(file: &web_sys::File) -> Result<String, String> {
    let reader = web_sys::FileReader::new().map_err(|e| js_error_message(&e))?;

    let promise = Promise::new(&mut |resolve, reject| {
        let r = reader.clone();
        let onload = Closure::once_into_js(move || {
            let result = r.result().unwrap_or(JsValue::NULL);
            let _ = resolve.call1(&JsValue::NULL, &result);
        });
        let onerror = Closure::once_into_js(move || {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("could not read file"));
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        reader.set_onerror(Some(onerror.unchecked_ref()));
    });

    reader
        .read_as_data_url(file)
        .map_err(|e| js_error_message(&e))?;

    let value = JsFuture::from(promise)
        .await
        .map_err(|e| js_error_message(&e))?;

    reader.set_onload(None);
    reader.set_onerror(None);

    value
        .as_string()
        .ok_or_else(|| "file reader returned no data".to_string())
}
