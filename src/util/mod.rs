use wasm_bindgen::JsCast;

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// 128 random bits, hex-encoded.
///
/// Falls back to a clock-seeded value if the platform RNG is unavailable, which
/// keeps id generation infallible for callers.
pub(crate) fn random_hex_id() -> String {
    let mut buf = [0u8; 16];
    if getrandom::getrandom(&mut buf).is_err() {
        log::warn!("getrandom unavailable; falling back to clock-seeded id");
        let seed = fallback_seed();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (seed.rotate_left((i as u32) * 8) & 0xff) as u8;
        }
    }
    to_hex(&buf)
}

fn fallback_seed() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);

    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    let clock = if cfg!(target_arch = "wasm32") {
        now_ms() as u64
    } else {
        0
    };
    clock ^ counter.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn js_error_message(err: &wasm_bindgen::JsValue) -> String {
    if let Some(s) = err.as_string() {
        s
    } else if let Some(obj) = err.dyn_ref::<js_sys::Object>() {
        obj.to_string()
            .as_string()
            .unwrap_or_else(|| "Unknown JS error".to_string())
    } else {
        "Unknown JS error".to_string()
    }
}

/// Nearest ancestor (or self) of an event target matching `selector`.
pub(crate) fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<web_sys::Element> {
    target
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(selector).ok().flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_pads_each_byte() {
        assert_eq!(to_hex(&[0x00, 0x0a, 0xff]), "000aff");
    }

    #[test]
    fn test_random_hex_id_is_32_hex_chars() {
        let id = random_hex_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_hex_ids_differ() {
        assert_ne!(random_hex_id(), random_hex_id());
    }
}
