pub(crate) const DEFAULT_STORAGE_KEY: &str = "container";
pub(crate) const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=32&domain_url=";
pub(crate) const DEFAULT_UPLOAD_TOOLTIP_MS: i32 = 2000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoardConfig {
    /// Storage key holding the serialized board.
    pub storage_key: String,
    /// Prefix the (url-encoded) link URL is appended to for the favicon image.
    pub favicon_service: String,
    /// How long the rejected-upload tooltip stays up.
    pub upload_tooltip_ms: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            upload_tooltip_ms: DEFAULT_UPLOAD_TOOLTIP_MS,
        }
    }
}

impl BoardConfig {
    /// Defaults, overridden by `window.ENV.{STORAGE_KEY,FAVICON_SERVICE,UPLOAD_TOOLTIP_MS}`
    /// when the new-tab page defines them.
    pub fn load() -> Self {
        let mut cfg = Self::default();

        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return cfg;
        };
        if env.is_undefined() || !env.is_object() {
            return cfg;
        }

        let read = |name: &str| js_sys::Reflect::get(&env, &name.into()).ok();

        if let Some(key) = read("STORAGE_KEY").and_then(|v| v.as_string()) {
            cfg.apply_storage_key(&key);
        }
        if let Some(service) = read("FAVICON_SERVICE").and_then(|v| v.as_string()) {
            cfg.apply_favicon_service(&service);
        }
        if let Some(ms) = read("UPLOAD_TOOLTIP_MS").and_then(|v| v.as_f64()) {
            cfg.apply_upload_tooltip_ms(ms);
        }

        cfg
    }

    fn apply_storage_key(&mut self, key: &str) {
        if !key.trim().is_empty() {
            self.storage_key = key.trim().to_string();
        }
    }

    fn apply_favicon_service(&mut self, service: &str) {
        if service.starts_with("http://") || service.starts_with("https://") {
            self.favicon_service = service.to_string();
        } else {
            log::warn!("ignoring FAVICON_SERVICE without http(s) scheme: {service}");
        }
    }

    fn apply_upload_tooltip_ms(&mut self, ms: f64) {
        if ms.is_finite() && ms >= 0.0 && ms <= i32::MAX as f64 {
            self.upload_tooltip_ms = ms as i32;
        }
    }
}
