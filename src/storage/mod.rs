//! Persistence and cross-tab sync of the board snapshot.
//!
//! The whole board is stored as one JSON string under a single key. Writes are
//! fire-and-forget; every open new-tab page listens for changes to that key and
//! replaces its own board wholesale (last writer wins).

pub(crate) mod extension;

use crate::models::Board;
use crate::util::js_error_message;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Storage area name reported for both backends.
pub(crate) const LOCAL_AREA: &str = "local";

#[derive(Debug, thiserror::Error)]
pub(crate) enum StorageError {
    #[error("no storage backend available")]
    Unavailable,
    #[error("storage call failed: {0}")]
    Js(String),
    #[error("could not encode board: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("stored board is not valid: {0}")]
    Decode(#[source] serde_json::Error),
}

impl StorageError {
    pub(crate) fn from_js(err: JsValue) -> Self {
        Self::Js(js_error_message(&err))
    }
}

pub(crate) type StorageResult<T> = Result<T, StorageError>;

pub(crate) fn encode_board(board: &Board) -> StorageResult<String> {
    serde_json::to_string(board).map_err(StorageError::Encode)
}

pub(crate) fn decode_board(raw: &str) -> StorageResult<Board> {
    serde_json::from_str(raw).map_err(StorageError::Decode)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum Backend {
    /// `browser.storage.local`, shared by every page of the extension.
    Extension,
    /// `window.localStorage`, used when the page is opened outside an extension.
    LocalStorage,
}

impl Backend {
    pub fn detect() -> Self {
        if extension::api_available(&["storage", "local"]) {
            Backend::Extension
        } else {
            Backend::LocalStorage
        }
    }
}

fn local_storage() -> StorageResult<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

async fn read_raw(backend: Backend, key: &str) -> StorageResult<Option<String>> {
    match backend {
        Backend::Extension => extension::get_item(key).await,
        Backend::LocalStorage => local_storage()?
            .get_item(key)
            .map_err(StorageError::from_js),
    }
}

async fn write_raw(backend: Backend, key: &str, value: &str) -> StorageResult<()> {
    match backend {
        Backend::Extension => extension::set_item(key, value).await,
        Backend::LocalStorage => local_storage()?
            .set_item(key, value)
            .map_err(StorageError::from_js),
    }
}

/// Read the stored board. `Ok(None)` when nothing has been saved yet.
pub(crate) async fn load_board(key: &str) -> StorageResult<Option<Board>> {
    let backend = Backend::detect();
    log::debug!("loading board from {backend} storage");
    match read_raw(backend, key).await? {
        Some(raw) if !raw.is_empty() => decode_board(&raw).map(Some),
        _ => Ok(None),
    }
}

/// Write the board without waiting for the result.
pub(crate) fn save_board(key: &str, board: &Board) {
    let json = match encode_board(board) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("{e}");
            return;
        }
    };
    let key = key.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = write_raw(Backend::detect(), &key, &json).await {
            log::warn!("saving board failed: {e}");
        }
    });
}

/// One storage-change notification for the board key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StorageChange {
    pub area: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum SyncAction {
    Ignore,
    Replace(Board),
}

/// Decide whether an incoming change should overwrite the local board.
pub(crate) fn sync_action(change: &StorageChange, current: &Board) -> SyncAction {
    if change.area != LOCAL_AREA || change.old_value == change.new_value {
        return SyncAction::Ignore;
    }

    let incoming = match change.new_value.as_deref() {
        None | Some("") => Board::default(),
        Some(raw) => match decode_board(raw) {
            Ok(board) => board,
            Err(e) => {
                log::warn!("ignoring storage change: {e}");
                return SyncAction::Ignore;
            }
        },
    };

    if &incoming == current {
        SyncAction::Ignore
    } else {
        SyncAction::Replace(incoming)
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StorageDelta {
    #[serde(default)]
    old_value: Option<String>,
    #[serde(default)]
    new_value: Option<String>,
}

enum Listener {
    Extension(Closure<dyn FnMut(JsValue, JsValue)>),
    Window(Closure<dyn FnMut(web_sys::StorageEvent)>),
}

/// Live subscription to changes of the board key; dropping it detaches the
/// listener.
pub(crate) struct ChangeSubscription {
    listener: Listener,
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        match &self.listener {
            Listener::Extension(cb) => {
                if let Err(e) = extension::remove_change_listener(cb.as_ref().unchecked_ref()) {
                    log::warn!("{e}");
                }
            }
            Listener::Window(cb) => {
                if let Some(w) = web_sys::window() {
                    let _ = w.remove_event_listener_with_callback("storage", cb.as_ref().unchecked_ref());
                }
            }
        }
    }
}

pub(crate) fn subscribe(
    key: String,
    on_change: impl Fn(StorageChange) + 'static,
) -> StorageResult<ChangeSubscription> {
    match Backend::detect() {
        Backend::Extension => {
            let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |changes: JsValue, area: JsValue| {
                let Ok(delta) = js_sys::Reflect::get(&changes, &JsValue::from_str(&key)) else {
                    return;
                };
                if delta.is_undefined() {
                    return;
                }
                let delta: StorageDelta = match serde_wasm_bindgen::from_value(delta) {
                    Ok(d) => d,
                    Err(e) => {
                        log::warn!("unreadable storage change: {e}");
                        return;
                    }
                };
                on_change(StorageChange {
                    area: area.as_string().unwrap_or_default(),
                    old_value: delta.old_value,
                    new_value: delta.new_value,
                });
            });
            extension::add_change_listener(cb.as_ref().unchecked_ref())?;
            Ok(ChangeSubscription {
                listener: Listener::Extension(cb),
            })
        }
        Backend::LocalStorage => {
            let window = web_sys::window().ok_or(StorageError::Unavailable)?;
            let cb = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(move |ev: web_sys::StorageEvent| {
                // `key == None` means the whole area was cleared.
                if ev.key().is_some_and(|k| k != key) {
                    return;
                }
                on_change(StorageChange {
                    area: LOCAL_AREA.to_string(),
                    old_value: ev.old_value(),
                    new_value: ev.new_value(),
                });
            });
            window
                .add_event_listener_with_callback("storage", cb.as_ref().unchecked_ref())
                .map_err(StorageError::from_js)?;
            Ok(ChangeSubscription {
                listener: Listener::Window(cb),
            })
        }
    }
}
