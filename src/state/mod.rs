pub(crate) mod dialog;
pub(crate) mod tooltip;

use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use wasm_bindgen::JsCast;

use crate::config::BoardConfig;
use crate::forms::validation::ValidationError;
use crate::menu::OpenMenu;
use crate::models::{Board, ItemId};
use crate::storage::{self, StorageChange, SyncAction};
pub(crate) use dialog::{DialogState, FormFields};
use tooltip::{dismiss_serial, offer_tooltip, FieldTooltip};

/// Only a mutation that succeeded and changed something is written back.
fn needs_write<E>(outcome: &Result<bool, E>) -> bool {
    matches!(outcome, Ok(true))
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<BoardConfig>,

    /// Source of truth; everything on screen is rendered from it.
    pub board: RwSignal<Board>,
    /// False until the stored board has been read; the container stays hidden.
    pub loaded: RwSignal<bool>,

    pub dialog: RwSignal<DialogState>,
    pub fields: FormFields,

    pub menu: RwSignal<Option<OpenMenu>>,
    pub tooltip: RwSignal<Option<FieldTooltip>>,

    /// Item a pointer is down on (draggable="true" while set).
    pub armed: RwSignal<Option<ItemId>>,
    /// Item being dragged (rendered with the `dragging` class).
    pub dragging: RwSignal<Option<ItemId>>,

    /// Escape-key listener of the open dialog session.
    escape_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl AppState {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config: StoredValue::new(config),
            board: RwSignal::new(Board::default()),
            loaded: RwSignal::new(false),
            dialog: RwSignal::new(DialogState::Closed),
            fields: FormFields::new(),
            menu: RwSignal::new(None),
            tooltip: RwSignal::new(None),
            armed: RwSignal::new(None),
            dragging: RwSignal::new(None),
            escape_handle: StoredValue::new(None),
        }
    }

    pub fn storage_key(&self) -> String {
        self.config.with_value(|c| c.storage_key.clone())
    }

    pub fn persist(&self) {
        let key = self.storage_key();
        self.board.with_untracked(|b| storage::save_board(&key, b));
    }

    /// Apply a mutation; persist only when it reports a change.
    pub fn commit(&self, mutate: impl FnOnce(&mut Board) -> bool) -> bool {
        let mut changed = false;
        self.board.maybe_update(|b| {
            changed = mutate(b);
            changed
        });
        if changed {
            self.persist();
        }
        changed
    }

    pub fn try_commit(
        &self,
        mutate: impl FnOnce(&mut Board) -> Result<bool, ValidationError>,
    ) -> Result<bool, ValidationError> {
        let mut outcome = Ok(false);
        self.board.maybe_update(|b| {
            outcome = mutate(b);
            needs_write(&outcome)
        });
        if needs_write(&outcome) {
            self.persist();
        }
        outcome
    }

    /// Overwrite the local board from another tab's write.
    pub fn apply_remote(&self, change: StorageChange) {
        let action = self.board.with_untracked(|b| storage::sync_action(&change, b));
        if let SyncAction::Replace(board) = action {
            log::debug!("board replaced by change from another page");
            self.board.set(board);
        }
    }

    /* ---------------------------- dialogs ---------------------------- */

    /// Start a dialog session. Any previous session is ended first; the
    /// session's Escape listener is released by `close_dialog` on every exit.
    pub fn open_dialog(&self, next: DialogState) {
        self.end_dialog_session();
        self.menu.set(None);
        self.tooltip.set(None);
        self.fields.reset();
        self.board.with_untracked(|b| self.fields.prefill(&next, b));

        let state = *self;
        let handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Escape" {
                ev.prevent_default();
                state.close_dialog();
            }
        });
        self.escape_handle.set_value(Some(handle));
        self.dialog.set(next);
    }

    /// The one exit routine for every dialog: submit, cancel, Escape, close.
    pub fn close_dialog(&self) {
        self.end_dialog_session();
        self.fields.reset();
        self.tooltip.set(None);
        if self.dialog.with_untracked(DialogState::is_open) {
            self.dialog.set(DialogState::Closed);
        }
    }

    fn end_dialog_session(&self) {
        let mut taken = None;
        self.escape_handle.update_value(|h| taken = h.take());
        if let Some(handle) = taken {
            handle.remove();
        }
    }

    /* ---------------------------- tooltips --------------------------- */

    /// Show a validation tooltip unless one is already up.
    pub fn show_tooltip(&self, err: &ValidationError) -> Option<u64> {
        log::debug!("validation failed: {err}");
        let mut serial = None;
        self.tooltip.maybe_update(|slot| {
            serial = offer_tooltip(slot, err.anchor(), err.to_string());
            serial.is_some()
        });
        serial
    }

    pub fn clear_tooltip(&self) {
        if self.tooltip.with_untracked(Option::is_some) {
            self.tooltip.set(None);
        }
    }

    pub fn dismiss_tooltip_after(&self, serial: u64, ms: i32) {
        let tooltip = self.tooltip;
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            tooltip.maybe_update(|slot| dismiss_serial(slot, serial));
        });
        if let Err(e) = window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms)
        {
            log::warn!("tooltip timer not set: {}", crate::util::js_error_message(&e));
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_write_only_on_change() {
        assert!(needs_write::<ValidationError>(&Ok(true)));
        assert!(!needs_write::<ValidationError>(&Ok(false)));
        assert!(!needs_write(&Err(ValidationError::EmptyTitle)));
    }
}
