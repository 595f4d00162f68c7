use crate::components::board::BoardView;
use crate::components::dialogs::Dialogs;
use crate::config::BoardConfig;
use crate::menu::{anchor_below, next_menu, MenuAction, MenuTarget, OpenMenu, TRIGGER_ATTR};
use crate::state::{AppContext, AppState};
use crate::storage;
use crate::util::closest;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Read the stored board, then reveal the container whatever the outcome.
fn load_stored_board(state: AppState) {
    spawn_local(async move {
        let key = state.storage_key();
        match storage::load_board(&key).await {
            Ok(Some(board)) => {
                log::info!("loaded board with {} categories", board.categories.len());
                state.board.set(board);
            }
            Ok(None) => log::info!("nothing stored under {key:?}, starting empty"),
            Err(e) => log::warn!("ignoring stored board: {e}"),
        }
        state.loaded.set(true);
    });
}

/// Keep this page in step with writes made by other pages. The subscription
/// lives as long as the app.
fn follow_other_pages(state: AppState) {
    match storage::subscribe(state.storage_key(), move |change| state.apply_remote(change)) {
        Ok(subscription) => {
            let subscription = StoredValue::new_local(Some(subscription));
            on_cleanup(move || {
                subscription.update_value(|s| {
                    s.take();
                })
            });
        }
        Err(e) => log::warn!("storage changes from other pages will not be followed: {e}"),
    }
}

/// One app-wide click listener opens, toggles and dismisses meatball menus.
fn install_menu_listeners(state: AppState) {
    let click = window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
        let trigger = closest(ev.target(), &format!("[{TRIGGER_ATTR}]"));
        let clicked = trigger
            .as_ref()
            .and_then(|el| el.get_attribute(TRIGGER_ATTR))
            .and_then(|raw| MenuTarget::from_attr(&raw));

        let action = state
            .menu
            .with_untracked(|m| next_menu(m.as_ref().map(|m| &m.target), clicked));

        match action {
            MenuAction::Nothing => {}
            MenuAction::Close => state.menu.set(None),
            MenuAction::Open(target) => {
                let Some(el) = trigger.and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) else {
                    return;
                };
                let (top, left) = anchor_below(
                    f64::from(el.offset_top()),
                    f64::from(el.offset_left()),
                    f64::from(el.offset_height()),
                    f64::from(el.offset_width()),
                );
                state.menu.set(Some(OpenMenu { target, top, left }));
            }
        }
    });

    // Any drag, wherever it starts, dismisses the open menu.
    let drag_start = window_event_listener(ev::dragstart, move |_| {
        if state.menu.with_untracked(Option::is_some) {
            state.menu.set(None);
        }
    });

    on_cleanup(move || {
        click.remove();
        drag_start.remove();
    });
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new(BoardConfig::load());
    provide_context(AppContext(state));

    load_stored_board(state);
    follow_other_pages(state);
    install_menu_listeners(state);

    view! {
        <main class="min-h-screen bg-background text-foreground">
            <BoardView />
            <Dialogs />
        </main>
    }
}
