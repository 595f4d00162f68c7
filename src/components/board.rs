use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::ui::{Button, ButtonSize, ButtonVariant, Spinner};
use crate::drag::draggable_attr;
use crate::drag::session::on_pointer_down;
use crate::forms::{CategoryMode, DeleteTarget, LinkMode};
use crate::menu::MenuTarget;
use crate::models::ItemId;
use crate::state::{AppContext, AppState, DialogState};
use crate::storage::extension;

/// `draggable` for anchors and images inside items: off while anything is
/// armed so the native drag starts from the item itself.
fn inner_draggable(state: AppState) -> impl Fn() -> Option<&'static str> + Copy {
    move || state.armed.with(|a| a.as_ref().map(|_| "false"))
}

fn item_class(base: &'static str, dragging: bool) -> String {
    if dragging {
        format!("{base} dragging opacity-40")
    } else {
        base.to_string()
    }
}

#[component]
pub fn BoardView() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let container_ref = NodeRef::<html::Div>::new();

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if let Some(container) = container_ref.get_untracked() {
            on_pointer_down(state, &container, &ev);
        }
    };

    view! {
        <Show when=move || !state.loaded.get() fallback=|| ().into_view()>
            <div class="flex justify-center py-16 text-muted-foreground">
                <Spinner class="size-5" />
            </div>
        </Show>

        <div
            id="container"
            node_ref=container_ref
            class="flex flex-wrap items-start gap-4 p-6"
            class:hidden=move || !state.loaded.get()
            on:pointerdown=on_pointerdown
        >
            <For
                each=move || state.board.with(|b| b.category_ids())
                key=|id| id.clone()
                children=move |id| view! { <CategoryCard id=id /> }
            />

            <Button
                variant=ButtonVariant::Dashed
                class="h-12 w-64 shrink-0"
                on:click=move |_| state.open_dialog(DialogState::Category(CategoryMode::Create))
            >
                "+ New category"
            </Button>
        </div>
    }
}

#[component]
fn CategoryCard(id: ItemId) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let title = {
        let id = id.clone();
        move || {
            state
                .board
                .with(|b| b.category(&id).map(|c| c.title.clone()))
                .unwrap_or_default()
        }
    };
    let class = {
        let id = id.clone();
        move || {
            let dragging = state.dragging.with(|d| d.as_ref() == Some(&id));
            item_class(
                "relative flex w-64 shrink-0 flex-col gap-2 rounded-md border border-border bg-background p-2 shadow-xs",
                dragging,
            )
        }
    };
    let draggable = {
        let id = id.clone();
        move || state.armed.with(|a| draggable_attr(a.as_ref(), &id))
    };
    let link_ids = {
        let id = id.clone();
        move || state.board.with(|b| b.link_ids(&id))
    };
    let create_link = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| {
            state.open_dialog(DialogState::Link(LinkMode::Create {
                category: id.clone(),
            }))
        }
    };

    let category_attr = id.to_string();

    view! {
        <section data-category-id=category_attr class=class draggable=draggable>
            <div data-category-title="" class="group flex cursor-grab items-center justify-between gap-2 px-1 py-1">
                <h2 class="truncate text-sm font-semibold">{title}</h2>
                <MenuTrigger target=MenuTarget::Category(id.clone()) />
            </div>
            <ContextMenu target=MenuTarget::Category(id.clone()) />

            <ul class="flex flex-col gap-0.5">
                <For
                    each=link_ids
                    key=|id| id.clone()
                    children=move |id| view! { <LinkRow id=id /> }
                />
            </ul>

            <Button
                variant=ButtonVariant::Dashed
                size=ButtonSize::Block
                attr:data-create-link=id.to_string()
                on:click=create_link
            >
                "+ Create link"
            </Button>
        </section>
    }
}

#[component]
fn LinkRow(id: ItemId) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let link = {
        let id = id.clone();
        move || state.board.with(|b| b.link(&id).cloned())
    };
    let class = {
        let id = id.clone();
        move || {
            let dragging = state.dragging.with(|d| d.as_ref() == Some(&id));
            item_class(
                "group relative flex items-center gap-2 rounded-sm px-1 py-1 hover:bg-accent",
                dragging,
            )
        }
    };
    let draggable = {
        let id = id.clone();
        move || state.armed.with(|a| draggable_attr(a.as_ref(), &id))
    };
    let inner = inner_draggable(state);
    let link_attr = id.to_string();

    view! {
        <li data-link-id=link_attr class=class draggable=draggable>
            {move || {
                link()
                    .map(|l| {
                        view! {
                            <img
                                src=l.favicon.src().to_string()
                                alt=""
                                class="size-4 shrink-0 rounded-xs"
                                draggable=inner
                            />
                            <a
                                href=l.url.clone()
                                title=l.url.clone()
                                class="min-w-0 flex-1 truncate text-sm"
                                draggable=inner
                            >
                                {l.name.clone()}
                            </a>
                        }
                    })
            }}
            <MenuTrigger target=MenuTarget::Link(id.clone()) />
            <ContextMenu target=MenuTarget::Link(id.clone()) />
        </li>
    }
}

/// Meatball button. Clicks are handled by the app-wide menu listener, which
/// reads the target back from the trigger attribute.
#[component]
fn MenuTrigger(target: MenuTarget) -> impl IntoView {
    view! {
        <button
            type="button"
            data-menu-trigger=target.to_attr()
            aria-label="More actions"
            aria-haspopup="menu"
            class="shrink-0 rounded-sm p-1 text-muted-foreground opacity-0 group-hover:opacity-100 focus:opacity-100 hover:bg-accent hover:text-foreground"
        >
            <svg
                xmlns="http://www.w3.org/2000/svg"
                width="16"
                height="16"
                viewBox="0 0 24 24"
                fill="currentColor"
                class="pointer-events-none"
                aria-hidden="true"
            >
                <circle cx="5" cy="12" r="1.75" />
                <circle cx="12" cy="12" r="1.75" />
                <circle cx="19" cy="12" r="1.75" />
            </svg>
        </button>
    }
}

fn open_in_new_tab(url: &str) {
    if let Err(e) = window().open_with_url_and_target(url, "_blank") {
        log::warn!("could not open tab: {}", crate::util::js_error_message(&e));
    }
}

fn open_in_new_window(url: String) {
    if !extension::api_available(&["windows", "create"]) {
        if let Err(e) = window().open_with_url_and_target_and_features(&url, "_blank", "popup") {
            log::warn!("could not open window: {}", crate::util::js_error_message(&e));
        }
        return;
    }
    spawn_local(async move {
        if let Err(e) = extension::open_window(&url).await {
            log::warn!("could not open window: {e}");
        }
    });
}

#[component]
fn ContextMenu(target: MenuTarget) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let target = StoredValue::new(target);

    let position = move || {
        state.menu.with(|m| {
            m.as_ref()
                .filter(|m| target.with_value(|t| m.target == *t))
                .map(|m| (m.top, m.left))
        })
    };

    let on_edit = move |_: web_sys::MouseEvent| {
        let next = match target.get_value() {
            MenuTarget::Category(id) => DialogState::Category(CategoryMode::Edit(id)),
            MenuTarget::Link(link) => DialogState::Link(LinkMode::Edit { link }),
        };
        state.open_dialog(next);
    };
    let on_remove = move |_: web_sys::MouseEvent| {
        let next = match target.get_value() {
            MenuTarget::Category(id) => DeleteTarget::Category(id),
            MenuTarget::Link(id) => DeleteTarget::Link(id),
        };
        state.open_dialog(DialogState::Prompt(next));
    };

    let link_url = move || match target.get_value() {
        MenuTarget::Link(id) => state.board.with_untracked(|b| b.link(&id).map(|l| l.url.clone())),
        MenuTarget::Category(_) => None,
    };
    let is_link = target.with_value(|t| matches!(t, MenuTarget::Link(_)));

    const ITEM: &str =
        "w-full rounded-sm px-3 py-1.5 text-left text-sm hover:bg-accent hover:text-accent-foreground";

    move || {
        position().map(|(top, left)| {
            view! {
                <div
                    data-context-menu=""
                    role="menu"
                    class="absolute z-40 flex min-w-36 -translate-x-1/2 flex-col rounded-md border border-border bg-background p-1 shadow-md"
                    style=format!("top: {top}px; left: {left}px;")
                >
                    <Show when=move || is_link fallback=|| ().into_view()>
                        <button
                            type="button"
                            role="menuitem"
                            class=ITEM
                            on:click=move |_| {
                                state.menu.set(None);
                                if let Some(url) = link_url() {
                                    open_in_new_tab(&url);
                                }
                            }
                        >
                            "Open in new tab"
                        </button>
                        <button
                            type="button"
                            role="menuitem"
                            class=ITEM
                            on:click=move |_| {
                                state.menu.set(None);
                                if let Some(url) = link_url() {
                                    open_in_new_window(url);
                                }
                            }
                        >
                            "Open in new window"
                        </button>
                    </Show>
                    <button type="button" role="menuitem" class=ITEM on:click=on_edit>
                        "Edit"
                    </button>
                    <button type="button" role="menuitem" class=format!("{ITEM} text-destructive") on:click=on_remove>
                        "Remove"
                    </button>
                </div>
            }
        })
    }
}
