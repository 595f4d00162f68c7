//! DOM side of a drag: one `DragSession` per pointer-down, holding every
//! listener it attached. Ending the session (release, settle, or a stale
//! session found at the next pointer-down) detaches all of them.

use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, EventTarget};

use super::{category_placement, link_placement, DragKind, DragMachine, DragPhase};
use crate::board::LinkDrop;
use crate::menu::MENU_ATTR;
use crate::models::ItemId;
use crate::state::AppState;
use crate::util::{closest, js_error_message};

pub(crate) const CATEGORY_ID_ATTR: &str = "data-category-id";
pub(crate) const CATEGORY_TITLE_ATTR: &str = "data-category-title";
pub(crate) const LINK_ID_ATTR: &str = "data-link-id";
/// Carried by a category's "create link" trigger; value is the category id.
pub(crate) const CREATE_LINK_ATTR: &str = "data-create-link";
const DRAGGING_CLASS: &str = "dragging";

/// An attached DOM listener. Dropping the guard detaches it.
pub(crate) struct EventListenerGuard {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
    attached: bool,
}

impl EventListenerGuard {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
            attached: true,
        })
    }

    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

impl Drop for EventListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

struct DragSession {
    machine: DragMachine,
    container: Element,
    listeners: Vec<EventListenerGuard>,
}

thread_local! {
    static SESSION: RefCell<Option<DragSession>> = const { RefCell::new(None) };
}

fn with_session<R>(f: impl FnOnce(&mut DragSession) -> R) -> Option<R> {
    SESSION.with(|s| s.borrow_mut().as_mut().map(f))
}

fn attr_id(el: &Element, attr: &str) -> Option<ItemId> {
    el.get_attribute(attr)
        .filter(|v| !v.is_empty())
        .map(ItemId::from)
}

/// What the pointer went down on: a link, or a category's title row.
fn grab_target(target: Option<EventTarget>) -> Option<(DragKind, ItemId)> {
    if let Some(link) = closest(target.clone(), &format!("[{LINK_ID_ATTR}]")) {
        return attr_id(&link, LINK_ID_ATTR).map(|id| (DragKind::Link, id));
    }
    let title = closest(target, &format!("[{CATEGORY_TITLE_ATTR}]"))?;
    let category = title.closest(&format!("[{CATEGORY_ID_ATTR}]")).ok().flatten()?;
    attr_id(&category, CATEGORY_ID_ATTR).map(|id| (DragKind::Category, id))
}

/// Container `pointerdown`: arm a drag on the item under the pointer.
pub(crate) fn on_pointer_down(state: AppState, container: &Element, ev: &web_sys::PointerEvent) {
    if SESSION.with(|s| s.borrow().is_some()) {
        log::debug!("settling stale drag session");
        end_session(state);
    }

    let target = ev.target();
    let inside_menu = closest(target.clone(), &format!("[{MENU_ATTR}]")).is_some();
    let Some((kind, item)) = grab_target(target) else {
        return;
    };

    let mut machine = DragMachine::default();
    if !machine.pointer_down(kind, item.clone(), ev.button(), inside_menu) {
        return;
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let pointer_up = EventListenerGuard::attach(window.as_ref(), "pointerup", move |_| {
        let armed = with_session(|s| matches!(s.machine.phase(), DragPhase::Armed { .. }));
        if armed == Some(true) {
            end_session(state);
        }
    });
    let drag_start = EventListenerGuard::attach(container.as_ref(), "dragstart", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web_sys::DragEvent>() {
            on_drag_start(state, ev);
        }
    });

    let listeners = match (pointer_up, drag_start) {
        (Ok(a), Ok(b)) => vec![a, b],
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("could not arm {kind} drag: {}", js_error_message(&e));
            return;
        }
    };

    SESSION.with(|s| {
        *s.borrow_mut() = Some(DragSession {
            machine,
            container: container.clone(),
            listeners,
        })
    });
    state.armed.set(Some(item));
}

fn on_drag_start(state: AppState, ev: &web_sys::DragEvent) {
    let Some((started, container)) = with_session(|s| (s.machine.drag_start(), s.container.clone()))
    else {
        return;
    };
    let Some((kind, item)) = started else {
        return;
    };

    if let Some(dt) = ev.data_transfer() {
        let _ = dt.set_data("text/plain", item.as_str());
        dt.set_effect_allowed("move");
    }
    state.menu.set(None);
    state.dragging.set(Some(item));
    log::debug!("{kind} drag started");

    let target: &EventTarget = container.as_ref();
    let mut attached = vec![
        EventListenerGuard::attach(target, "dragover", move |ev| {
            if let Some(ev) = ev.dyn_ref::<web_sys::DragEvent>() {
                on_drag_over(state, ev);
            }
        }),
        EventListenerGuard::attach(target, "dragend", move |_| end_session(state)),
        EventListenerGuard::attach(target, "drop", move |ev| {
            ev.prevent_default();
            end_session(state);
        }),
    ];
    // A link moved to another category is re-rendered there and its source
    // node leaves the document; dragend still fires on that node.
    if let Some(source) = ev.target() {
        attached.push(EventListenerGuard::attach(&source, "dragend", move |_| {
            end_session(state)
        }));
    }

    let mut guards = Vec::with_capacity(attached.len());
    for guard in attached {
        match guard {
            Ok(g) => guards.push(g),
            Err(e) => log::warn!("drag listener not attached: {}", js_error_message(&e)),
        }
    }
    with_session(|s| s.listeners.extend(guards));
}

fn drag_candidate(ev: &web_sys::DragEvent, attr: &str, dragged: &ItemId) -> Option<(Element, ItemId)> {
    let el = closest(ev.target(), &format!("[{attr}]:not(.{DRAGGING_CLASS})"))?;
    let id = attr_id(&el, attr)?;
    (id != *dragged).then_some((el, id))
}

fn on_drag_over(state: AppState, ev: &web_sys::DragEvent) {
    ev.prevent_default();

    let Some((kind, dragged)) = with_session(|s| {
        s.machine
            .dragging()
            .map(|(kind, item)| (kind, item.clone()))
    })
    .flatten() else {
        return;
    };

    let x = f64::from(ev.client_x());
    let y = f64::from(ev.client_y());

    match kind {
        DragKind::Category => {
            let Some((el, target)) = drag_candidate(ev, CATEGORY_ID_ATTR, &dragged) else {
                return;
            };
            let rect = el.get_bounding_client_rect();
            let placement = category_placement(x, rect.left(), rect.right());
            state
                .board
                .maybe_update(|b| b.move_category(&dragged, &target, placement));
        }
        DragKind::Link => {
            let drop = if let Some(trigger) = closest(ev.target(), &format!("[{CREATE_LINK_ATTR}]")) {
                let Some(category) = attr_id(&trigger, CREATE_LINK_ATTR) else {
                    return;
                };
                LinkDrop::CategoryEnd(category)
            } else {
                let Some((el, target)) = drag_candidate(ev, LINK_ID_ATTR, &dragged) else {
                    return;
                };
                let rect = el.get_bounding_client_rect();
                LinkDrop::Beside(target, link_placement(y, rect.top(), rect.bottom()))
            };
            state.board.maybe_update(|b| b.move_link(&dragged, &drop));
        }
    }
}

/// Tear the current session down. Safe to call from inside one of its own
/// listeners: they are detached now and their closures dropped on a later
/// tick.
fn end_session(state: AppState) {
    let Some(mut session) = SESSION.with(|s| s.borrow_mut().take()) else {
        return;
    };
    let exit = session.machine.finish();
    for guard in &mut session.listeners {
        guard.detach();
    }
    let listeners = std::mem::take(&mut session.listeners);
    wasm_bindgen_futures::spawn_local(async move { drop(listeners) });

    state.armed.set(None);
    state.dragging.set(None);

    if let Some(exit) = exit {
        log::debug!("drag session ended: {exit:?}");
        if exit.should_persist() {
            state.persist();
        }
    }
}
