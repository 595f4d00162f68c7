//! Drag-and-drop reordering.
//!
//! `DragMachine` is the pure state machine; `session` wires it to the DOM and
//! owns the listeners that live for exactly one drag.

pub(crate) mod session;

use crate::board::Placement;
use crate::models::ItemId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum DragKind {
    Category,
    Link,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DragPhase {
    Idle,
    /// Pointer is down on an item; a native drag may or may not follow.
    Armed { kind: DragKind, item: ItemId },
    Dragging { kind: DragKind, item: ItemId },
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DragExit {
    /// Pointer released before any drag started; nothing moved.
    Released,
    /// A drag ran to completion (dropped or cancelled); order may have changed.
    Settled,
}

impl DragExit {
    pub fn should_persist(self) -> bool {
        matches!(self, DragExit::Settled)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DragMachine {
    phase: DragPhase,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }
}

impl DragMachine {
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    /// Idle → Armed. Only a primary-button press outside a context menu arms.
    pub fn pointer_down(
        &mut self,
        kind: DragKind,
        item: ItemId,
        button: i16,
        inside_context_menu: bool,
    ) -> bool {
        if !self.is_idle() || button != 0 || inside_context_menu {
            return false;
        }
        self.phase = DragPhase::Armed { kind, item };
        true
    }

    /// Armed → Dragging.
    pub fn drag_start(&mut self) -> Option<(DragKind, ItemId)> {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Armed { kind, item } => {
                self.phase = DragPhase::Dragging {
                    kind,
                    item: item.clone(),
                };
                Some((kind, item))
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Item currently being dragged, if any.
    pub fn dragging(&self) -> Option<(DragKind, &ItemId)> {
        match &self.phase {
            DragPhase::Dragging { kind, item } => Some((*kind, item)),
            _ => None,
        }
    }

    /// Any exit (pointer-up, drag-end, drop) returns the machine to Idle.
    /// Calling it again once idle is a no-op.
    pub fn finish(&mut self) -> Option<DragExit> {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Idle => None,
            DragPhase::Armed { .. } => Some(DragExit::Released),
            DragPhase::Dragging { .. } => Some(DragExit::Settled),
        }
    }
}

/// Placement of a dragged category relative to the category under the pointer.
///
/// The left half of the target pushes the dragged category after it and the
/// right half before it; the target therefore swaps past the dragged item as
/// soon as the pointer enters it from either side.
pub(crate) fn category_placement(pointer_x: f64, left: f64, right: f64) -> Placement {
    let mid = (left + right) / 2.0;
    if pointer_x <= mid {
        Placement::After
    } else {
        Placement::Before
    }
}

/// Placement of a dragged link relative to the link under the pointer.
pub(crate) fn link_placement(pointer_y: f64, top: f64, bottom: f64) -> Placement {
    let mid = (top + bottom) / 2.0;
    if pointer_y <= mid {
        Placement::Before
    } else {
        Placement::After
    }
}

/// `draggable` attribute for an item while `armed` is the item a pointer is
/// down on: only the armed item is draggable, everything else is explicitly
/// not, and with nothing armed the attribute is absent.
pub(crate) fn draggable_attr(armed: Option<&ItemId>, item: &ItemId) -> Option<&'static str> {
    match armed {
        Some(a) if a == item => Some("true"),
        Some(_) => Some("false"),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LinkDrop;
    use crate::models::{Board, Category, Favicon, Link};

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn test_pointer_down_arms_only_on_primary_button() {
        let mut m = DragMachine::default();
        assert!(!m.pointer_down(DragKind::Link, id("l1"), 2, false));
        assert!(m.is_idle());
        assert!(!m.pointer_down(DragKind::Link, id("l1"), 0, true));
        assert!(m.is_idle());
        assert!(m.pointer_down(DragKind::Link, id("l1"), 0, false));
        assert_eq!(
            m.phase(),
            &DragPhase::Armed {
                kind: DragKind::Link,
                item: id("l1")
            }
        );
    }

    #[test]
    fn test_second_pointer_down_does_not_rearm() {
        let mut m = DragMachine::default();
        assert!(m.pointer_down(DragKind::Category, id("c1"), 0, false));
        assert!(!m.pointer_down(DragKind::Link, id("l1"), 0, false));
        assert_eq!(m.drag_start(), Some((DragKind::Category, id("c1"))));
    }

    #[test]
    fn test_release_without_drag_does_not_persist() {
        let mut m = DragMachine::default();
        m.pointer_down(DragKind::Link, id("l1"), 0, false);
        let exit = m.finish().expect("armed session ends");
        assert_eq!(exit, DragExit::Released);
        assert!(!exit.should_persist());
        assert!(m.is_idle());
    }

    #[test]
    fn test_completed_drag_persists_once() {
        let mut m = DragMachine::default();
        m.pointer_down(DragKind::Link, id("l1"), 0, false);
        m.drag_start();
        assert_eq!(m.dragging(), Some((DragKind::Link, &id("l1"))));

        assert_eq!(m.finish(), Some(DragExit::Settled));
        // drop followed by dragend: second exit is a no-op
        assert_eq!(m.finish(), None);
    }

    #[test]
    fn test_drag_start_without_arming_is_ignored() {
        let mut m = DragMachine::default();
        assert_eq!(m.drag_start(), None);
        assert!(m.is_idle());
    }

    #[test]
    fn test_machine_is_reusable_after_finish() {
        let mut m = DragMachine::default();
        m.pointer_down(DragKind::Link, id("l1"), 0, false);
        m.drag_start();
        m.finish();

        assert!(m.pointer_down(DragKind::Link, id("l2"), 0, false));
        assert_eq!(m.drag_start(), Some((DragKind::Link, id("l2"))));
    }

    #[test]
    fn test_link_placement_by_vertical_midpoint() {
        // target spans y = 100..140, midpoint 120
        assert_eq!(link_placement(105.0, 100.0, 140.0), Placement::Before);
        assert_eq!(link_placement(120.0, 100.0, 140.0), Placement::Before);
        assert_eq!(link_placement(121.0, 100.0, 140.0), Placement::After);
    }

    #[test]
    fn test_category_placement_by_horizontal_midpoint() {
        assert_eq!(category_placement(10.0, 0.0, 200.0), Placement::After);
        assert_eq!(category_placement(150.0, 0.0, 200.0), Placement::Before);
    }

    fn link(s: &str) -> Link {
        Link {
            id: id(s),
            name: s.to_string(),
            url: format!("https://{s}.example/"),
            favicon: Favicon::Service(String::new()),
        }
    }

    #[test]
    fn test_drop_above_and_below_target_link() {
        let mut b = Board {
            categories: vec![
                Category {
                    id: id("a"),
                    title: "A".into(),
                    links: vec![link("x"), link("y"), link("z")],
                },
                Category {
                    id: id("empty"),
                    title: "Empty".into(),
                    links: vec![],
                },
            ],
        };

        // Pointer above y's midpoint: z lands immediately before y.
        let p = link_placement(10.0, 0.0, 40.0);
        b.move_link(&id("z"), &LinkDrop::Beside(id("y"), p));
        assert_eq!(b.link_ids(&id("a")), vec![id("x"), id("z"), id("y")]);

        // Below x's midpoint: y lands immediately after x.
        let p = link_placement(35.0, 0.0, 40.0);
        b.move_link(&id("y"), &LinkDrop::Beside(id("x"), p));
        assert_eq!(b.link_ids(&id("a")), vec![id("x"), id("y"), id("z")]);

        // Over the empty category's create trigger: end of that category.
        b.move_link(&id("x"), &LinkDrop::CategoryEnd(id("empty")));
        assert_eq!(b.link_ids(&id("empty")), vec![id("x")]);
    }

    #[test]
    fn test_only_armed_item_is_draggable() {
        let a = id("a");
        let b = id("b");
        assert_eq!(draggable_attr(None, &a), None);
        assert_eq!(draggable_attr(Some(&a), &a), Some("true"));
        assert_eq!(draggable_attr(Some(&a), &b), Some("false"));
    }

    #[test]
    fn test_kind_names_in_logs() {
        assert_eq!(DragKind::Category.to_string(), "category");
        assert_eq!(DragKind::Link.to_string(), "link");
    }
}
