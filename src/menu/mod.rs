//! Meatball context menus.
//!
//! One global click listener feeds `next_menu`; the result is applied to the
//! single `Option<OpenMenu>` slot in app state.

use crate::models::ItemId;

/// Attribute carried by every meatball trigger: `category:<id>` or `link:<id>`.
pub(crate) const TRIGGER_ATTR: &str = "data-menu-trigger";
/// Marks an open context menu; pointer-downs inside never start a drag.
pub(crate) const MENU_ATTR: &str = "data-context-menu";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuTarget {
    Category(ItemId),
    Link(ItemId),
}

impl MenuTarget {
    pub fn to_attr(&self) -> String {
        match self {
            MenuTarget::Category(id) => format!("category:{id}"),
            MenuTarget::Link(id) => format!("link:{id}"),
        }
    }

    pub fn from_attr(raw: &str) -> Option<Self> {
        let (kind, id) = raw.split_once(':')?;
        if id.is_empty() {
            return None;
        }
        match kind {
            "category" => Some(MenuTarget::Category(ItemId::from(id))),
            "link" => Some(MenuTarget::Link(ItemId::from(id))),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OpenMenu {
    pub target: MenuTarget,
    /// Offset (px) from the trigger's offset parent.
    pub top: f64,
    pub left: f64,
}

/// Directly beneath the trigger, horizontally centred on it.
pub(crate) fn anchor_below(offset_top: f64, offset_left: f64, height: f64, width: f64) -> (f64, f64) {
    (offset_top + height, offset_left + width / 2.0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuAction {
    Nothing,
    Close,
    Open(MenuTarget),
}

/// What a click does, given the currently open menu and the trigger (if any)
/// the click landed on. Opening while another menu is open replaces it.
pub(crate) fn next_menu(open: Option<&MenuTarget>, clicked: Option<MenuTarget>) -> MenuAction {
    match (open, clicked) {
        (None, None) => MenuAction::Nothing,
        (Some(_), None) => MenuAction::Close,
        (Some(current), Some(t)) if *current == t => MenuAction::Close,
        (_, Some(t)) => MenuAction::Open(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: &str) -> MenuTarget {
        MenuTarget::Category(ItemId::from(id))
    }

    fn link(id: &str) -> MenuTarget {
        MenuTarget::Link(ItemId::from(id))
    }

    #[test]
    fn test_click_on_closed_trigger_opens() {
        assert_eq!(next_menu(None, Some(cat("a"))), MenuAction::Open(cat("a")));
    }

    #[test]
    fn test_second_trigger_replaces_open_menu() {
        let mut slot = Some(cat("a"));
        match next_menu(slot.as_ref(), Some(link("l1"))) {
            MenuAction::Open(t) => slot = Some(t),
            other => panic!("expected open, got {other:?}"),
        }
        assert_eq!(slot, Some(link("l1")));
    }

    #[test]
    fn test_clicking_open_trigger_toggles_closed() {
        assert_eq!(next_menu(Some(&link("l1")), Some(link("l1"))), MenuAction::Close);
    }

    #[test]
    fn test_click_elsewhere_closes_only_when_open() {
        assert_eq!(next_menu(Some(&cat("a")), None), MenuAction::Close);
        assert_eq!(next_menu(None, None), MenuAction::Nothing);
    }

    #[test]
    fn test_trigger_attr_roundtrip() {
        let t = link("3f2a");
        assert_eq!(t.to_attr(), "link:3f2a");
        assert_eq!(MenuTarget::from_attr(&t.to_attr()), Some(t));
        assert_eq!(MenuTarget::from_attr("folder:1"), None);
        assert_eq!(MenuTarget::from_attr("link:"), None);
        assert_eq!(MenuTarget::from_attr("garbage"), None);
    }

    #[test]
    fn test_anchor_is_below_and_centred() {
        assert_eq!(anchor_below(40.0, 100.0, 24.0, 30.0), (64.0, 115.0));
    }
}
