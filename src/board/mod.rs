//! Tree operations on the board.
//!
//! Every mutation the UI performs goes through here; components only render.
//! Mutators return whether anything changed so callers can skip persistence
//! (and signal notification) on no-ops.

use crate::models::{Board, Category, Favicon, ItemId, Link};

/// Where a dragged item lands relative to its drop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum Placement {
    Before,
    After,
}

/// Drop target for a dragged link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LinkDrop {
    /// Next to another link.
    Beside(ItemId, Placement),
    /// End of a category, just before its "create link" trigger.
    CategoryEnd(ItemId),
}

impl Board {
    pub fn category(&self, id: &ItemId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn category_ids(&self) -> Vec<ItemId> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }

    pub fn link_ids(&self, category: &ItemId) -> Vec<ItemId> {
        self.category(category)
            .map(|c| c.links.iter().map(|l| l.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn link(&self, id: &ItemId) -> Option<&Link> {
        self.categories
            .iter()
            .flat_map(|c| c.links.iter())
            .find(|l| &l.id == id)
    }

    /// (category index, link index) of a link.
    fn link_position(&self, id: &ItemId) -> Option<(usize, usize)> {
        self.categories.iter().enumerate().find_map(|(ci, c)| {
            c.links
                .iter()
                .position(|l| &l.id == id)
                .map(|li| (ci, li))
        })
    }

    fn category_position(&self, id: &ItemId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == id)
    }

    pub fn push_category(&mut self, title: &str) -> ItemId {
        let id = ItemId::generate();
        self.categories.push(Category {
            id: id.clone(),
            title: title.to_string(),
            links: vec![],
        });
        id
    }

    pub fn rename_category(&mut self, id: &ItemId, title: &str) -> bool {
        match self.categories.iter_mut().find(|c| &c.id == id) {
            Some(c) if c.title != title => {
                c.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn remove_category(&mut self, id: &ItemId) -> Option<Category> {
        let idx = self.category_position(id)?;
        Some(self.categories.remove(idx))
    }

    pub fn push_link(&mut self, category: &ItemId, link: Link) -> bool {
        match self.categories.iter_mut().find(|c| &c.id == category) {
            Some(c) => {
                c.links.push(link);
                true
            }
            None => false,
        }
    }

    pub fn update_link(&mut self, id: &ItemId, name: &str, url: &str, favicon: Favicon) -> bool {
        let Some((ci, li)) = self.link_position(id) else {
            return false;
        };
        let link = &mut self.categories[ci].links[li];
        if link.name == name && link.url == url && link.favicon == favicon {
            return false;
        }
        link.name = name.to_string();
        link.url = url.to_string();
        link.favicon = favicon;
        true
    }

    pub fn remove_link(&mut self, id: &ItemId) -> Option<Link> {
        let (ci, li) = self.link_position(id)?;
        Some(self.categories[ci].links.remove(li))
    }

    /// Relocate `dragged` next to `target`. Returns false when the order is
    /// already as requested or either id is unknown.
    pub fn move_category(&mut self, dragged: &ItemId, target: &ItemId, placement: Placement) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(_)) = (self.category_position(dragged), self.category_position(target))
        else {
            return false;
        };

        let moving = self.categories.remove(from);
        // Target index must be looked up after removal.
        let Some(tidx) = self.category_position(target) else {
            self.categories.insert(from, moving);
            return false;
        };
        let to = match placement {
            Placement::Before => tidx,
            Placement::After => tidx + 1,
        };
        self.categories.insert(to, moving);
        to != from
    }

    /// Relocate a link within or across categories.
    pub fn move_link(&mut self, dragged: &ItemId, drop: &LinkDrop) -> bool {
        if let LinkDrop::Beside(target, _) = drop {
            if target == dragged || self.link_position(target).is_none() {
                return false;
            }
        }
        if let LinkDrop::CategoryEnd(cat) = drop {
            if self.category_position(cat).is_none() {
                return false;
            }
        }
        let Some((from_c, from_l)) = self.link_position(dragged) else {
            return false;
        };

        let moving = self.categories[from_c].links.remove(from_l);
        let (to_c, to_l) = match drop {
            LinkDrop::Beside(target, placement) => {
                // Present: checked above and distinct from the removed link.
                let Some((tc, tl)) = self.link_position(target) else {
                    self.categories[from_c].links.insert(from_l, moving);
                    return false;
                };
                match placement {
                    Placement::Before => (tc, tl),
                    Placement::After => (tc, tl + 1),
                }
            }
            LinkDrop::CategoryEnd(cat) => {
                let Some(tc) = self.category_position(cat) else {
                    self.categories[from_c].links.insert(from_l, moving);
                    return false;
                };
                (tc, self.categories[tc].links.len())
            }
        };
        self.categories[to_c].links.insert(to_l, moving);
        (to_c, to_l) != (from_c, from_l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str) -> Link {
        Link {
            id: ItemId::from(id),
            name: id.to_string(),
            url: format!("https://{id}.example/"),
            favicon: Favicon::Service(String::new()),
        }
    }

    fn category(id: &str, links: &[&str]) -> Category {
        Category {
            id: ItemId::from(id),
            title: id.to_uppercase(),
            links: links.iter().map(|l| link(l)).collect(),
        }
    }

    fn board() -> Board {
        Board {
            categories: vec![
                category("a", &["a1", "a2", "a3"]),
                category("b", &["b1"]),
                category("c", &[]),
            ],
        }
    }

    fn order(b: &Board) -> Vec<&str> {
        b.categories.iter().map(|c| c.id.as_str()).collect()
    }

    fn links_of<'a>(b: &'a Board, cat: &str) -> Vec<&'a str> {
        b.category(&ItemId::from(cat))
            .map(|c| c.links.iter().map(|l| l.id.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_push_category_appends_at_end() {
        let mut b = board();
        let id = b.push_category("News");
        assert_eq!(b.categories.len(), 4);
        assert_eq!(b.categories.last().map(|c| &c.id), Some(&id));
        assert_eq!(b.categories[3].title, "News");
    }

    #[test]
    fn test_rename_category_reports_change() {
        let mut b = board();
        assert!(b.rename_category(&ItemId::from("a"), "Work"));
        assert!(!b.rename_category(&ItemId::from("a"), "Work"));
        assert!(!b.rename_category(&ItemId::from("missing"), "x"));
    }

    #[test]
    fn test_remove_category_and_link() {
        let mut b = board();
        assert!(b.remove_link(&ItemId::from("a2")).is_some());
        assert_eq!(links_of(&b, "a"), vec!["a1", "a3"]);
        assert!(b.remove_category(&ItemId::from("b")).is_some());
        assert_eq!(order(&b), vec!["a", "c"]);
        assert!(b.remove_category(&ItemId::from("b")).is_none());
    }

    #[test]
    fn test_update_link_in_place() {
        let mut b = board();
        let fav = Favicon::Uploaded("data:image/png;base64,AA==".to_string());
        assert!(b.update_link(&ItemId::from("a2"), "Two", "https://two.example/", fav.clone()));
        let l = b.link(&ItemId::from("a2")).expect("link exists");
        assert_eq!(l.name, "Two");
        assert_eq!(l.favicon, fav);
        assert_eq!(links_of(&b, "a"), vec!["a1", "a2", "a3"]);
        assert!(!b.update_link(&ItemId::from("a2"), "Two", "https://two.example/", fav));
    }

    #[test]
    fn test_move_category_before_and_after() {
        let mut b = board();
        assert!(b.move_category(&ItemId::from("c"), &ItemId::from("a"), Placement::Before));
        assert_eq!(order(&b), vec!["c", "a", "b"]);

        assert!(b.move_category(&ItemId::from("c"), &ItemId::from("b"), Placement::After));
        assert_eq!(order(&b), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_category_noop_when_already_placed() {
        let mut b = board();
        assert!(!b.move_category(&ItemId::from("a"), &ItemId::from("b"), Placement::Before));
        assert!(!b.move_category(&ItemId::from("a"), &ItemId::from("a"), Placement::After));
        assert!(!b.move_category(&ItemId::from("a"), &ItemId::from("zz"), Placement::After));
        assert_eq!(order(&b), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_link_within_category() {
        let mut b = board();
        assert!(b.move_link(&ItemId::from("a3"), &LinkDrop::Beside(ItemId::from("a1"), Placement::Before)));
        assert_eq!(links_of(&b, "a"), vec!["a3", "a1", "a2"]);

        assert!(b.move_link(&ItemId::from("a3"), &LinkDrop::Beside(ItemId::from("a2"), Placement::After)));
        assert_eq!(links_of(&b, "a"), vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_move_link_across_categories() {
        let mut b = board();
        assert!(b.move_link(&ItemId::from("a1"), &LinkDrop::Beside(ItemId::from("b1"), Placement::After)));
        assert_eq!(links_of(&b, "a"), vec!["a2", "a3"]);
        assert_eq!(links_of(&b, "b"), vec!["b1", "a1"]);
    }

    #[test]
    fn test_move_link_into_empty_category_end() {
        let mut b = board();
        assert!(b.move_link(&ItemId::from("a2"), &LinkDrop::CategoryEnd(ItemId::from("c"))));
        assert_eq!(links_of(&b, "c"), vec!["a2"]);
        // Already last there.
        assert!(!b.move_link(&ItemId::from("a2"), &LinkDrop::CategoryEnd(ItemId::from("c"))));
    }

    #[test]
    fn test_move_link_rejects_self_and_unknown() {
        let mut b = board();
        let before = b.clone();
        assert!(!b.move_link(&ItemId::from("a1"), &LinkDrop::Beside(ItemId::from("a1"), Placement::After)));
        assert!(!b.move_link(&ItemId::from("a1"), &LinkDrop::Beside(ItemId::from("nope"), Placement::After)));
        assert!(!b.move_link(&ItemId::from("nope"), &LinkDrop::CategoryEnd(ItemId::from("c"))));
        assert!(!b.move_link(&ItemId::from("a1"), &LinkDrop::CategoryEnd(ItemId::from("nope"))));
        assert_eq!(b, before);
    }

    #[test]
    fn test_board_json_roundtrip_keeps_order_and_favicons() {
        let mut b = board();
        b.update_link(
            &ItemId::from("b1"),
            "b1",
            "https://b1.example/",
            Favicon::Uploaded("data:image/png;base64,AA==".to_string()),
        );
        let json = serde_json::to_string(&b).expect("serialize");
        assert!(json.contains(r#""kind":"uploaded""#));
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);
    }
}
