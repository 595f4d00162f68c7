//! What the category, link and delete dialogs do on confirmation.
//!
//! The components only collect field values; validation and the resulting
//! board mutation live here so they can be tested without a browser.

pub(crate) mod upload;
pub(crate) mod validation;

use url::Url;

use crate::models::{Board, Favicon, ItemId, Link};
use validation::{display_name, normalize_url, validate_title, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CategoryMode {
    Create,
    Edit(ItemId),
}

impl CategoryMode {
    pub fn heading(&self) -> &'static str {
        match self {
            CategoryMode::Create => "Create new category",
            CategoryMode::Edit(_) => "Edit category title",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LinkMode {
    Create { category: ItemId },
    Edit { link: ItemId },
}

impl LinkMode {
    pub fn heading(&self) -> &'static str {
        match self {
            LinkMode::Create { .. } => "Create new link",
            LinkMode::Edit { .. } => "Edit link",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DeleteTarget {
    Category(ItemId),
    Link(ItemId),
}

impl DeleteTarget {
    pub fn question(&self) -> &'static str {
        match self {
            DeleteTarget::Category(_) => "Are you sure you want to delete the entire category?",
            DeleteTarget::Link(_) => "Are you sure you want to delete the link?",
        }
    }

    pub fn warning(&self) -> &'static str {
        "This action cannot be undone."
    }
}

/// Icon selection state of the link form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum IconChoice {
    /// Use the favicon service for whatever URL is submitted.
    #[default]
    Site,
    /// Icon the edited link already has.
    Keep(Favicon),
    /// Freshly uploaded image.
    Upload { file_name: String, data_uri: String },
}

impl IconChoice {
    pub fn preview_src(&self) -> Option<&str> {
        match self {
            IconChoice::Site => None,
            IconChoice::Keep(f) => Some(f.src()),
            IconChoice::Upload { data_uri, .. } => Some(data_uri),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            IconChoice::Upload { file_name, .. } => Some(file_name),
            _ => None,
        }
    }
}

pub(crate) fn favicon_service_url(service: &str, url: &Url) -> String {
    format!("{service}{}", urlencoding::encode(url.as_str()))
}

/// Uploaded images win; an edited link keeps its own uploaded image unless the
/// preview was cleared; everything else comes from the favicon service.
pub(crate) fn resolve_favicon(icon: &IconChoice, url: &Url, service: &str) -> Favicon {
    match icon {
        IconChoice::Upload { data_uri, .. } => Favicon::Uploaded(data_uri.clone()),
        IconChoice::Keep(f) if f.is_uploaded() => f.clone(),
        IconChoice::Keep(_) | IconChoice::Site => Favicon::Service(favicon_service_url(service, url)),
    }
}

/// Returns whether the board changed.
pub(crate) fn submit_category(
    board: &mut Board,
    mode: &CategoryMode,
    title: &str,
) -> Result<bool, ValidationError> {
    let title = validate_title(title)?;
    Ok(match mode {
        CategoryMode::Create => {
            board.push_category(title);
            true
        }
        CategoryMode::Edit(id) => board.rename_category(id, title),
    })
}

pub(crate) struct LinkInput<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub icon: &'a IconChoice,
}

/// Returns whether the board changed.
pub(crate) fn submit_link(
    board: &mut Board,
    mode: &LinkMode,
    input: LinkInput<'_>,
    favicon_service: &str,
) -> Result<bool, ValidationError> {
    let url = normalize_url(input.url)?;
    let name = display_name(input.name, &url);
    let favicon = resolve_favicon(input.icon, &url, favicon_service);

    Ok(match mode {
        LinkMode::Create { category } => board.push_link(
            category,
            Link {
                id: ItemId::generate(),
                name,
                url: url.to_string(),
                favicon,
            },
        ),
        LinkMode::Edit { link } => board.update_link(link, &name, url.as_str(), favicon),
    })
}

pub(crate) fn confirm_delete(board: &mut Board, target: &DeleteTarget) -> bool {
    match target {
        DeleteTarget::Category(id) => board.remove_category(id).is_some(),
        DeleteTarget::Link(id) => board.remove_link(id).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FAVICON_SERVICE;

    fn board_with_category() -> (Board, ItemId) {
        let mut b = Board::default();
        let id = b.push_category("Dev");
        (b, id)
    }

    #[test]
    fn test_blank_category_title_creates_nothing() {
        let mut b = Board::default();
        let res = submit_category(&mut b, &CategoryMode::Create, "   ");
        assert_eq!(res, Err(ValidationError::EmptyTitle));
        assert!(b.categories.is_empty());
    }

    #[test]
    fn test_category_created_at_end() {
        let (mut b, first) = board_with_category();
        assert_eq!(submit_category(&mut b, &CategoryMode::Create, "News"), Ok(true));
        assert_eq!(b.categories.len(), 2);
        assert_eq!(b.categories[0].id, first);
        assert_eq!(b.categories[1].title, "News");
    }

    #[test]
    fn test_category_edit_renames_in_place() {
        let (mut b, id) = board_with_category();
        assert_eq!(submit_category(&mut b, &CategoryMode::Edit(id.clone()), "Work"), Ok(true));
        assert_eq!(b.category(&id).map(|c| c.title.as_str()), Some("Work"));
        // Unchanged title is not a change.
        assert_eq!(submit_category(&mut b, &CategoryMode::Edit(id), "Work"), Ok(false));
    }

    #[test]
    fn test_link_create_defaults_name_and_service_icon() {
        let (mut b, cat) = board_with_category();
        let icon = IconChoice::Site;
        let changed = submit_link(
            &mut b,
            &LinkMode::Create { category: cat.clone() },
            LinkInput { name: "", url: "example.com", icon: &icon },
            DEFAULT_FAVICON_SERVICE,
        );
        assert_eq!(changed, Ok(true));

        let link = &b.category(&cat).expect("category").links[0];
        assert_eq!(link.name, "example.com");
        assert_eq!(link.url, "https://example.com/");
        assert_eq!(
            link.favicon,
            Favicon::Service(format!("{DEFAULT_FAVICON_SERVICE}https%3A%2F%2Fexample.com%2F"))
        );
    }

    #[test]
    fn test_invalid_link_url_leaves_board_untouched() {
        let (mut b, cat) = board_with_category();
        let before = b.clone();
        let icon = IconChoice::Site;
        let res = submit_link(
            &mut b,
            &LinkMode::Create { category: cat },
            LinkInput { name: "x", url: "not a url", icon: &icon },
            DEFAULT_FAVICON_SERVICE,
        );
        assert_eq!(res, Err(ValidationError::InvalidUrl));
        assert_eq!(b, before);
    }

    #[test]
    fn test_uploaded_icon_wins_and_survives_edit() {
        let (mut b, cat) = board_with_category();
        let upload = IconChoice::Upload {
            file_name: "logo.png".to_string(),
            data_uri: "data:image/png;base64,AA==".to_string(),
        };
        submit_link(
            &mut b,
            &LinkMode::Create { category: cat.clone() },
            LinkInput { name: "Home", url: "home.example", icon: &upload },
            DEFAULT_FAVICON_SERVICE,
        )
        .expect("valid");
        let link = b.category(&cat).expect("category").links[0].clone();
        assert_eq!(link.favicon, Favicon::Uploaded("data:image/png;base64,AA==".to_string()));

        // Editing with the prefilled icon keeps the upload.
        let keep = IconChoice::Keep(link.favicon.clone());
        submit_link(
            &mut b,
            &LinkMode::Edit { link: link.id.clone() },
            LinkInput { name: "Home 2", url: "home.example", icon: &keep },
            DEFAULT_FAVICON_SERVICE,
        )
        .expect("valid");
        let edited = b.link(&link.id).expect("link");
        assert_eq!(edited.name, "Home 2");
        assert!(edited.favicon.is_uploaded());

        // Clearing the preview reverts to the service icon.
        submit_link(
            &mut b,
            &LinkMode::Edit { link: link.id.clone() },
            LinkInput { name: "Home 2", url: "home.example", icon: &IconChoice::Site },
            DEFAULT_FAVICON_SERVICE,
        )
        .expect("valid");
        assert!(!b.link(&link.id).expect("link").favicon.is_uploaded());
    }

    #[test]
    fn test_edit_recomputes_service_icon_for_new_url() {
        let (mut b, cat) = board_with_category();
        submit_link(
            &mut b,
            &LinkMode::Create { category: cat.clone() },
            LinkInput { name: "", url: "a.example", icon: &IconChoice::Site },
            DEFAULT_FAVICON_SERVICE,
        )
        .expect("valid");
        let link = b.category(&cat).expect("category").links[0].clone();

        let keep = IconChoice::Keep(link.favicon.clone());
        submit_link(
            &mut b,
            &LinkMode::Edit { link: link.id.clone() },
            LinkInput { name: "", url: "b.example", icon: &keep },
            DEFAULT_FAVICON_SERVICE,
        )
        .expect("valid");
        let edited = b.link(&link.id).expect("link");
        assert_eq!(edited.name, "b.example");
        assert!(edited.favicon.src().ends_with("https%3A%2F%2Fb.example%2F"));
    }

    #[test]
    fn test_confirm_delete_removes_target_only() {
        let (mut b, cat) = board_with_category();
        let other = b.push_category("Other");
        assert!(confirm_delete(&mut b, &DeleteTarget::Category(cat.clone())));
        assert!(!confirm_delete(&mut b, &DeleteTarget::Category(cat)));
        assert_eq!(b.category_ids(), vec![other]);
    }

    #[test]
    fn test_prompt_text_depends_on_target_kind() {
        let id = ItemId::from("x");
        assert!(DeleteTarget::Category(id.clone()).question().contains("entire category"));
        assert!(DeleteTarget::Link(id).question().contains("the link"));
    }

    #[test]
    fn test_icon_choice_preview() {
        assert_eq!(IconChoice::Site.preview_src(), None);
        let up = IconChoice::Upload {
            file_name: "a.jpg".into(),
            data_uri: "data:image/jpeg;base64,AA==".into(),
        };
        assert_eq!(up.preview_src(), Some("data:image/jpeg;base64,AA=="));
        assert_eq!(up.file_name(), Some("a.jpg"));
    }
}
