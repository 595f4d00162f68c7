use leptos::prelude::*;

use crate::forms::{CategoryMode, DeleteTarget, IconChoice, LinkMode};
use crate::models::Board;

/// The single modal slot. Being an enum, at most one dialog can be open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum DialogState {
    #[default]
    Closed,
    Category(CategoryMode),
    Link(LinkMode),
    Prompt(DeleteTarget),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }
}

/// Values bound to the dialog inputs. Shared by create and edit sessions and
/// cleared whenever a session ends.
#[derive(Clone, Copy)]
pub(crate) struct FormFields {
    pub title: RwSignal<String>,
    pub link_name: RwSignal<String>,
    pub link_url: RwSignal<String>,
    pub icon: RwSignal<IconChoice>,
}

impl FormFields {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            link_name: RwSignal::new(String::new()),
            link_url: RwSignal::new(String::new()),
            icon: RwSignal::new(IconChoice::Site),
        }
    }

    pub fn reset(&self) {
        self.title.set(String::new());
        self.link_name.set(String::new());
        self.link_url.set(String::new());
        self.icon.set(IconChoice::Site);
    }

    /// Pre-fill from the item an edit session targets.
    pub fn prefill(&self, dialog: &DialogState, board: &Board) {
        match dialog {
            DialogState::Category(CategoryMode::Edit(id)) => {
                if let Some(c) = board.category(id) {
                    self.title.set(c.title.clone());
                }
            }
            DialogState::Link(LinkMode::Edit { link }) => {
                if let Some(l) = board.link(link) {
                    self.link_url.set(l.url.clone());
                    self.link_name.set(l.name.clone());
                    self.icon.set(IconChoice::Keep(l.favicon.clone()));
                }
            }
            _ => {}
        }
    }
}

impl Default for FormFields {
    fn default() -> Self {
        Self::new()
    }
}
