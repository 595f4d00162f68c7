use serde::{Deserialize, Serialize};

use crate::util::random_hex_id;

/// Stable identifier for a category or link.
///
/// Generated from random bytes rather than a counter so that two tabs creating
/// items at the same time never collide once their snapshots meet in storage.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub(crate) struct ItemId(pub String);

impl ItemId {
    pub fn generate() -> Self {
        Self(random_hex_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "src", rename_all = "snake_case")]
pub(crate) enum Favicon {
    /// Image served by the favicon-by-domain lookup service.
    Service(String),
    /// User-uploaded image embedded as a data URI.
    Uploaded(String),
}

impl Favicon {
    pub fn src(&self) -> &str {
        match self {
            Favicon::Service(s) | Favicon::Uploaded(s) => s,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Favicon::Uploaded(_))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Link {
    pub id: ItemId,
    pub name: String,
    pub url: String,
    pub favicon: Favicon,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Category {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// The whole persisted state: categories in display order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Board {
    #[serde(default)]
    pub categories: Vec<Category>,
}
