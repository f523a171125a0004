//! Update item and selection types
//!
//! An [`UpdateItem`] is one pending update as reported by the platform
//! update service. Items selected for processing are collected into a
//! [`SelectedSet`], which fixes the index order that download flags and
//! installation results are aligned against for the rest of the run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque service-assigned update identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateId(String);

impl UpdateId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UpdateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UpdateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UpdateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Update category as reported by the service
///
/// Only driver updates are eligible for this agent. The `Other` escape
/// keeps decoding total for categories the service may add later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateCategory {
    Driver,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driver => write!(f, "Driver"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// One pending update reported by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItem {
    /// Service-assigned identity
    pub id: UpdateId,
    /// Human-readable title shown in reports
    pub title: String,
    /// Service category
    pub category: UpdateCategory,
    /// Whether the payload has been fully acquired. The service flips
    /// this during the download stage.
    #[serde(default)]
    pub downloaded: bool,
}

impl UpdateItem {
    #[must_use]
    pub fn new(id: impl Into<UpdateId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: UpdateCategory::Driver,
            downloaded: false,
        }
    }

    /// Returns true when this item is a driver update
    #[must_use]
    pub fn is_driver(&self) -> bool {
        self.category == UpdateCategory::Driver
    }
}

/// Ordered set of updates selected for processing
///
/// Items are unique by [`UpdateId`] and keep the order in which the
/// service reported them. Index `i` here lines up with index `i` of the
/// per-item installation results for the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedSet {
    items: Vec<UpdateItem>,
}

impl SelectedSet {
    /// Build a selection from discovered items, dropping duplicate ids
    /// while keeping the first occurrence and its position.
    #[must_use]
    pub fn new(items: Vec<UpdateItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self { items }
    }

    /// Empty selection (used by dry-run)
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&UpdateItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpdateItem> {
        self.items.iter()
    }

    /// Mutable iteration for the acquisition stage, which updates each
    /// item's `downloaded` flag in place.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, UpdateItem> {
        self.items.iter_mut()
    }

    /// Mark one item's payload as acquired (or not)
    pub fn mark_downloaded(&mut self, index: usize, downloaded: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.downloaded = downloaded;
        }
    }

    /// Titles in selection order
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.items.iter().map(|item| item.title.clone()).collect()
    }

    /// Number of items whose payload was fully acquired
    #[must_use]
    pub fn downloaded_count(&self) -> usize {
        self.items.iter().filter(|item| item.downloaded).count()
    }
}

impl<'a> IntoIterator for &'a SelectedSet {
    type Item = &'a UpdateItem;
    type IntoIter = std::slice::Iter<'a, UpdateItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
