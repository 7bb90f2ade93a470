use crate::ExtractedItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Suggestions the user dismissed. Owned by the caller and passed in explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DismissedItems {
    keys: BTreeSet<String>,
}

impl DismissedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the item was already dismissed.
    pub fn dismiss(&mut self, item: &ExtractedItem) -> bool {
        self.keys.insert(item.key())
    }

    pub fn restore(&mut self, item: &ExtractedItem) -> bool {
        self.keys.remove(&item.key())
    }

    pub fn is_dismissed(&self, item: &ExtractedItem) -> bool {
        self.keys.contains(&item.key())
    }

    pub fn retain_visible(&self, items: Vec<ExtractedItem>) -> Vec<ExtractedItem> {
        items
            .into_iter()
            .filter(|item| !self.is_dismissed(item))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
