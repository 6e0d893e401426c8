//! Menu Snapshot
//!
//! The whole menu in one value: categories with their items in stored order,
//! plus the explicit category order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use super::menu_item::MenuItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    /// Category name -> items ordered by position
    pub categories: BTreeMap<String, Vec<MenuItem>>,
    /// Category names in display order
    #[serde(default)]
    pub category_order: Vec<String>,
}

impl MenuSnapshot {
    pub fn item_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn find_item(&self, name: &str) -> Option<&MenuItem> {
        self.categories
            .values()
            .flat_map(|items| items.iter())
            .find(|item| item.name == name)
    }
}
