//! Menu Store Bindings
//!
//! The editor reaches the store only through `MenuApi`. Results carry plain
//! string errors, the shape command bindings hand back.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::{CategoryId, ItemId, MenuItem, SideName};

mod local;

#[cfg(test)]
pub(crate) mod testing;

pub use local::LocalMenuApi;

#[async_trait]
pub trait MenuApi: Send + Sync {
    /// Every category with its items in stored order
    async fn fetch_categories(&self) -> Result<BTreeMap<CategoryId, Vec<MenuItem>>, String>;

    async fn fetch_category_order(&self) -> Result<Vec<CategoryId>, String>;

    async fn set_category_order(&self, order: &[CategoryId]) -> Result<(), String>;

    async fn set_item_order(&self, category: &str, order: &[ItemId]) -> Result<(), String>;

    /// Move `item` into `category`; the store appends it at the end
    async fn set_item_category(&self, item: &str, category: &str) -> Result<(), String>;

    /// Save an item's side order; returns the order the store kept
    async fn set_side_order(&self, item: &str, order: &[SideName]) -> Result<Vec<SideName>, String>;
}
