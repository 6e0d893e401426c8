//! Menu Membership Operations
//!
//! Moving an item from one category to another.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{normalize_category, DomainError, DomainResult, MenuItem};
use super::menu_positioning::{next_item_position, reindex_items};
use super::menu_repo::{category_exists, not_initialized, now_millis, require_item, MenuRepository};

/// Trait for category membership operations
#[async_trait]
pub trait MenuMembershipOperations {
    /// Move an item into `new_category`, appended at the end.
    ///
    /// The source category is compacted; the relative order of both
    /// categories is otherwise left alone.
    async fn change_category(&self, item_name: &str, new_category: &str) -> DomainResult<MenuItem>;
}

#[async_trait]
impl MenuMembershipOperations for MenuRepository {
    async fn change_category(&self, item_name: &str, new_category: &str) -> DomainResult<MenuItem> {
        let new_category = normalize_category(new_category)?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, item_name)?;
        if !category_exists(&tx, &new_category)? {
            return Err(DomainError::NotFound(format!("Category not found: {}", new_category)));
        }
        if item.category == new_category {
            return Ok(item);
        }

        let position = next_item_position(&tx, &new_category)?;
        tx.execute(
            "UPDATE menu_items SET category = ?1, position = ?2, updated_at = ?3 WHERE name = ?4",
            params![new_category, position, now_millis(), item_name],
        )?;
        reindex_items(&tx, &item.category)?;

        let moved = require_item(&tx, item_name)?;
        tx.commit()?;
        Ok(moved)
    }
}
