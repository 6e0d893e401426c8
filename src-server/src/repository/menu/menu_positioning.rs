//! Menu Positioning Operations
//!
//! Category order and item order within a category.
//! Each reorder replaces the stored order in one transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashSet;

use crate::domain::{normalize_category, DomainError, DomainResult};
use super::menu_repo::{
    category_exists, category_names, item_names_in, not_initialized, now_millis, MenuRepository,
};

/// Trait for menu positioning operations
#[async_trait]
pub trait MenuPositioningOperations {
    /// Get next item position in a category (used in create)
    async fn get_next_position(&self, category: &str) -> DomainResult<i32>;

    /// Replace the category order; returns the normalized order
    async fn reorder_categories(&self, order: &[String]) -> DomainResult<Vec<String>>;

    /// Replace the item order of one category
    async fn reorder_items_in_category(&self, category: &str, order: &[String]) -> DomainResult<Vec<String>>;
}

#[async_trait]
impl MenuPositioningOperations for MenuRepository {
    async fn get_next_position(&self, category: &str) -> DomainResult<i32> {
        let category = normalize_category(category)?;
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        next_item_position(conn, &category)
    }

    async fn reorder_categories(&self, order: &[String]) -> DomainResult<Vec<String>> {
        if order.is_empty() {
            return Err(DomainError::InvalidInput("Order list cannot be empty".to_string()));
        }
        let order = order
            .iter()
            .map(|name| normalize_category(name))
            .collect::<DomainResult<Vec<_>>>()?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let current = category_names(&tx)?;
        validate_order(&current, &order, "Category")?;

        let now = now_millis();
        for (position, name) in order.iter().enumerate() {
            tx.execute(
                "UPDATE categories SET position = ?1, updated_at = ?2 WHERE name = ?3",
                params![position as i32, now, name],
            )?;
        }

        tx.commit()?;
        Ok(order)
    }

    async fn reorder_items_in_category(&self, category: &str, order: &[String]) -> DomainResult<Vec<String>> {
        if order.is_empty() {
            return Err(DomainError::InvalidInput("Order list cannot be empty".to_string()));
        }
        let category = normalize_category(category)?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if !category_exists(&tx, &category)? {
            return Err(DomainError::NotFound(format!("Category not found: {}", category)));
        }
        let current = item_names_in(&tx, &category)?;
        validate_order(&current, order, "Item")?;

        let now = now_millis();
        for (position, name) in order.iter().enumerate() {
            tx.execute(
                "UPDATE menu_items SET position = ?1, updated_at = ?2 WHERE name = ?3",
                params![position as i32, now, name],
            )?;
        }

        tx.commit()?;
        Ok(order.to_vec())
    }
}

pub(super) fn next_item_position(conn: &Connection, category: &str) -> DomainResult<i32> {
    let position = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM menu_items WHERE category = ?1",
        params![category],
        |row| row.get(0),
    )?;
    Ok(position)
}

/// Reindex items in a category to be sequential (0, 1, 2, ...)
pub(super) fn reindex_items(conn: &Connection, category: &str) -> DomainResult<()> {
    let now = now_millis();
    for (position, name) in item_names_in(conn, category)?.iter().enumerate() {
        conn.execute(
            "UPDATE menu_items SET position = ?1, updated_at = ?2 WHERE name = ?3",
            params![position as i32, now, name],
        )?;
    }
    Ok(())
}

/// Reindex categories to be sequential, keeping their relative order
pub(super) fn reindex_categories(conn: &Connection) -> DomainResult<()> {
    let now = now_millis();
    for (position, name) in category_names(conn)?.iter().enumerate() {
        conn.execute(
            "UPDATE categories SET position = ?1, updated_at = ?2 WHERE name = ?3",
            params![position as i32, now, name],
        )?;
    }
    Ok(())
}

/// `order` must name every entry of `current` exactly once
pub(super) fn validate_order(current: &[String], order: &[String], kind: &str) -> DomainResult<()> {
    if let Some(unknown) = order.iter().find(|name| !current.contains(name)) {
        return Err(DomainError::NotFound(format!("{} not found: {}", kind, unknown)));
    }
    let unique: HashSet<&String> = order.iter().collect();
    if unique.len() != order.len() {
        return Err(DomainError::InvalidInput(format!("Duplicate {} in order", kind.to_lowercase())));
    }
    if order.len() != current.len() {
        return Err(DomainError::InvalidInput(format!(
            "Order must list every {} exactly once",
            kind.to_lowercase()
        )));
    }
    Ok(())
}
