//! Menu Side Operations
//!
//! Side options of an item and their display order.
//! The implicit `none` option is created with the first side and always sorts last.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, HashSet};

use crate::domain::{DomainError, DomainResult, MenuItem, SideOption, NONE_OPTION};
use super::menu_repo::{not_initialized, now_millis, require_item, MenuRepository};

/// Trait for side option operations
#[async_trait]
pub trait MenuSideOperations {
    /// Add a side option at the end of the side order
    async fn add_side(&self, item_name: &str, side_name: &str, price: i64) -> DomainResult<MenuItem>;

    /// Replace the side order; returns the stored order
    async fn reorder_sides(&self, item_name: &str, order: &[String]) -> DomainResult<Vec<String>>;

    /// Remove a side; when only `none` would remain the item loses all sides
    async fn remove_side(&self, item_name: &str, side_name: &str) -> DomainResult<MenuItem>;

    /// Change price and/or availability of a side, leaving its position alone
    async fn update_side(
        &self,
        item_name: &str,
        side_name: &str,
        price: Option<i64>,
        available: Option<bool>,
    ) -> DomainResult<MenuItem>;
}

#[async_trait]
impl MenuSideOperations for MenuRepository {
    async fn add_side(&self, item_name: &str, side_name: &str, price: i64) -> DomainResult<MenuItem> {
        let side_name = side_name.trim();
        if side_name.is_empty() {
            return Err(DomainError::InvalidInput("Side name cannot be empty".to_string()));
        }
        if side_name.eq_ignore_ascii_case(NONE_OPTION) {
            return Err(DomainError::InvalidInput("Cannot add 'none' option manually".to_string()));
        }
        if price < 0 {
            return Err(DomainError::InvalidInput("Price cannot be negative".to_string()));
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, item_name)?;
        if item.sides.contains_key(side_name) {
            return Err(DomainError::InvalidInput(format!("Side already exists: {}", side_name)));
        }

        let mut sides = item.sides.clone();
        let mut order = item.ordered_sides();
        if !sides.contains_key(NONE_OPTION) {
            sides.insert(NONE_OPTION.to_string(), SideOption { price: 0, available: true });
            order.push(NONE_OPTION.to_string());
        }
        sides.insert(side_name.to_string(), SideOption { price, available: true });
        order.push(side_name.to_string());

        write_sides(&tx, item_name, &sides, &order)?;
        touch_item(&tx, item_name)?;

        let updated = require_item(&tx, item_name)?;
        tx.commit()?;
        Ok(updated)
    }

    async fn reorder_sides(&self, item_name: &str, order: &[String]) -> DomainResult<Vec<String>> {
        if order.is_empty() {
            return Err(DomainError::InvalidInput("Order list cannot be empty".to_string()));
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, item_name)?;
        if !item.has_sides() {
            return Err(DomainError::NotFound(format!("Item has no sides: {}", item_name)));
        }
        if let Some(unknown) = order.iter().find(|name| !item.sides.contains_key(name.as_str())) {
            return Err(DomainError::NotFound(format!("Side not found: {}", unknown)));
        }
        let unique: HashSet<&String> = order.iter().collect();
        if unique.len() != order.len() {
            return Err(DomainError::InvalidInput("Duplicate side in order".to_string()));
        }

        // Unlisted sides keep their relative order after the listed ones
        let mut new_order = order.to_vec();
        for name in item.ordered_sides() {
            if !new_order.contains(&name) {
                new_order.push(name);
            }
        }

        let stored = write_sides(&tx, item_name, &item.sides, &new_order)?;
        touch_item(&tx, item_name)?;

        tx.commit()?;
        Ok(stored)
    }

    async fn remove_side(&self, item_name: &str, side_name: &str) -> DomainResult<MenuItem> {
        if side_name.eq_ignore_ascii_case(NONE_OPTION) {
            return Err(DomainError::InvalidInput("Cannot remove 'none' option directly".to_string()));
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, item_name)?;
        let mut sides = item.sides.clone();
        if sides.remove(side_name).is_none() {
            return Err(DomainError::NotFound(format!("Side not found: {}", side_name)));
        }
        if sides.keys().all(|name| name == NONE_OPTION) {
            sides.clear();
        }

        let order: Vec<String> = item.ordered_sides().into_iter().filter(|name| name != side_name).collect();
        write_sides(&tx, item_name, &sides, &order)?;
        touch_item(&tx, item_name)?;

        let updated = require_item(&tx, item_name)?;
        tx.commit()?;
        Ok(updated)
    }

    async fn update_side(
        &self,
        item_name: &str,
        side_name: &str,
        price: Option<i64>,
        available: Option<bool>,
    ) -> DomainResult<MenuItem> {
        if price.is_some_and(|price| price < 0) {
            return Err(DomainError::InvalidInput("Price cannot be negative".to_string()));
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, item_name)?;
        let current = item
            .sides
            .get(side_name)
            .ok_or_else(|| DomainError::NotFound(format!("Side not found: {}", side_name)))?;
        tx.execute(
            "UPDATE sides SET price = ?1, available = ?2 WHERE item_name = ?3 AND name = ?4",
            params![
                price.unwrap_or(current.price),
                available.unwrap_or(current.available),
                item_name,
                side_name
            ],
        )?;
        touch_item(&tx, item_name)?;

        let updated = require_item(&tx, item_name)?;
        tx.commit()?;
        Ok(updated)
    }
}

/// Move `none` to the end when the item has it
pub(super) fn pin_none_last(order: &mut Vec<String>, has_none: bool) {
    order.retain(|name| name != NONE_OPTION);
    if has_none {
        order.push(NONE_OPTION.to_string());
    }
}

/// Rewrite all side rows of an item in `order`; sides missing from `order` follow by name.
///
/// Returns the order actually stored.
pub(super) fn write_sides(
    conn: &Connection,
    item_name: &str,
    sides: &BTreeMap<String, SideOption>,
    order: &[String],
) -> DomainResult<Vec<String>> {
    let mut stored: Vec<String> = Vec::with_capacity(sides.len());
    for name in order {
        if sides.contains_key(name) && !stored.contains(name) {
            stored.push(name.clone());
        }
    }
    for name in sides.keys() {
        if !stored.contains(name) {
            stored.push(name.clone());
        }
    }
    pin_none_last(&mut stored, sides.contains_key(NONE_OPTION));

    conn.execute("DELETE FROM sides WHERE item_name = ?1", params![item_name])?;
    for (position, name) in stored.iter().enumerate() {
        if let Some(side) = sides.get(name) {
            conn.execute(
                "INSERT INTO sides (item_name, name, price, available, position) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![item_name, name, side.price, side.available, position as i32],
            )?;
        }
    }
    Ok(stored)
}

fn touch_item(conn: &Connection, item_name: &str) -> DomainResult<()> {
    conn.execute(
        "UPDATE menu_items SET updated_at = ?1 WHERE name = ?2",
        params![now_millis(), item_name],
    )?;
    Ok(())
}
