//! Menu Repository - Core Operations
//!
//! SQLite-backed implementation for categories and menu item CRUD.
//! Specialized operations are in separate modules:
//! - menu_positioning: category order and item order within a category
//! - menu_membership: moving items between categories
//! - menu_sides: side options and their order

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    normalize_category, Category, DomainError, DomainResult, MenuItem, MenuSnapshot, SideOption,
};
use super::super::traits::Repository;
use super::menu_positioning::{next_item_position, reindex_categories, reindex_items};
use super::menu_sides::write_sides;

const ITEM_COLUMNS: &str = "name, category, position, price, available, updated_at";

/// SQLite implementation of the menu repository
pub struct MenuRepository {
    pub(super) conn: Arc<Mutex<Option<Connection>>>,
}

impl MenuRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }

    /// Create a category at the end of the category order
    pub async fn create_category(&self, name: &str) -> DomainResult<Category> {
        let name = normalize_category(name)?;
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if category_exists(conn, &name)? {
            return Err(DomainError::Conflict(format!("Category already exists: {}", name)));
        }
        let position: i32 = conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM categories",
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO categories (name, position, updated_at) VALUES (?1, ?2, ?3)",
            params![name, position, now_millis()],
        )?;
        Ok(Category::new(name, position))
    }

    /// Categories in display order
    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT name, position FROM categories ORDER BY position, name")?;
        let categories = stmt
            .query_map([], |row| Ok(Category::new(row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Category names in display order
    pub async fn category_order(&self) -> DomainResult<Vec<String>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        category_names(conn)
    }

    /// Every category with its items in stored order
    pub async fn load_snapshot(&self) -> DomainResult<MenuSnapshot> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let category_order = category_names(conn)?;
        let mut categories = BTreeMap::new();
        for name in &category_order {
            categories.insert(name.clone(), items_in(conn, name)?);
        }
        Ok(MenuSnapshot { categories, category_order })
    }

    /// Delete a category with all of its items; the category order closes the gap
    pub async fn delete_category(&self, name: &str) -> DomainResult<()> {
        let name = normalize_category(name)?;
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if !category_exists(&tx, &name)? {
            return Err(DomainError::NotFound(format!("Category not found: {}", name)));
        }
        tx.execute(
            "DELETE FROM sides WHERE item_name IN (SELECT name FROM menu_items WHERE category = ?1)",
            params![name],
        )?;
        tx.execute("DELETE FROM menu_items WHERE category = ?1", params![name])?;
        tx.execute("DELETE FROM categories WHERE name = ?1", params![name])?;
        reindex_categories(&tx)?;

        tx.commit()?;
        Ok(())
    }

    /// Rename a category in place.
    ///
    /// Renaming onto an existing category merges: the old items are appended
    /// to it in their order and the old category leaves the category order.
    pub async fn rename_category(&self, old_name: &str, new_name: &str) -> DomainResult<Category> {
        let old_name = normalize_category(old_name)?;
        let new_name = normalize_category(new_name)?;
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let position: Option<i32> = tx
            .query_row("SELECT position FROM categories WHERE name = ?1", params![old_name], |row| row.get(0))
            .optional()?;
        let position = position.ok_or_else(|| DomainError::NotFound(format!("Category not found: {}", old_name)))?;
        if old_name == new_name {
            return Ok(Category::new(new_name, position));
        }

        let now = now_millis();
        let merge = category_exists(&tx, &new_name)?;
        if merge {
            let mut next = next_item_position(&tx, &new_name)?;
            for item in item_names_in(&tx, &old_name)? {
                tx.execute(
                    "UPDATE menu_items SET category = ?1, position = ?2, updated_at = ?3 WHERE name = ?4",
                    params![new_name, next, now, item],
                )?;
                next += 1;
            }
        } else {
            tx.execute(
                "INSERT INTO categories (name, position, updated_at) VALUES (?1, ?2, ?3)",
                params![new_name, position, now],
            )?;
            tx.execute(
                "UPDATE menu_items SET category = ?1, updated_at = ?2 WHERE category = ?3",
                params![new_name, now, old_name],
            )?;
        }
        tx.execute("DELETE FROM categories WHERE name = ?1", params![old_name])?;
        reindex_categories(&tx)?;

        let position: i32 = tx.query_row(
            "SELECT position FROM categories WHERE name = ?1",
            params![new_name],
            |row| row.get(0),
        )?;
        tx.commit()?;
        log::info!("Category {} renamed to {}{}", old_name, new_name, if merge { " (merged)" } else { "" });
        Ok(Category::new(new_name, position))
    }

    /// Rename an item, keeping its category, position and sides
    pub async fn rename_item(&self, old_name: &str, new_name: &str) -> DomainResult<MenuItem> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(DomainError::InvalidInput("New name cannot be empty".to_string()));
        }
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, old_name)?;
        if item.name == new_name {
            return Ok(item);
        }
        if find_item(&tx, new_name)?.is_some() {
            return Err(DomainError::Conflict(format!("Item already exists: {}", new_name)));
        }

        // Sides reference the item by name, so the new row must exist before they move
        tx.execute(
            "INSERT INTO menu_items (name, category, position, price, available, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![new_name, item.category, item.position, item.price, item.available, now_millis()],
        )?;
        tx.execute("UPDATE sides SET item_name = ?1 WHERE item_name = ?2", params![new_name, item.name])?;
        tx.execute("DELETE FROM menu_items WHERE name = ?1", params![item.name])?;

        let renamed = require_item(&tx, new_name)?;
        tx.commit()?;
        Ok(renamed)
    }

    /// Replace the whole menu with `snapshot`
    pub async fn import_snapshot(&self, snapshot: &MenuSnapshot) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        tx.execute_batch("DELETE FROM sides; DELETE FROM menu_items; DELETE FROM categories;")?;

        let mut names: Vec<String> = Vec::new();
        for name in &snapshot.category_order {
            let name = normalize_category(name)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        for name in snapshot.categories.keys() {
            let name = normalize_category(name)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let now = now_millis();
        for (position, name) in names.iter().enumerate() {
            tx.execute(
                "INSERT INTO categories (name, position, updated_at) VALUES (?1, ?2, ?3)",
                params![name, position as i32, now],
            )?;
        }

        for (category, items) in &snapshot.categories {
            let category = normalize_category(category)?;
            for (position, item) in items.iter().enumerate() {
                if find_item(&tx, &item.name)?.is_some() {
                    return Err(DomainError::Conflict(format!("Item already exists: {}", item.name)));
                }
                tx.execute(
                    "INSERT INTO menu_items (name, category, position, price, available, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![item.name, category, position as i32, item.price, item.available, now],
                )?;
                write_sides(&tx, &item.name, &item.sides, &item.ordered_sides())?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl Repository<MenuItem> for MenuRepository {
    async fn create(&self, entity: &MenuItem) -> DomainResult<MenuItem> {
        let name = entity.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Item name cannot be empty".to_string()));
        }
        if entity.price < 0 {
            return Err(DomainError::InvalidInput("Price cannot be negative".to_string()));
        }
        let category = normalize_category(&entity.category)?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if !category_exists(&tx, &category)? {
            return Err(DomainError::NotFound(format!("Category not found: {}", category)));
        }
        if find_item(&tx, &name)?.is_some() {
            return Err(DomainError::Conflict(format!("Item already exists: {}", name)));
        }

        let position = next_item_position(&tx, &category)?;
        tx.execute(
            "INSERT INTO menu_items (name, category, position, price, available, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![name, category, position, entity.price, entity.available, now_millis()],
        )?;
        write_sides(&tx, &name, &entity.sides, &entity.ordered_sides())?;

        let created = require_item(&tx, &name)?;
        tx.commit()?;
        Ok(created)
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<MenuItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_item(conn, &id)
    }

    async fn list(&self) -> DomainResult<Vec<MenuItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut items = Vec::new();
        for category in category_names(conn)? {
            items.extend(items_in(conn, &category)?);
        }
        Ok(items)
    }

    async fn update(&self, entity: &MenuItem) -> DomainResult<MenuItem> {
        if entity.price < 0 {
            return Err(DomainError::InvalidInput("Price cannot be negative".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE menu_items SET price = ?1, available = ?2, updated_at = ?3 WHERE name = ?4",
            params![entity.price, entity.available, now_millis(), entity.name],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item not found: {}", entity.name)));
        }
        require_item(conn, &entity.name)
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = require_item(&tx, &id)?;
        tx.execute("DELETE FROM sides WHERE item_name = ?1", params![id])?;
        tx.execute("DELETE FROM menu_items WHERE name = ?1", params![id])?;
        reindex_items(&tx, &item.category)?;

        tx.commit()?;
        Ok(())
    }
}

// ========================
// Row helpers
// ========================

pub(super) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

pub(super) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub(super) fn category_exists(conn: &Connection, name: &str) -> DomainResult<bool> {
    let found: Option<String> = conn
        .query_row("SELECT name FROM categories WHERE name = ?1", params![name], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub(super) fn category_names(conn: &Connection) -> DomainResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY position, name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

pub(super) fn item_names_in(conn: &Connection, category: &str) -> DomainResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM menu_items WHERE category = ?1 ORDER BY position, name")?;
    let names = stmt
        .query_map(params![category], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        name: row.get(0)?,
        category: row.get(1)?,
        position: row.get(2)?,
        price: row.get(3)?,
        available: row.get(4)?,
        updated_at: row.get(5)?,
        sides: BTreeMap::new(),
        side_order: None,
    })
}

/// Side rows of one item in display order
pub(super) fn side_rows(conn: &Connection, item_name: &str) -> DomainResult<Vec<(String, SideOption)>> {
    let mut stmt = conn.prepare(
        "SELECT name, price, available FROM sides WHERE item_name = ?1 ORDER BY position, name",
    )?;
    let rows = stmt
        .query_map(params![item_name], |row| {
            Ok((row.get(0)?, SideOption { price: row.get(1)?, available: row.get(2)? }))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn attach_sides(conn: &Connection, item: &mut MenuItem) -> DomainResult<()> {
    let rows = side_rows(conn, &item.name)?;
    if !rows.is_empty() {
        item.side_order = Some(rows.iter().map(|(name, _)| name.clone()).collect());
    }
    item.sides = rows.into_iter().collect();
    Ok(())
}

pub(super) fn find_item(conn: &Connection, name: &str) -> DomainResult<Option<MenuItem>> {
    let query = format!("SELECT {} FROM menu_items WHERE name = ?1", ITEM_COLUMNS);
    let item = conn.query_row(&query, params![name], row_to_item).optional()?;
    match item {
        Some(mut item) => {
            attach_sides(conn, &mut item)?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

pub(super) fn require_item(conn: &Connection, name: &str) -> DomainResult<MenuItem> {
    find_item(conn, name)?.ok_or_else(|| DomainError::NotFound(format!("Item not found: {}", name)))
}

fn items_in(conn: &Connection, category: &str) -> DomainResult<Vec<MenuItem>> {
    let query = format!(
        "SELECT {} FROM menu_items WHERE category = ?1 ORDER BY position, name",
        ITEM_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;
    let mut items = stmt
        .query_map(params![category], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    for item in &mut items {
        attach_sides(conn, item)?;
    }
    Ok(items)
}
