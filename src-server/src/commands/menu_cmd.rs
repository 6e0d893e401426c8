//! Commands for Menu operations
//!
//! Exposes categories, items, side options and their ordering.

use std::collections::BTreeMap;

use crate::domain::{Category, MenuItem, MenuSnapshot};
use crate::repository::{
    MenuMembershipOperations, MenuPositioningOperations, MenuSideOperations, Repository,
};
use crate::AppState;

// ========================
// Categories
// ========================

/// Create a category at the end of the category order
pub async fn create_category(state: &AppState, name: String) -> Result<Category, String> {
    let repo = state.menu_repo.lock().await;
    let category = repo.create_category(&name).await.map_err(|e| e.to_string())?;
    log::info!("Created category {}", category.name);
    Ok(category)
}

/// List categories in display order
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>, String> {
    let repo = state.menu_repo.lock().await;
    repo.list_categories().await.map_err(|e| e.to_string())
}

/// Category names in display order
pub async fn get_category_order(state: &AppState) -> Result<Vec<String>, String> {
    let repo = state.menu_repo.lock().await;
    repo.category_order().await.map_err(|e| e.to_string())
}

/// Replace the category order
pub async fn reorder_categories(state: &AppState, order: Vec<String>) -> Result<Vec<String>, String> {
    let repo = state.menu_repo.lock().await;
    match repo.reorder_categories(&order).await {
        Ok(stored) => {
            log::info!("Category order set: {:?}", stored);
            Ok(stored)
        }
        Err(e) => {
            log::warn!("Category reorder rejected: {}", e);
            Err(e.to_string())
        }
    }
}

/// Delete a category and every item in it
pub async fn delete_category(state: &AppState, name: String) -> Result<(), String> {
    let repo = state.menu_repo.lock().await;
    repo.delete_category(&name).await.map_err(|e| e.to_string())?;
    log::info!("Deleted category {}", name);
    Ok(())
}

/// Rename a category; an existing target absorbs its items
pub async fn rename_category(
    state: &AppState,
    old_name: String,
    new_name: String,
) -> Result<Category, String> {
    let repo = state.menu_repo.lock().await;
    repo.rename_category(&old_name, &new_name).await.map_err(|e| {
        log::warn!("Renaming category {} failed: {}", old_name, e);
        e.to_string()
    })
}

// ========================
// Items
// ========================

/// Create an item at the end of its category
pub async fn create_item(
    state: &AppState,
    category: String,
    name: String,
    price: i64,
) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    let item = MenuItem::new(name, category, price);
    let created = repo.create(&item).await.map_err(|e| e.to_string())?;
    log::info!("Created item {} in {}", created.name, created.category);
    Ok(created)
}

/// Get item by name
pub async fn get_item(state: &AppState, name: String) -> Result<Option<MenuItem>, String> {
    let repo = state.menu_repo.lock().await;
    repo.find_by_id(name).await.map_err(|e| e.to_string())
}

/// Update price and availability
pub async fn update_item(
    state: &AppState,
    name: String,
    price: Option<i64>,
    available: Option<bool>,
) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;

    let existing = repo
        .find_by_id(name.clone())
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Item {} not found", name))?;

    let updated = MenuItem {
        price: price.unwrap_or(existing.price),
        available: available.unwrap_or(existing.available),
        ..existing
    };

    repo.update(&updated).await.map_err(|e| e.to_string())
}

/// Delete item
pub async fn delete_item(state: &AppState, name: String) -> Result<(), String> {
    let repo = state.menu_repo.lock().await;
    repo.delete(name.clone()).await.map_err(|e| e.to_string())?;
    log::info!("Deleted item {}", name);
    Ok(())
}

/// Rename an item in place
pub async fn rename_item(state: &AppState, old_name: String, new_name: String) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    let renamed = repo.rename_item(&old_name, &new_name).await.map_err(|e| e.to_string())?;
    log::info!("Renamed item {} to {}", old_name, renamed.name);
    Ok(renamed)
}

/// Replace the item order of one category
pub async fn reorder_items_in_category(
    state: &AppState,
    category: String,
    order: Vec<String>,
) -> Result<Vec<String>, String> {
    let repo = state.menu_repo.lock().await;
    match repo.reorder_items_in_category(&category, &order).await {
        Ok(stored) => {
            log::info!("Item order in {} set: {:?}", category, stored);
            Ok(stored)
        }
        Err(e) => {
            log::warn!("Item reorder in {} rejected: {}", category, e);
            Err(e.to_string())
        }
    }
}

/// Move an item to another category, appended at the end
pub async fn change_category(
    state: &AppState,
    item: String,
    new_category: String,
) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    match repo.change_category(&item, &new_category).await {
        Ok(moved) => {
            log::info!("Item {} now in {}", moved.name, moved.category);
            Ok(moved)
        }
        Err(e) => {
            log::warn!("Moving {} to {} failed: {}", item, new_category, e);
            Err(e.to_string())
        }
    }
}

// ========================
// Side options
// ========================

/// Add a side option to an item
pub async fn add_side(
    state: &AppState,
    item: String,
    side: String,
    price: i64,
) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    let updated = repo.add_side(&item, &side, price).await.map_err(|e| e.to_string())?;
    log::info!("Added side {} to {}", side, item);
    Ok(updated)
}

/// Remove a side option from an item
pub async fn remove_side(state: &AppState, item: String, side: String) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    let updated = repo.remove_side(&item, &side).await.map_err(|e| e.to_string())?;
    log::info!("Removed side {} from {}", side, item);
    Ok(updated)
}

/// Update price and availability of a side option
pub async fn update_side(
    state: &AppState,
    item: String,
    side: String,
    price: Option<i64>,
    available: Option<bool>,
) -> Result<MenuItem, String> {
    let repo = state.menu_repo.lock().await;
    repo.update_side(&item, &side, price, available)
        .await
        .map_err(|e| e.to_string())
}

/// Replace the side order of one item; returns the stored order
pub async fn reorder_sides_in_item(
    state: &AppState,
    item: String,
    order: Vec<String>,
) -> Result<Vec<String>, String> {
    let repo = state.menu_repo.lock().await;
    match repo.reorder_sides(&item, &order).await {
        Ok(stored) => {
            log::info!("Side order of {} set: {:?}", item, stored);
            Ok(stored)
        }
        Err(e) => {
            log::warn!("Side reorder of {} rejected: {}", item, e);
            Err(e.to_string())
        }
    }
}

// ========================
// Whole menu
// ========================

/// Every category with its items in stored order
pub async fn get_menu(state: &AppState) -> Result<BTreeMap<String, Vec<MenuItem>>, String> {
    let repo = state.menu_repo.lock().await;
    let snapshot = repo.load_snapshot().await.map_err(|e| e.to_string())?;
    Ok(snapshot.categories)
}

/// Full snapshot including the category order
pub async fn export_menu(state: &AppState) -> Result<MenuSnapshot, String> {
    let repo = state.menu_repo.lock().await;
    repo.load_snapshot().await.map_err(|e| e.to_string())
}

/// Replace the whole menu
pub async fn import_menu(state: &AppState, snapshot: MenuSnapshot) -> Result<(), String> {
    let repo = state.menu_repo.lock().await;
    repo.import_snapshot(&snapshot).await.map_err(|e| {
        log::error!("Menu import failed: {}", e);
        e.to_string()
    })?;
    log::info!("Imported menu with {} items", snapshot.item_count());
    Ok(())
}
