//! In-process Bindings
//!
//! Calls the menu store's command handlers directly. Payloads still pass
//! through `serde_json::Value`, so the editor only ever sees its own wire types.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use menu_server_lib::commands;
use menu_server_lib::AppState;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::MenuApi;
use crate::models::{CategoryId, ItemId, MenuItem, SideName};

#[derive(Clone)]
pub struct LocalMenuApi {
    state: Arc<AppState>,
}

impl LocalMenuApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Re-read a store payload as an editor type
fn convert<S: Serialize, T: DeserializeOwned>(value: S) -> Result<T, String> {
    let json = serde_json::to_value(value).map_err(|e| e.to_string())?;
    serde_json::from_value(json).map_err(|e| e.to_string())
}

#[async_trait]
impl MenuApi for LocalMenuApi {
    async fn fetch_categories(&self) -> Result<BTreeMap<CategoryId, Vec<MenuItem>>, String> {
        let menu = commands::get_menu(&self.state).await?;
        convert(menu)
    }

    async fn fetch_category_order(&self) -> Result<Vec<CategoryId>, String> {
        commands::get_category_order(&self.state).await
    }

    async fn set_category_order(&self, order: &[CategoryId]) -> Result<(), String> {
        commands::reorder_categories(&self.state, order.to_vec()).await?;
        Ok(())
    }

    async fn set_item_order(&self, category: &str, order: &[ItemId]) -> Result<(), String> {
        commands::reorder_items_in_category(&self.state, category.to_string(), order.to_vec()).await?;
        Ok(())
    }

    async fn set_item_category(&self, item: &str, category: &str) -> Result<(), String> {
        commands::change_category(&self.state, item.to_string(), category.to_string()).await?;
        Ok(())
    }

    async fn set_side_order(&self, item: &str, order: &[SideName]) -> Result<Vec<SideName>, String> {
        commands::reorder_sides_in_item(&self.state, item.to_string(), order.to_vec()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn api() -> LocalMenuApi {
        let state = AppState::in_memory().await.unwrap();
        commands::create_category(&state, "mains".into()).await.unwrap();
        commands::create_item(&state, "mains".into(), "Burger".into(), 1250).await.unwrap();
        commands::add_side(&state, "Burger".into(), "chips".into(), 250).await.unwrap();
        LocalMenuApi::new(Arc::new(state))
    }

    #[tokio::test]
    async fn test_fetch_converts_store_items() {
        let api = api().await;
        let menu = api.fetch_categories().await.unwrap();
        let burger = &menu["mains"][0];
        assert_eq!(burger.name, "Burger");
        assert_eq!(burger.side_order, Some(vec!["chips".to_string(), "none".to_string()]));
        assert_eq!(api.fetch_category_order().await.unwrap(), vec!["mains"]);
    }

    #[tokio::test]
    async fn test_store_errors_pass_through() {
        let api = api().await;
        let err = api.set_item_category("Ghost", "mains").await.unwrap_err();
        assert!(err.starts_with("Not found"));
    }
}
