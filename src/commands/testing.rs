//! In-memory `MenuApi` for unit tests: records every write, can be told to
//! fail one method, and can hold writes until the test releases them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::MenuApi;
use crate::commit::PersistCall;
use crate::form::SideDraft;
use crate::models::{CategoryId, ItemId, MenuItem, MenuSnapshot, SideName, NONE_OPTION};

pub(crate) struct RecordingApi {
    menu: Mutex<MenuSnapshot>,
    calls: Mutex<Vec<PersistCall>>,
    side_saves: Mutex<Vec<SideDraft>>,
    fetches: AtomicUsize,
    fail_on: Mutex<Option<&'static str>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingApi {
    pub fn new(menu: MenuSnapshot) -> Self {
        Self {
            menu: Mutex::new(menu),
            calls: Mutex::new(Vec::new()),
            side_saves: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            fail_on: Mutex::new(None),
            gate: None,
        }
    }

    /// Writes wait for a permit on the returned semaphore
    pub fn gated(menu: MenuSnapshot) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let api = Self { gate: Some(gate.clone()), ..Self::new(menu) };
        (api, gate)
    }

    pub fn fail_on(&self, method: &'static str) {
        *self.fail_on.lock().unwrap() = Some(method);
    }

    pub fn succeed(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    /// Successful writes, in order
    pub fn calls(&self) -> Vec<PersistCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn side_saves(&self) -> Vec<SideDraft> {
        self.side_saves.lock().unwrap().clone()
    }

    /// Completed `fetch_categories` calls
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn menu(&self) -> MenuSnapshot {
        self.menu.lock().unwrap().clone()
    }

    async fn write(&self, method: &'static str) -> Result<(), String> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.map_err(|e| e.to_string())?.forget();
        }
        if *self.fail_on.lock().unwrap() == Some(method) {
            return Err(format!("{} unavailable", method));
        }
        Ok(())
    }

    fn record(&self, call: PersistCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MenuApi for RecordingApi {
    async fn fetch_categories(&self) -> Result<BTreeMap<CategoryId, Vec<MenuItem>>, String> {
        if *self.fail_on.lock().unwrap() == Some("fetch_categories") {
            return Err("fetch_categories unavailable".to_string());
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.menu.lock().unwrap().categories.clone())
    }

    async fn fetch_category_order(&self) -> Result<Vec<CategoryId>, String> {
        Ok(self.menu.lock().unwrap().category_order.clone())
    }

    async fn set_category_order(&self, order: &[CategoryId]) -> Result<(), String> {
        self.write("set_category_order").await?;
        self.menu.lock().unwrap().category_order = order.to_vec();
        self.record(PersistCall::SetCategoryOrder(order.to_vec()));
        Ok(())
    }

    async fn set_item_order(&self, category: &str, order: &[ItemId]) -> Result<(), String> {
        self.write("set_item_order").await?;
        {
            let mut menu = self.menu.lock().unwrap();
            let items = menu.categories.get_mut(category).ok_or("no such category")?;
            items.sort_by_key(|item| order.iter().position(|name| *name == item.name));
        }
        self.record(PersistCall::SetItemOrder {
            category: category.to_string(),
            items: order.to_vec(),
        });
        Ok(())
    }

    async fn set_item_category(&self, item: &str, category: &str) -> Result<(), String> {
        self.write("set_item_category").await?;
        {
            let mut menu = self.menu.lock().unwrap();
            let mut found = None;
            for items in menu.categories.values_mut() {
                if let Some(index) = items.iter().position(|i| i.name == item) {
                    found = Some(items.remove(index));
                }
            }
            let mut moved = found.ok_or("no such item")?;
            moved.category = category.to_string();
            menu.categories.entry(category.to_string()).or_default().push(moved);
        }
        self.record(PersistCall::SetItemCategory {
            item: item.to_string(),
            category: category.to_string(),
        });
        Ok(())
    }

    async fn set_side_order(&self, item: &str, order: &[SideName]) -> Result<Vec<SideName>, String> {
        self.write("set_side_order").await?;
        let mut stored: Vec<SideName> = order.iter().filter(|s| *s != NONE_OPTION).cloned().collect();
        stored.push(NONE_OPTION.to_string());
        self.side_saves.lock().unwrap().push(SideDraft {
            item: item.to_string(),
            order: stored.clone(),
        });
        Ok(stored)
    }
}
