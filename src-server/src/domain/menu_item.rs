//! Menu Item Entity
//!
//! A sellable item inside one category, with optional side-dish options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Implicit "no side" option, always listed last
pub const NONE_OPTION: &str = "none";

/// Price and availability of one side option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideOption {
    /// Price in cents
    pub price: i64,
    pub available: bool,
}

/// A menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique item name
    pub name: String,
    /// Owning category
    pub category: String,
    /// Base price in cents
    pub price: i64,
    pub available: bool,
    /// Side options by name
    #[serde(default)]
    pub sides: BTreeMap<String, SideOption>,
    /// Explicit side display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_order: Option<Vec<String>>,
    /// Position within the category
    #[serde(default)]
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl MenuItem {
    pub fn new(name: String, category: String, price: i64) -> Self {
        Self {
            name,
            category,
            price,
            available: true,
            sides: BTreeMap::new(),
            side_order: None,
            position: 0,
            updated_at: None,
        }
    }

    pub fn has_sides(&self) -> bool {
        !self.sides.is_empty()
    }

    /// Side names in display order; without an explicit order, by name with `none` last
    pub fn ordered_sides(&self) -> Vec<String> {
        if let Some(order) = &self.side_order {
            return order.clone();
        }
        let mut names: Vec<String> = self
            .sides
            .keys()
            .filter(|name| name.as_str() != NONE_OPTION)
            .cloned()
            .collect();
        if self.sides.contains_key(NONE_OPTION) {
            names.push(NONE_OPTION.to_string());
        }
        names
    }
}

impl Entity for MenuItem {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.name.clone()
    }
}
