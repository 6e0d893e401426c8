//! Editor Models
//!
//! Wire structures matching the menu store, plus the identities the editor
//! uses for draggable nodes and the containers that hold them.

use std::collections::BTreeMap;
use std::fmt;

use menu_dragdrop::{CollectionError, Keyed, OrderedCollection};
use serde::{Deserialize, Serialize};

pub type CategoryId = String;
pub type ItemId = String;
pub type SideName = String;

/// Implicit "no side" option, listed last by the store
pub const NONE_OPTION: &str = "none";

// ========================
// Wire types
// ========================

/// Side option data structure (matches backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideOption {
    pub price: i64,
    pub available: bool,
}

/// Menu item data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: ItemId,
    pub category: CategoryId,
    pub price: i64,
    pub available: bool,
    #[serde(default)]
    pub sides: BTreeMap<SideName, SideOption>,
    #[serde(default)]
    pub side_order: Option<Vec<SideName>>,
    #[serde(default)]
    pub position: i32,
}

/// Whole menu as fetched from the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub categories: BTreeMap<CategoryId, Vec<MenuItem>>,
    #[serde(default)]
    pub category_order: Vec<CategoryId>,
}

// ========================
// Nodes and containers
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Category,
    Item,
    Side,
}

/// Something the user can drag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Category(CategoryId),
    Item(ItemId),
    /// Sides are scoped to their item, so names never alias across levels
    Side { item: ItemId, side: SideName },
}

impl NodeRef {
    pub fn side(item: impl Into<ItemId>, side: impl Into<SideName>) -> Self {
        NodeRef::Side { item: item.into(), side: side.into() }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Category(_) => NodeKind::Category,
            NodeRef::Item(_) => NodeKind::Item,
            NodeRef::Side { .. } => NodeKind::Side,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Category(id) => write!(f, "category {}", id),
            NodeRef::Item(id) => write!(f, "item {}", id),
            NodeRef::Side { item, side } => write!(f, "side {} of {}", side, item),
        }
    }
}

/// An ordered list that nodes live in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerRef {
    /// The category list itself
    Menu,
    /// Items of one category
    Category(CategoryId),
    /// Sides of one item
    Item(ItemId),
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerRef::Menu => write!(f, "menu"),
            ContainerRef::Category(id) => write!(f, "category {}", id),
            ContainerRef::Item(id) => write!(f, "item {}", id),
        }
    }
}

// ========================
// Records
// ========================

/// One item as held in the hierarchy model
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: ItemId,
    /// Cached owner; kept equal to the collection that holds the record
    pub category: CategoryId,
    pub price: i64,
    pub available: bool,
    pub sides: BTreeMap<SideName, SideOption>,
    pub side_order: Option<OrderedCollection<SideName>>,
}

impl Keyed for ItemRecord {
    type Key = ItemId;

    fn key(&self) -> &ItemId {
        &self.id
    }
}

impl ItemRecord {
    pub fn from_wire(item: MenuItem) -> Result<Self, CollectionError> {
        let side_order = match item.side_order {
            Some(order) => Some(OrderedCollection::from_vec(order)?),
            None => None,
        };
        Ok(Self {
            id: item.name,
            category: item.category,
            price: item.price,
            available: item.available,
            sides: item.sides,
            side_order,
        })
    }

    pub fn has_side(&self, side: &str) -> bool {
        self.sides.contains_key(side)
    }

    /// Side names in display order; without an explicit order, by name with `none` last
    pub fn ordered_sides(&self) -> Vec<SideName> {
        if let Some(order) = &self.side_order {
            return order.ids_in_order();
        }
        let mut names: Vec<SideName> = self
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
