//! Category Entity
//!
//! A named group of menu items with a position in the menu.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// A menu category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Lowercased name, also the identifier
    pub name: String,
    /// Position in the category order
    pub position: i32,
}

impl Category {
    pub fn new(name: String, position: i32) -> Self {
        Self { name, position }
    }
}

impl Entity for Category {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.name.clone()
    }
}

/// Category names are stored trimmed and lowercased
pub fn normalize_category(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput("Category name cannot be empty".to_string()));
    }
    Ok(name.to_lowercase())
}
