//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod category;
mod menu_item;
mod menu;

pub use entity::{Entity, DomainError, DomainResult};
pub use category::{Category, normalize_category};
pub use menu_item::{MenuItem, SideOption, NONE_OPTION};
pub use menu::MenuSnapshot;
