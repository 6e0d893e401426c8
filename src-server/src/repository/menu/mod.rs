//! Menu Repository Module
//!
//! This module provides menu repository functionality split into specialized sub-modules:
//! - menu_repo: Categories and core item CRUD
//! - menu_positioning: Category and item order
//! - menu_membership: Category membership changes
//! - menu_sides: Side options and side order

mod menu_repo;
mod menu_positioning;
mod menu_membership;
mod menu_sides;

pub use menu_repo::MenuRepository;

// Re-export all operation traits so they can be used by importing MenuRepository
pub use menu_positioning::MenuPositioningOperations;
pub use menu_membership::MenuMembershipOperations;
pub use menu_sides::MenuSideOperations;
