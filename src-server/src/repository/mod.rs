//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod menu;


pub use traits::Repository;
pub use db::{init_db, DbState, MEMORY_DB};
pub use menu::{
    MenuMembershipOperations, MenuPositioningOperations, MenuRepository, MenuSideOperations,
};
