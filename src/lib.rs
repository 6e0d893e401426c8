//! Menu Layout Editor
//!
//! Drag-and-drop reordering of a restaurant menu: categories, the items in each
//! category, and the side options of each item.
//!
//! - models: wire types and node/container identities
//! - store: hierarchy model built from a store fetch
//! - resolver: node -> owning container
//! - session / reorder: the live gesture
//! - commit: end-of-gesture persistence
//! - form: item edit form holding side-order drafts
//! - context: `MenuEditor`, the facade tying it together
//! - commands: `MenuApi` bindings to the menu store

pub mod commands;
pub mod commit;
pub mod config;
pub mod context;
pub mod error;
pub mod form;
pub mod models;
pub mod reorder;
pub mod resolver;
pub mod session;
pub mod store;

pub use commands::{LocalMenuApi, MenuApi};
pub use config::EditorConfig;
pub use context::{DropOutcome, MenuEditor, Notice, NoticeLevel};
pub use error::{ReorderError, ReorderResult};
pub use models::{ContainerRef, NodeKind, NodeRef};
pub use reorder::{MenuDragOver, Transition};
pub use session::DragSession;
pub use store::HierarchyModel;

pub use menu_dragdrop::{DragOver, DropHint, DropTarget};
