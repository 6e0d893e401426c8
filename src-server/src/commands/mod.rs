//! Commands Layer
//!
//! Command handlers that bridge the editor to the menu store.
//! Every handler takes the shared `AppState` and maps domain errors to strings.

mod menu_cmd;

pub use menu_cmd::*;
