//! Menu Store Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: Command handlers used by the layout editor
//! - config: Server settings

use std::path::PathBuf;

use tokio::sync::Mutex;

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

use config::ServerConfig;
use repository::{init_db, DbState, MenuRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub menu_repo: Mutex<MenuRepository>,
}

impl AppState {
    /// Open (and migrate) the database named by `config`
    pub async fn open(config: &ServerConfig) -> Result<Self, String> {
        let db_state = init_db(&config.db_path).await?;
        let menu_repo = MenuRepository::new(db_state.conn.clone());
        Ok(Self {
            db_path: db_state.db_path.clone(),
            db_state,
            menu_repo: Mutex::new(menu_repo),
        })
    }

    /// State over a fresh in-memory database
    pub async fn in_memory() -> Result<Self, String> {
        Self::open(&ServerConfig::in_memory()).await
    }
}

/// Start logging (when configured) and open the store
pub async fn setup(config: &ServerConfig) -> Result<AppState, String> {
    if let Some(log_dir) = &config.log_dir {
        rolling_logger::init_logger(log_dir, &config.app_name)?;
        let _ = rolling_logger::info("Menu server starting");
    }

    match AppState::open(config).await {
        Ok(state) => {
            log::info!("Menu store opened at {}", state.db_path.display());
            Ok(state)
        }
        Err(e) => {
            log::error!("Menu store init failed: {}", e);
            Err(e)
        }
    }
}
