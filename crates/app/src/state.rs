//! Application state management

use userdesk_core::{Backend, Database, Desk, DeskConfig, KeyValueStore, MemoryStore, Result};

/// Main application state
pub struct AppState {
    pub desk: Desk<Box<dyn KeyValueStore>>,
}

impl AppState {
    pub fn new(config: DeskConfig) -> Result<Self> {
        let store = Self::open_store(&config)?;
        let seed = config.seed.load()?;
        let desk = Desk::open(store, seed, config.session)?;

        Ok(Self { desk })
    }

    fn open_store(config: &DeskConfig) -> Result<Box<dyn KeyValueStore>> {
        match config.storage.backend {
            Backend::Sqlite => {
                let db_path = config.storage.database_path()?;

                // Ensure parent directory exists
                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                tracing::info!(path = %db_path.display(), "Opening database");
                Ok(Box::new(Database::open(&db_path)?))
            }
            Backend::Memory => {
                tracing::warn!("Using in-memory store; changes are lost on exit");
                Ok(Box::new(MemoryStore::new()))
            }
        }
    }
}
