//! UserDesk Core Library
//!
//! User directory, session handling and key-value persistence for the
//! UserDesk user-management desk.

pub mod config;
pub mod desk;
pub mod directory;
pub mod error;
pub mod invariants;
pub mod models;
pub mod seed;
pub mod session;
pub mod storage;

pub use config::{Backend, DeskConfig, SeedConfig, SessionConfig, StorageConfig};
pub use desk::Desk;
pub use directory::UserDirectory;
pub use error::{Error, Result};
pub use models::*;
pub use seed::Seed;
pub use session::SessionManager;
pub use storage::{Database, KeyValueStore, MemoryStore};
