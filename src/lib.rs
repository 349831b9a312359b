pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod utils;

pub use db::DbPool;

use config::Config;

/// Shared request context: configuration plus the database handle every
/// handler reads and writes through.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}
