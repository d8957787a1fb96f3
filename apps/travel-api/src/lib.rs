pub mod auth;
pub mod carpool;
pub mod config;
pub mod db;
pub mod error;
pub mod estimate;
pub mod models;
pub mod routes;
pub mod search_stats;

use std::sync::Arc;

use config::Config;
use db::kv::{KeyValueStore, MemoryStore};
use db::memory::MemoryDb;
use db::pg::PgStore;
use db::pool::DbPool;
use db::{AccountStore, CarpoolStore, RouteSearchStore};
use estimate::{RouteEstimator, UnconfiguredEstimator};

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub carpools: Arc<dyn CarpoolStore>,
    pub searches: Arc<dyn RouteSearchStore>,
    pub kv: Arc<dyn KeyValueStore>,
    pub estimator: Arc<dyn RouteEstimator>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by PostgreSQL for every repository.
    pub fn postgres(db: DbPool, config: Config) -> Self {
        let store = Arc::new(PgStore::new(db));
        Self {
            accounts: store.clone(),
            carpools: store.clone(),
            searches: store,
            kv: Arc::new(MemoryStore::new()),
            estimator: Arc::new(UnconfiguredEstimator),
            config: Arc::new(config),
        }
    }

    /// State held entirely in process memory.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryDb::new());
        Self {
            accounts: store.clone(),
            carpools: store.clone(),
            searches: store,
            kv: Arc::new(MemoryStore::new()),
            estimator: Arc::new(UnconfiguredEstimator),
            config: Arc::new(config),
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn RouteEstimator>) -> Self {
        self.estimator = estimator;
        self
    }
}
