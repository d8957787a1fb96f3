pub mod kv;
pub mod memory;
pub mod pg;
pub mod pool;
pub mod schema;
pub mod stores;

pub use stores::{AccountStore, CarpoolStore, JoinOutcome, RouteSearchStore};
