pub mod keys;
pub mod moka;
pub mod store;

pub use keys::CacheKey;
pub use self::moka::MokaCacheStore;
pub use store::{CacheError, CacheStore};

use crate::config::Config;

/// Build the production cache backend from the configured capacity.
pub fn init_cache(config: &Config) -> MokaCacheStore {
    MokaCacheStore::new(config.cache_max_capacity)
}
