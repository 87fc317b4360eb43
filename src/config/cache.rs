use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::Error;
use crate::Result;

/// Result cache sizing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Maximum number of recognition results kept in memory.
    /// The least recently used result is evicted beyond this bound.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

impl CacheConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "cache.capacity must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
