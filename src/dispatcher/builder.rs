//! Builder for [`RecognitionDispatcher`].
//!
//! ```ignore
//! let dispatcher = DispatcherBuilder::<FaceConfig>::new(FaceSettings::default(), FaceAlgorithm::new)
//!     .config(DispatcherConfig::new()?)
//!     .cache_capacity(64)
//!     .delivery_mode(DeliveryMode::AfterUnlock)
//!     .build()?;
//! ```

use parking_lot::Mutex;
use tracing::debug;

use super::recognition_dispatcher::DispatcherInner;
use super::RecognitionDispatcher;
use crate::alias::AOF;
use crate::alias::SOF;
use crate::DeliveryMode;
use crate::DispatcherConfig;
use crate::LazyAlgorithm;
use crate::ListenerRegistry;
use crate::Result;
use crate::ResultCache;
use crate::SettingsVersion;
use crate::TypeConfig;

pub struct DispatcherBuilder<T>
where
    T: TypeConfig,
{
    settings: SOF<T>,
    algorithm: LazyAlgorithm<T>,
    config: DispatcherConfig,
}

impl<T> DispatcherBuilder<T>
where
    T: TypeConfig,
{
    /// `factory` is not called here; the algorithm is built on the first
    /// cache miss.
    pub fn new<F>(
        settings: SOF<T>,
        factory: F,
    ) -> Self
    where
        F: FnMut() -> AOF<T> + Send + 'static,
    {
        Self {
            settings,
            algorithm: LazyAlgorithm::new(factory),
            config: DispatcherConfig::default(),
        }
    }

    /// Replaces the whole configuration, including earlier overrides.
    pub fn config(
        mut self,
        config: DispatcherConfig,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn cache_capacity(
        mut self,
        capacity: usize,
    ) -> Self {
        self.config.cache.capacity = capacity;
        self
    }

    pub fn delivery_mode(
        mut self,
        delivery: DeliveryMode,
    ) -> Self {
        self.config.notify.delivery = delivery;
        self
    }

    pub fn name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.config.name = name.into();
        self
    }

    /// Validates the configuration and assembles the dispatcher.
    pub fn build(self) -> Result<RecognitionDispatcher<T>> {
        let config = self.config.validate()?;
        debug!(
            dispatcher = %config.name,
            cache_capacity = config.cache.capacity,
            delivery = ?config.notify.delivery,
            "Recognition dispatcher built"
        );

        Ok(RecognitionDispatcher::from_inner(DispatcherInner {
            name: config.name,
            delivery: config.notify.delivery,
            cache: ResultCache::new(config.cache.capacity),
            settings: SettingsVersion::new(self.settings),
            listeners: ListenerRegistry::new(),
            engine: Mutex::new(self.algorithm),
        }))
    }
}
