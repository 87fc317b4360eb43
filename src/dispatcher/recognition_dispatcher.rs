use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::ProcessOutcome;
use super::Recognition;
use crate::alias::AOF;
use crate::alias::IOF;
use crate::alias::OOF;
use crate::alias::SOF;
use crate::metrics::CACHE_EVICTION_COUNTER;
use crate::metrics::CACHE_LOOKUP_COUNTER;
use crate::metrics::RECOGNITION_DURATION_METRIC;
use crate::metrics::RECOGNITION_FAILURE_COUNTER;
use crate::metrics::SETTINGS_APPLIED_COUNTER;
use crate::CacheStats;
use crate::DeliveryMode;
use crate::DispatcherBuilder;
use crate::ExecutionContext;
use crate::LazyAlgorithm;
use crate::ListenerHandle;
use crate::ListenerRegistry;
use crate::RecognitionAlgorithm;
use crate::RecognitionListener;
use crate::Result;
use crate::ResultCache;
use crate::SettingsVersion;
use crate::TypeConfig;

pub(crate) struct DispatcherInner<T>
where
    T: TypeConfig,
{
    pub(crate) name: String,
    pub(crate) delivery: DeliveryMode,
    pub(crate) cache: ResultCache<IOF<T>, Arc<OOF<T>>>,
    pub(crate) settings: SettingsVersion<SOF<T>>,
    pub(crate) listeners: ListenerRegistry<T>,
    /// Exclusive section: the algorithm and everything applied to it
    pub(crate) engine: Mutex<LazyAlgorithm<T>>,
}

/// Memoizing front of a [`RecognitionAlgorithm`]
///
/// Cloning is cheap and yields another handle to the same dispatcher; the
/// `source` passed to listeners is such a handle.
pub struct RecognitionDispatcher<T>
where
    T: TypeConfig,
{
    inner: Arc<DispatcherInner<T>>,
}

impl<T> Clone for RecognitionDispatcher<T>
where
    T: TypeConfig,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for RecognitionDispatcher<T>
where
    T: TypeConfig,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RecognitionDispatcher")
            .field("name", &self.inner.name)
            .field("delivery", &self.inner.delivery)
            .field("cache", &self.inner.cache)
            .field("listeners", &self.inner.listeners)
            .finish()
    }
}

impl<T> RecognitionDispatcher<T>
where
    T: TypeConfig,
{
    /// Dispatcher with default configuration: capacity 20, barrier delivery.
    pub fn new<F>(
        settings: SOF<T>,
        factory: F,
    ) -> Result<Self>
    where
        F: FnMut() -> AOF<T> + Send + 'static,
    {
        DispatcherBuilder::new(settings, factory).build()
    }

    pub(crate) fn from_inner(inner: DispatcherInner<T>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Recognizes `input` and notifies every listener on `context`.
    ///
    /// A cached result is delivered without touching the algorithm. On a
    /// miss the algorithm is locked, pending settings are applied, the input
    /// is processed and a successful result is cached. Failures reach the
    /// listeners as `Err` and are not cached.
    ///
    /// Unless delivery is fire-and-forget, this returns after the listeners
    /// ran. With [`DeliveryMode::Barrier`] the algorithm stays locked until
    /// then, so a listener calling `process` on this dispatcher deadlocks as
    /// soon as the nested call misses the cache: the nested miss waits for
    /// the lock while the outer call waits for the listener. This holds for
    /// every context, including an inline one and the [`crate::ThreadExecutor`]
    /// the listener runs on (a wait issued from its worker runs in place).
    /// Use [`DeliveryMode::AfterUnlock`] for listeners that re-enter.
    ///
    /// # Errors
    /// Only notification handoff failures ([`crate::DispatchError`]) are
    /// returned; the result may already be cached when that happens.
    pub fn process(
        &self,
        input: IOF<T>,
        context: &dyn ExecutionContext,
    ) -> Result<ProcessOutcome> {
        let inner = &self.inner;
        let wait = inner.delivery.waits_for_delivery();

        if let Some(output) = inner.cache.get(&input) {
            CACHE_LOOKUP_COUNTER.with_label_values(&[inner.name.as_str(), "hit"]).inc();
            trace!(dispatcher = %inner.name, ?input, "Cache hit");

            inner.listeners.notify_all(self, input, Ok(output), context, wait)?;
            return Ok(ProcessOutcome::CacheHit);
        }
        CACHE_LOOKUP_COUNTER.with_label_values(&[inner.name.as_str(), "miss"]).inc();
        trace!(dispatcher = %inner.name, ?input, "Cache miss");

        let mut engine = inner.engine.lock();
        let recognition = self.compute(&mut engine, &input);

        let outcome = match &recognition {
            Ok(output) => {
                if let Some((evicted, _)) = inner.cache.put(input.clone(), output.clone()) {
                    CACHE_EVICTION_COUNTER.with_label_values(&[inner.name.as_str()]).inc();
                    debug!(dispatcher = %inner.name, ?evicted, "Cached result evicted");
                }
                ProcessOutcome::Computed
            }
            Err(e) => {
                RECOGNITION_FAILURE_COUNTER.with_label_values(&[inner.name.as_str()]).inc();
                warn!(dispatcher = %inner.name, ?input, "Recognition failed: {}", e);
                ProcessOutcome::Failed
            }
        };

        if !inner.delivery.holds_lock_during_delivery() {
            drop(engine);
            inner.listeners.notify_all(self, input, recognition, context, wait)?;
        } else {
            inner.listeners.notify_all(self, input, recognition, context, wait)?;
            drop(engine);
        }

        Ok(outcome)
    }

    /// Runs inside the exclusive section.
    fn compute(
        &self,
        engine: &mut LazyAlgorithm<T>,
        input: &IOF<T>,
    ) -> Recognition<T> {
        let inner = &self.inner;
        let algorithm = engine.get_or_init();

        if let Some(settings) = inner.settings.pending() {
            debug!(dispatcher = %inner.name, ?settings, "Applying recognition settings");
            algorithm.apply(&settings);
            inner.settings.mark_applied(settings);
            SETTINGS_APPLIED_COUNTER.with_label_values(&[inner.name.as_str()]).inc();
        }

        let started = Instant::now();
        let result = algorithm.process(input);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        RECOGNITION_DURATION_METRIC
            .with_label_values(&[inner.name.as_str()])
            .observe(elapsed_ms);
        trace!(dispatcher = %inner.name, elapsed_ms, "Recognition computed");

        result.map(Arc::new).map_err(Arc::new)
    }

    /// Registers `listener`, returning its handle. Registering the same
    /// listener allocation twice returns the original handle.
    pub fn add_listener(
        &self,
        listener: Arc<dyn RecognitionListener<T>>,
    ) -> ListenerHandle {
        self.inner.listeners.add(listener)
    }

    /// Unregisters a listener; unknown handles are ignored.
    pub fn remove_listener(
        &self,
        handle: ListenerHandle,
    ) -> bool {
        self.inner.listeners.remove(handle)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Settings the next computation will run under.
    pub fn settings(&self) -> SOF<T> {
        self.inner.settings.current()
    }

    /// Replaces the recognition settings. Returns `false` if `settings`
    /// equals the current value.
    ///
    /// Never blocks on a computation in progress; the new settings are
    /// applied right before the next cache miss is computed. Results already
    /// cached are kept and keep being served for their inputs, even though
    /// they were computed under the previous settings.
    pub fn set_settings(
        &self,
        settings: SOF<T>,
    ) -> bool {
        let changed = self.inner.settings.set(settings);
        if changed {
            debug!(
                dispatcher = %self.inner.name,
                cache_len = self.inner.cache.len(),
                "Recognition settings changed; cached results are kept"
            );
        }
        changed
    }

    /// True while settings changed since the algorithm last received them
    pub fn has_pending_settings(&self) -> bool {
        self.inner.settings.is_dirty()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Whether `input` currently has a cached result
    pub fn is_cached(
        &self,
        input: &IOF<T>,
    ) -> bool {
        self.inner.cache.contains(input)
    }

    /// Whether the algorithm has been built. Waits for a computation in progress.
    pub fn is_algorithm_initialized(&self) -> bool {
        self.inner.engine.lock().is_initialized()
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.inner.delivery
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}
