use std::fmt::Debug;

use tracing::debug;

use crate::alias::AOF;
use crate::TypeConfig;

/// Builds the algorithm on first use. Creating an algorithm instance is
/// expensive, so a dispatcher that only ever serves cache hits never pays
/// for it.
pub type AlgorithmFactory<T> = Box<dyn FnMut() -> AOF<T> + Send>;

/// Algorithm slot owned by the dispatcher's exclusive section.
pub struct LazyAlgorithm<T>
where
    T: TypeConfig,
{
    factory: AlgorithmFactory<T>,
    instance: Option<AOF<T>>,
}

impl<T> Debug for LazyAlgorithm<T>
where
    T: TypeConfig,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LazyAlgorithm")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl<T> LazyAlgorithm<T>
where
    T: TypeConfig,
{
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> AOF<T> + Send + 'static,
    {
        Self {
            factory: Box::new(factory),
            instance: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }

    /// Returns the algorithm, invoking the factory if this is the first use.
    pub fn get_or_init(&mut self) -> &mut AOF<T> {
        let factory = &mut self.factory;
        self.instance.get_or_insert_with(|| {
            debug!("Instantiating recognition algorithm");
            factory()
        })
    }
}
