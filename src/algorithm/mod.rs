//! Recognition algorithm seam
//!
//! The algorithm is an external, stateful collaborator. The dispatcher only
//! ever touches it from inside its exclusive section, so implementations get
//! `&mut self` and need not be `Sync`.

mod lazy_algorithm;
pub use lazy_algorithm::*;


#[cfg(test)]
use mockall::automock;

use crate::alias::IOF;
use crate::alias::OOF;
use crate::alias::SOF;
use crate::ProcessError;
use crate::TypeConfig;

#[cfg_attr(test, automock)]
pub trait RecognitionAlgorithm<T>: Send + 'static
where
    T: TypeConfig,
{
    /// Reconfigures the algorithm. Called at most once per settings change,
    /// right before the next computation.
    fn apply(
        &mut self,
        settings: &SOF<T>,
    );

    /// Recognizes one input under the currently applied settings.
    fn process(
        &mut self,
        input: &IOF<T>,
    ) -> std::result::Result<OOF<T>, ProcessError>;
}
