use std::fmt::Debug;
use std::hash::Hash;

use crate::RecognitionAlgorithm;

/// Bundles every type a dispatcher is generic over, so components only carry
/// a single `T: TypeConfig` parameter.
pub trait TypeConfig:
    Sync + Send + Sized + Debug + Clone + Copy + Default + Eq + PartialEq + Ord + PartialOrd + 'static
{
    /// Input submitted for recognition; doubles as the cache key.
    type I: Hash + Eq + Clone + Send + Sync + Debug + 'static;

    /// Recognition settings; two values are the same iff `==`.
    type S: PartialEq + Clone + Send + Sync + Debug + 'static;

    /// Output of one recognition.
    type O: Send + Sync + Debug + 'static;

    type A: RecognitionAlgorithm<Self>;
}

pub mod alias {
    use super::TypeConfig;

    pub type IOF<T> = <T as TypeConfig>::I;

    pub type SOF<T> = <T as TypeConfig>::S;

    pub type OOF<T> = <T as TypeConfig>::O;

    pub type AOF<T> = <T as TypeConfig>::A;
}
