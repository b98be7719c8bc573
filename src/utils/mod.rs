/*!
# Utilities

- abstractions over [`Set`] and [`Map`] for algorithms that only need membership/lookup,
- the `NodeMapper`-framework for mapping one graph to another (see [`NodeMapSetter`] / [`NodeMapGetter`]),
- the [`Indexer`] interning external vertex names as dense ids.
*/

use num::{One, Zero};

pub mod indexer;
pub mod map;
pub mod node_mapper;
pub mod set;

pub use indexer::Indexer;
pub use map::Map;
pub use node_mapper::{NodeMapGetter, NodeMapInverse, NodeMapSetter, NodeMapper};
pub use set::Set;

/// Helper trait for probabilities
pub trait Probability {
    /// Returns *true* if the probability is valid (ie. between `0` and `1`)
    fn is_valid_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn probability_bounds() {
        assert!(0.0f64.is_valid_probability());
        assert!(1.0f64.is_valid_probability());
        assert!(0.25f32.is_valid_probability());
        assert!(!1.5f64.is_valid_probability());
        assert!(!(-0.1f64).is_valid_probability());
        assert!(!f64::NAN.is_valid_probability());
    }
}
