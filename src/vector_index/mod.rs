//! Vector index abstraction for the knowledge base.
//!
//! An index is an append-only list of equal-length vectors addressed by insertion
//! position, searchable by Euclidean distance.

mod flat;

pub use flat::FlatL2Index;

use crate::error::Result;
use serde::Serialize;

/// A search hit: a position in the index and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Position of the vector in insertion order.
    pub position: usize,
    /// Euclidean distance to the query (lower is closer).
    pub distance: f32,
}

/// Trait for nearest-neighbor index implementations.
pub trait VectorIndex: Send + Sync {
    /// Append vectors in order.
    ///
    /// Either every vector is appended or, on a dimension mismatch, none is.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()>;

    /// Return up to `k` nearest vectors, closest first.
    ///
    /// Every returned position is valid for the index as it is at call time.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Vector dimension, unset until the first vectors are added.
    fn dimension(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }
}
