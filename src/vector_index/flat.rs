//! Exact (brute-force) L2 index.
//!
//! Vectors are stored row-major in one contiguous buffer. Search scans every row and
//! keeps the best `k` in a bounded max-heap.

use super::{squared_l2, Neighbor, VectorIndex};
use crate::error::{Result, VoxragError};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Flat in-memory index with exact Euclidean search.
#[derive(Debug, Default, Clone)]
pub struct FlatL2Index {
    dimension: Option<usize>,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index whose dimension is fixed by the first added vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with a known dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
            data: Vec::new(),
        }
    }

    fn row(&self, position: usize, dimension: usize) -> &[f32] {
        &self.data[position * dimension..(position + 1) * dimension]
    }
}

impl VectorIndex for FlatL2Index {
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };

        let dimension = match self.dimension {
            Some(d) => d,
            None if !first.is_empty() => first.len(),
            None => {
                return Err(VoxragError::DimensionMismatch {
                    expected: 0,
                    actual: 0,
                })
            }
        };

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(VoxragError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        self.dimension = Some(dimension);
        self.data.reserve(vectors.len() * dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }

        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(VoxragError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }

        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if self.data.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != dimension {
            return Err(VoxragError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let k = k.min(self.len());
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        for position in 0..self.len() {
            let candidate = Candidate {
                distance: squared_l2(query, self.row(position, dimension)),
                position,
            };

            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                position: c.position,
                distance: c.distance.sqrt(),
            })
            .collect())
    }

    fn len(&self) -> usize {
        match self.dimension {
            Some(d) if d > 0 => self.data.len() / d,
            _ => 0,
        }
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

/// Heap entry ordered by distance, then by position so ties resolve deterministically.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f32,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.position.cmp(&other.position))
    }
}
