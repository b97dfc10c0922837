//! Flat in-memory vector index with an exhaustive nearest-neighbor scan.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("query has dimension {actual}, expected {expected}")]
    QueryDimensionMismatch { expected: usize, actual: usize },
    #[error("dimension must be at least 1")]
    ZeroDimension,
    #[error("k must be at least 1")]
    ZeroK,
}

/// A single search hit: position of the stored vector and its squared
/// Euclidean distance from the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance: f32,
}

/// Exhaustive-scan index over fixed-dimension vectors.
///
/// Vectors are stored row-major in one flat buffer. The index is immutable
/// after `build`; growing the collection means rebuilding it.
#[derive(Debug)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Validates and copies `vectors` into the index. Every vector must
    /// have exactly `dimension` components.
    pub fn build(dimension: usize, vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for (index, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    index,
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the `k` nearest stored vectors by squared Euclidean distance,
    /// ascending. Ties resolve to the lowest stored index, so results are
    /// deterministic. A `k` past the end returns every vector ranked.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>, IndexError> {
        if k == 0 {
            return Err(IndexError::ZeroK);
        }
        if query.len() != self.dimension {
            return Err(IndexError::QueryDimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Hit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(index, row)| Hit {
                index,
                distance: squared_distance(query, row),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        hits.truncate(k.min(hits.len()));

        Ok(hits)
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
