//! Sparse matrix assembly from (row, col, value) triplets.

use sprs::{CsMat, TriMat};

use crate::error::{ReactorError, ReactorResult};

/// Unordered triplet list for an N×N matrix. Duplicate coordinates are summed
/// when the matrix is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletAccumulator {
    n: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl TripletAccumulator {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, row: usize, col: usize, value: f64) -> ReactorResult<()> {
        for index in [row, col] {
            if index >= self.n {
                return Err(ReactorError::IndexOutOfBounds { index, len: self.n });
            }
        }
        self.entries.push((row, col, value));
        Ok(())
    }

    /// Compressed (CSC) matrix with duplicates summed.
    pub fn finalize(self) -> CsMat<f64> {
        let mut tri = TriMat::with_capacity((self.n, self.n), self.entries.len());
        for (r, c, v) in self.entries {
            tri.add_triplet(r, c, v);
        }
        tri.to_csc()
    }
}
