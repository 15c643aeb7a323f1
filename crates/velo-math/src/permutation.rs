//! Dependent-last speed ordering.
//!
//! The constraint solvers partition the generalized speeds into independent
//! and dependent sets. All linear-algebra operations work on a reordered view
//! with independent speeds first and dependent speeds last; this module holds
//! that reordering as an index gather instead of an explicit permutation
//! matrix multiply.

use crate::{DMat, DVec};
use std::collections::BTreeSet;

/// Reordering of the `o` generalized speeds that places the independent
/// speeds first and the dependent speeds last, each group in ascending
/// natural-index order.
///
/// `order[k]` is the natural index of the speed sitting at reordered
/// position `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedPermutation {
    order: Vec<usize>,
    n_dependent: usize,
}

impl SpeedPermutation {
    /// Build the dependent-last ordering for `o` speeds.
    ///
    /// Indices in `dependent` must be in `0..o`; the set's ascending
    /// iteration order fixes the order of the trailing block.
    pub fn dependent_last(o: usize, dependent: &BTreeSet<usize>) -> Self {
        let mut order = Vec::with_capacity(o);
        order.extend((0..o).filter(|i| !dependent.contains(i)));
        order.extend(dependent.iter().copied());
        Self {
            order,
            n_dependent: dependent.len(),
        }
    }

    /// Identity ordering (no dependent speeds).
    pub fn identity(o: usize) -> Self {
        Self {
            order: (0..o).collect(),
            n_dependent: 0,
        }
    }

    /// Total number of speeds.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the permutation covers zero speeds.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of trailing dependent positions.
    pub fn n_dependent(&self) -> usize {
        self.n_dependent
    }

    /// Natural index at reordered position `k`.
    pub fn natural_index(&self, k: usize) -> usize {
        self.order[k]
    }

    /// Gather a length-`o` vector into reordered form.
    pub fn gather_vec(&self, v: &DVec) -> DVec {
        DVec::from_fn(self.order.len(), |k, _| v[self.order[k]])
    }

    /// Gather the rows of an `o × c` matrix into reordered form.
    ///
    /// Equivalent to the `P_uᵀ · M` reordering of a row-partitioned system.
    pub fn gather_rows(&self, m: &DMat) -> DMat {
        DMat::from_fn(self.order.len(), m.ncols(), |r, c| {
            m[(self.order[r], c)]
        })
    }

    /// Gather the columns of an `r × o` matrix into reordered form.
    ///
    /// Equivalent to the `M · P_u` reordering that moves dependent columns
    /// to the end.
    pub fn gather_cols(&self, m: &DMat) -> DMat {
        DMat::from_fn(m.nrows(), self.order.len(), |r, c| {
            m[(r, self.order[c])]
        })
    }
}
