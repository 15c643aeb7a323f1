//! Dependent coordinate and speed selection.
//!
//! Both selections are pure functions of the current configuration. The
//! coordinate choice maximizes Newton conditioning for the configuration
//! solver; the speed choice picks the constraint-determined speeds whose
//! directions participate most strongly in the constrained contact subspace.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::warn;
use velo_model::{Evaluator, State, CONTACT_SUBSPACE_DIM};

/// Singular values below this count toward rank deficiency.
const RANK_EPS: f64 = 1e-10;

/// Index of the coordinate the configuration constraint is most sensitive
/// to at the current configuration — the largest-magnitude entry of
/// ∂f_c/∂q.
pub fn best_dependent_coordinate<E: Evaluator>(eval: &E, state: &State) -> usize {
    let df = eval.holonomic_jacobian(state);
    let mut best = 0;
    for i in 1..df.len() {
        if df[i].abs() > df[best].abs() {
            best = i;
        }
    }
    best
}

/// Candidate speed ranked by its participation score. Exact score ties
/// prefer the lower index so selection is reproducible.
#[derive(Debug)]
struct Candidate {
    score: f64,
    index: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Choose the `m` speeds best treated as constraint-determined.
///
/// Takes the velocity-constraint Jacobian restricted to the six
/// ground-contact speeds, computes its right singular vectors, and scores
/// each candidate by the squared norm of its row across them. A numerical
/// rank below `m` means the constraints are not all independent here; that
/// is logged and selection proceeds best-effort — downstream residuals are
/// the caller's check.
pub fn best_dependent_speeds<E: Evaluator>(eval: &E, state: &State) -> BTreeSet<usize> {
    let dims = eval.dims();
    let b = eval.constraint_jacobian(state);
    let contact = b.columns(0, CONTACT_SUBSPACE_DIM).clone_owned();

    let svd = contact.svd(false, true);
    let rank = svd.rank(RANK_EPS);
    if rank < dims.m {
        warn!(
            rank,
            expected = dims.m,
            "constraint matrix is rank deficient over the contact subspace; \
             not all constraints are active"
        );
    }
    let v_t = svd.v_t.expect("SVD computed with right singular vectors");

    let mut heap: BinaryHeap<Candidate> = (0..CONTACT_SUBSPACE_DIM)
        .map(|i| Candidate {
            score: v_t.column(i).norm_squared(),
            index: i,
        })
        .collect();

    let mut indices = BTreeSet::new();
    for _ in 0..dims.m {
        if let Some(c) = heap.pop() {
            indices.insert(c.index);
        }
    }
    indices
}
