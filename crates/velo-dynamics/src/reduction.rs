//! Constraint-Jacobian reduction.
//!
//! The reduction matrix folds dependent-speed rows of any row-partitioned
//! system into the independent rows, eliminating the `m` constraint-
//! determined unknowns. Both the equations-of-motion assembler and the force
//! reconstructor apply it; it is recomputed on every call, never cached.

use velo_math::{DMat, DVec};
use velo_model::{Evaluator, State};

/// Cutoff for the SVD fallback solve on a singular constraint block.
pub(crate) const SINGULAR_EPS: f64 = 1e-12;

/// Solve `B_d · X = rhs` with a rank-revealing column-pivoting QR.
///
/// An exactly singular block falls back to an SVD least-squares solve so an
/// adversarial dependent-speed selection degrades to a large-residual result
/// instead of a panic.
pub(crate) fn solve_constraint_block(b_d: &DMat, rhs: &DMat) -> DMat {
    let qr = b_d.clone().col_piv_qr();
    if let Some(x) = qr.solve(rhs) {
        return x;
    }
    let svd = b_d.clone().svd(true, true);
    svd.solve(rhs, SINGULAR_EPS)
        .unwrap_or_else(|_| DMat::zeros(b_d.ncols(), rhs.ncols()))
}

pub(crate) fn solve_constraint_block_vec(b_d: &DMat, rhs: &DVec) -> DVec {
    let x = solve_constraint_block(b_d, &DMat::from_column_slice(rhs.len(), 1, rhs.as_slice()));
    DVec::from_column_slice(x.as_slice())
}

/// Column-permuted constraint Jacobian split into its independent block
/// `B_i` (m × (o−m)) and dependent block `B_d` (m × m).
pub(crate) fn constraint_blocks<E: Evaluator>(eval: &E, state: &State) -> (DMat, DMat) {
    let dims = eval.dims();
    let b = state.permutation().gather_cols(&eval.constraint_jacobian(state));
    let b_i = b.columns(0, dims.o - dims.m).clone_owned();
    let b_d = b.columns(dims.o - dims.m, dims.m).clone_owned();
    (b_i, b_d)
}

/// The m × (o−m) solution X of `B_d · X = −B_i`.
///
/// X maps independent speeds to the dependent speeds the rolling constraints
/// impose: `u_d = X · u_i`.
pub fn bd_inverse_bi<E: Evaluator>(eval: &E, state: &State) -> DMat {
    let (b_i, b_d) = constraint_blocks(eval, state);
    solve_constraint_block(&b_d, &(-b_i))
}

/// The (o−m) × m reduction map `C = (B_d⁻¹ · (−B_i))ᵀ`.
///
/// For a system with rows permuted dependent-last, the reduced equations are
/// `independent_rows + C · dependent_rows` — see [`fold_rows`].
pub fn reduction_matrix<E: Evaluator>(eval: &E, state: &State) -> DMat {
    bd_inverse_bi(eval, state).transpose()
}

/// Fold the trailing dependent rows of a row-permuted (o × k) matrix into
/// its leading independent rows.
pub fn fold_rows(reduction: &DMat, rows: &DMat) -> DMat {
    let n_independent = reduction.nrows();
    let m = reduction.ncols();
    let independent = rows.rows(0, n_independent).clone_owned();
    let dependent = rows.rows(n_independent, m).clone_owned();
    independent + reduction * dependent
}

/// Vector form of [`fold_rows`].
pub fn fold_vec(reduction: &DMat, v: &DVec) -> DVec {
    let n_independent = reduction.nrows();
    let m = reduction.ncols();
    let independent = v.rows(0, n_independent).clone_owned();
    let dependent = v.rows(n_independent, m).clone_owned();
    independent + reduction * dependent
}
