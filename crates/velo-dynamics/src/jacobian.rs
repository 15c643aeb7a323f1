//! Constraint-Jacobian derivative reconstruction.
//!
//! The evaluator supplies ∂B/∂(lean, pitch, steer) as one flattened rank-3
//! tensor. The index-to-offset mapping is defined exactly once here
//! ([`tensor_offset`]) and both contractions read through it; a layout
//! mismatch with the evaluator would produce wrong but plausible-looking
//! numbers, so the mapping is part of the public contract and unit-tested.

use velo_math::{DMat, DVec};
use velo_model::{Dimensions, Evaluator, State};

/// Offset of element (constraint `row`, speed `col`, sensitivity `axis`) in
/// the flattened gradient tensor: axis fastest, then row, then column.
pub fn tensor_offset(dims: &Dimensions, row: usize, col: usize, axis: usize) -> usize {
    axis + dims.n_min * (row + dims.m * col)
}

/// Read one element of the flattened gradient tensor.
pub fn tensor_slice(raw: &DVec, dims: &Dimensions, row: usize, col: usize, axis: usize) -> f64 {
    raw[tensor_offset(dims, row, col, axis)]
}

/// Time derivative Ḃ of the velocity-constraint Jacobian (m × o).
///
/// Contracts the gradient tensor against the lean, pitch, and steer rates
/// (speeds 1..4): `Ḃ(r,c) = Σ_axis ∂B(r,c)/∂q_{axis+1} · u[axis+1]`.
pub fn constraint_jacobian_rate<E: Evaluator>(eval: &E, state: &State) -> DMat {
    let dims = eval.dims();
    let raw = eval.constraint_jacobian_gradient(state);
    let mut bdot = DMat::zeros(dims.m, dims.o);
    for axis in 0..dims.n_min {
        let rate = state.u[axis + 1];
        for r in 0..dims.m {
            for c in 0..dims.o {
                bdot[(r, c)] += tensor_slice(&raw, &dims, r, c, axis) * rate;
            }
        }
    }
    bdot
}

/// Gradient of the velocity constraints with respect to the coordinates
/// (m × n): zero except the lean/pitch/steer columns 1..4, which carry
/// `Σ_col ∂B(r,col)/∂q_{axis+1} · u[col]`.
pub fn constraint_jacobian_coordinate_gradient<E: Evaluator>(eval: &E, state: &State) -> DMat {
    let dims = eval.dims();
    let raw = eval.constraint_jacobian_gradient(state);
    let mut grad = DMat::zeros(dims.m, dims.n);
    for axis in 0..dims.n_min {
        for r in 0..dims.m {
            let mut acc = 0.0;
            for c in 0..dims.o {
                acc += tensor_slice(&raw, &dims, r, c, axis) * state.u[c];
            }
            grad[(r, axis + 1)] = acc;
        }
    }
    grad
}
