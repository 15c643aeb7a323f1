//! Constraint force reconstruction.
//!
//! Recovers the physically interpretable contact forces and steer torque at
//! a steady (zero generalized acceleration) state. After the constraint
//! reduction the system has `o − m` equations in 7 unknowns; which equations
//! carry the information depends on parameters and configuration, so the
//! solve is an SVD least squares over all of them rather than a hand-picked
//! square subset.

use velo_math::{DMat, DVec};
use velo_model::{Evaluator, State, CONSTRAINT_FORCE_CHANNELS};

use crate::reduction::{fold_rows, fold_vec, reduction_matrix, SINGULAR_EPS};

/// Reconstruct the 7 contact/steer force-torque values: rear and front
/// longitudinal/lateral/normal contact forces, then steer torque (the
/// `ForceChannel` order).
///
/// Valid only where the generalized accelerations vanish. `inputs` is the
/// length-`s` applied force vector; its constraint force channels are
/// ignored — they are the unknowns.
pub fn steady_constraint_forces<E: Evaluator>(eval: &E, state: &State, inputs: &DVec) -> DVec {
    let dims = eval.dims();
    debug_assert_eq!(inputs.len(), dims.s);

    let perm = state.permutation();
    let bias = perm.gather_vec(&eval.inertia_forces_zero_accel(state));
    let gaf = perm.gather_rows(&eval.force_coefficients(state));

    let reduction = reduction_matrix(eval, state);
    let gaf_reduced = fold_rows(&reduction, &gaf);
    let bias_reduced = fold_vec(&reduction, &bias);

    // Columns for the unknown constraint forces, in output order.
    let n_reduced = dims.o - dims.m;
    let mut coefficients = DMat::zeros(n_reduced, CONSTRAINT_FORCE_CHANNELS.len());
    for (k, &ch) in CONSTRAINT_FORCE_CHANNELS.iter().enumerate() {
        coefficients.set_column(k, &gaf_reduced.column(ch));
    }

    // Known applied channels move to the right-hand side.
    let mut rhs = bias_reduced;
    for ch in 0..dims.s {
        if !CONSTRAINT_FORCE_CHANNELS.contains(&ch) {
            rhs += &(gaf_reduced.column(ch) * inputs[ch]);
        }
    }
    rhs = -rhs;

    let svd = coefficients.svd(true, true);
    svd.solve(&rhs, SINGULAR_EPS)
        .unwrap_or_else(|_| DVec::zeros(CONSTRAINT_FORCE_CHANNELS.len()))
}
