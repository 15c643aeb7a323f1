//! Equations-of-motion assembly.
//!
//! Builds the reduced dynamics consistent with the eliminated rolling
//! constraints. The assembler's contract ends at the assembled linear
//! system: solving `matrix · u̇ = forcing` and stepping time belong to the
//! downstream integrator.

use velo_math::{DMat, DVec};
use velo_model::{Evaluator, State};

use crate::jacobian::constraint_jacobian_rate;
use crate::reduction::{fold_rows, fold_vec, reduction_matrix};

/// Assembled constraint-consistent dynamics.
///
/// The coordinate rates integrate `q` directly; the square system yields
/// `u̇` in natural speed order once solved. Row partition: the `m`
/// velocity-constraint rows first, the `o − m` reduced dynamic rows second.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDynamics {
    /// dq/dt, length n.
    pub coordinate_rates: DVec,
    /// o × o coefficient matrix, columns in natural speed order.
    pub matrix: DMat,
    /// Right-hand side, length o.
    pub forcing: DVec,
}

/// Assemble the state-derivative system at the current state.
///
/// `inputs` is the length-`s` applied generalized force vector; its
/// constraint force channels must be zero — those forces are eliminated by
/// the reduction and do not drive the reduced dynamics.
///
/// Pure in the state: repeated calls at an unchanged state reproduce the
/// same system exactly.
pub fn assemble_dynamics<E: Evaluator>(eval: &E, state: &State, inputs: &DVec) -> AssembledDynamics {
    let dims = eval.dims();
    debug_assert_eq!(inputs.len(), dims.s);

    // Kinematic differential equations, sign-corrected from the evaluator
    // convention dq/dt = -f_1.
    let coordinate_rates = -eval.kinematic_rhs(state);

    // Reduced dynamics: fold the dependent mass-matrix rows into the
    // independent rows using the same kinematic relation the velocity
    // solver enforces.
    let reduction = reduction_matrix(eval, state);
    let mass = state.permutation().gather_rows(&eval.mass_matrix(state));
    let mass_reduced = fold_rows(&reduction, &mass);

    // Constraint rows on top, reduced dynamic rows below. Columns stay in
    // natural speed order, so the solved accelerations come back unpermuted.
    let b = eval.constraint_jacobian(state);
    let mut matrix = DMat::zeros(dims.o, dims.o);
    matrix.rows_mut(0, dims.m).copy_from(&b);
    matrix
        .rows_mut(dims.m, dims.o - dims.m)
        .copy_from(&mass_reduced);

    // Differentiated velocity constraint: B u̇ = -Ḃ u.
    let bdot = constraint_jacobian_rate(eval, state);
    let forcing_top = -(&bdot * &state.u);

    // M u̇ = -(gif_0 + gaf · r), reduced the same way as the mass rows.
    let bias = eval.inertia_forces_zero_accel(state);
    let applied = eval.force_coefficients(state) * inputs;
    let rhs_full = state.permutation().gather_vec(&(bias + applied));
    let forcing_bottom = -fold_vec(&reduction, &rhs_full);

    let mut forcing = DVec::zeros(dims.o);
    forcing.rows_mut(0, dims.m).copy_from(&forcing_top);
    forcing
        .rows_mut(dims.m, dims.o - dims.m)
        .copy_from(&forcing_bottom);

    AssembledDynamics {
        coordinate_rates,
        matrix,
        forcing,
    }
}
