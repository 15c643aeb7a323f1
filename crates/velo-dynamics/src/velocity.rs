//! Velocity (nonholonomic) constraint solver.
//!
//! Given the independent speeds, computes the dependent speeds so the
//! rolling-without-slipping constraints hold, writing them back into the
//! state. The returned residual is the caller's signal for ill-conditioned
//! or inconsistent selections; nothing is raised.

use velo_math::DVec;
use velo_model::{Evaluator, State};

use crate::reduction::{constraint_blocks, solve_constraint_block_vec};

/// Solve `B_d · u_d = −B_i · u_i` for the dependent speeds and write them
/// into `u` at the positions in `dependent_speeds`, ascending.
///
/// Returns the residual `B_d · u_d + B_i · u_i`, near zero for
/// well-conditioned constraint geometry.
pub fn solve_velocity_constraints<E: Evaluator>(eval: &E, state: &mut State) -> DVec {
    let u_i = state.independent_speeds_vec();
    let (b_i, b_d) = constraint_blocks(eval, state);

    let b_i_u_i = &b_i * &u_i;
    let u_d = solve_constraint_block_vec(&b_d, &(-&b_i_u_i));

    let dependent: Vec<usize> = state.dependent_speeds().iter().copied().collect();
    for (k, &idx) in dependent.iter().enumerate() {
        state.u[idx] = u_d[k];
    }

    &b_d * &u_d + b_i_u_i
}
