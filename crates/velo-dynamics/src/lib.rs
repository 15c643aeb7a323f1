//! Constraint-consistent solvers for the velo bicycle model.
//!
//! Implements:
//! - Newton-Raphson configuration (holonomic) constraint solving
//! - SVD-based dependent coordinate/speed selection
//! - QR-based velocity (nonholonomic) constraint solving
//! - Constraint-Jacobian reduction
//! - Equations-of-motion assembly
//! - Least-squares contact/steer force reconstruction
//!
//! Every solver is a free function over `(&impl Evaluator, &mut State)`;
//! nothing is retained across calls and decompositions are computed fresh
//! each time.

pub mod assembly;
pub mod configuration;
pub mod forces;
pub mod jacobian;
pub mod reduction;
pub mod selection;
pub mod velocity;

pub use assembly::{assemble_dynamics, AssembledDynamics};
pub use configuration::{reference_pitch, solve_configuration, ConfigurationReport};
pub use forces::steady_constraint_forces;
pub use jacobian::{
    constraint_jacobian_coordinate_gradient, constraint_jacobian_rate, tensor_offset, tensor_slice,
};
pub use reduction::{bd_inverse_bi, fold_rows, fold_vec, reduction_matrix};
pub use selection::{best_dependent_coordinate, best_dependent_speeds};
pub use velocity::solve_velocity_constraints;

#[cfg(test)]
pub(crate) mod testutil;
