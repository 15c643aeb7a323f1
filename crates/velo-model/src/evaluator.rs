//! Contract with the externally supplied closed-form model equations.

use velo_math::{DMat, DVec};

use crate::dims::Dimensions;
use crate::state::State;

/// Numerical evaluator of the closed-form bicycle equations.
///
/// Every method is a pure function of the state passed in; implementations
/// hold parameters but no mutable state of their own. The solver layer
/// treats this as opaque — how the terms are produced (generated code,
/// lookup, hand-derived) is not its concern.
///
/// Shapes are fixed by `dims()` and must agree with the `State` the solvers
/// carry; the `Bicycle` facade checks this once at construction.
pub trait Evaluator {
    /// Model dimensions (coordinate, speed, constraint, and input counts).
    fn dims(&self) -> Dimensions;

    /// Holonomic configuration constraint residual f_c(q). Zero when the
    /// front wheel touches the ground.
    fn holonomic(&self, state: &State) -> f64;

    /// Partial derivatives ∂f_c/∂q, length `n`.
    fn holonomic_jacobian(&self, state: &State) -> DVec;

    /// Velocity constraint Jacobian B = ∂f_v/∂u, shape `m × o`, columns in
    /// natural speed order.
    fn constraint_jacobian(&self, state: &State) -> DMat;

    /// Flattened rank-3 gradient of B with respect to lean, pitch, and
    /// steer, length `m·o·n_min`. The flattening must follow
    /// `velo_dynamics::jacobian::tensor_offset`: axis fastest, then
    /// constraint row, then speed column.
    fn constraint_jacobian_gradient(&self, state: &State) -> DVec;

    /// Mass matrix ∂(generalized inertia forces)/∂u̇, shape `o × o`, rows in
    /// natural speed order.
    fn mass_matrix(&self, state: &State) -> DMat;

    /// Generalized inertia forces evaluated at zero generalized
    /// acceleration, length `o`.
    fn inertia_forces_zero_accel(&self, state: &State) -> DVec;

    /// Generalized active force input coefficient matrix ∂gaf/∂r, shape
    /// `o × s`. Columns follow the force channel map in `crate::dims`.
    fn force_coefficients(&self, state: &State) -> DMat;

    /// Kinematic differential equation right-hand side f_1, length `n`,
    /// with the sign convention dq/dt = −f_1.
    fn kinematic_rhs(&self, state: &State) -> DVec;
}
