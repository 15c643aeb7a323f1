//! velo — constraint-consistent bicycle multibody dynamics.
//!
//! This is the umbrella crate: it re-exports the core types from the
//! sub-crates and provides the `Bicycle` facade pairing a model evaluator
//! with a solver state.
//!
//! The heavy lifting lives in `velo-dynamics`: Newton configuration
//! solving, SVD-based dependent-index selection, QR-based velocity
//! constraint solving, constraint reduction, dynamics assembly, and
//! least-squares force reconstruction. The closed-form equations come in
//! through the [`Evaluator`] trait; time integration of the assembled
//! system is the downstream integrator's job.

use std::collections::BTreeSet;

pub use velo_dynamics::{
    self, assemble_dynamics, bd_inverse_bi, best_dependent_coordinate, best_dependent_speeds,
    constraint_jacobian_coordinate_gradient, constraint_jacobian_rate, fold_rows, fold_vec,
    reduction_matrix, reference_pitch, solve_configuration, solve_velocity_constraints,
    steady_constraint_forces, tensor_offset, tensor_slice, AssembledDynamics, ConfigurationReport,
};
pub use velo_math::{self, DMat, DVec, SpeedPermutation, GRAVITY};
pub use velo_model::{
    self, AssemblyParams, BicycleParams, Dimensions, Evaluator, ForceChannel, ModelError, State,
    CONSTRAINT_FORCE_CHANNELS, CONTACT_SUBSPACE_DIM,
};

/// A bicycle model instance: one evaluator plus the solver state it keeps
/// consistent.
///
/// Construction verifies that the evaluator's output shapes agree with its
/// declared dimensions — the one failure mode of this layer that is a hard
/// error rather than a reported residual.
#[derive(Debug)]
pub struct Bicycle<E: Evaluator> {
    evaluator: E,
    state: State,
}

impl<E: Evaluator> Bicycle<E> {
    /// Pair an evaluator with a fresh zero state.
    pub fn new(evaluator: E) -> Result<Self, ModelError> {
        let dims = evaluator.dims();
        let state = State::new(&dims)?;
        check_evaluator_shapes(&evaluator, &state, &dims)?;
        Ok(Self { evaluator, state })
    }

    /// The paired evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Current solver state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable access for direct coordinate/speed assignment. Assignments
    /// do not re-enforce the constraints; run the solvers afterwards.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Re-select the dependent coordinate and speeds for the current
    /// configuration and install them in the state.
    pub fn select_dependent_indices(&mut self) -> Result<(), ModelError> {
        let coordinate = best_dependent_coordinate(&self.evaluator, &self.state);
        let speeds: BTreeSet<usize> = best_dependent_speeds(&self.evaluator, &self.state);
        self.state.set_dependent_coordinate(coordinate)?;
        self.state.set_dependent_speeds(speeds)
    }

    /// Newton-solve the holonomic constraint on the dependent coordinate.
    pub fn solve_configuration(
        &mut self,
        tolerance: f64,
        max_iterations: usize,
    ) -> ConfigurationReport {
        solve_configuration(&self.evaluator, &mut self.state, tolerance, max_iterations)
    }

    /// Solve the rolling constraints for the dependent speeds; returns the
    /// residual.
    pub fn solve_velocity_constraints(&mut self) -> DVec {
        solve_velocity_constraints(&self.evaluator, &mut self.state)
    }

    /// Assemble the constraint-consistent dynamics for the integrator.
    pub fn assemble_dynamics(&self, inputs: &DVec) -> AssembledDynamics {
        assemble_dynamics(&self.evaluator, &self.state, inputs)
    }

    /// Reconstruct contact/steer forces at a steady state.
    pub fn steady_constraint_forces(&self, inputs: &DVec) -> DVec {
        steady_constraint_forces(&self.evaluator, &self.state, inputs)
    }
}

/// Probe every evaluator output once and compare shapes against the
/// declared dimensions.
fn check_evaluator_shapes<E: Evaluator>(
    evaluator: &E,
    state: &State,
    dims: &Dimensions,
) -> Result<(), ModelError> {
    let mismatch = |what: &str, got: (usize, usize), want: (usize, usize)| {
        ModelError::DimensionMismatch(format!("{what}: got {got:?}, expected {want:?}"))
    };

    let df = evaluator.holonomic_jacobian(state);
    if df.len() != dims.n {
        return Err(mismatch("holonomic_jacobian", (df.len(), 1), (dims.n, 1)));
    }
    let b = evaluator.constraint_jacobian(state);
    if b.shape() != (dims.m, dims.o) {
        return Err(mismatch("constraint_jacobian", b.shape(), (dims.m, dims.o)));
    }
    let raw = evaluator.constraint_jacobian_gradient(state);
    let tensor_len = dims.m * dims.o * dims.n_min;
    if raw.len() != tensor_len {
        return Err(mismatch(
            "constraint_jacobian_gradient",
            (raw.len(), 1),
            (tensor_len, 1),
        ));
    }
    let mass = evaluator.mass_matrix(state);
    if mass.shape() != (dims.o, dims.o) {
        return Err(mismatch("mass_matrix", mass.shape(), (dims.o, dims.o)));
    }
    let gif = evaluator.inertia_forces_zero_accel(state);
    if gif.len() != dims.o {
        return Err(mismatch(
            "inertia_forces_zero_accel",
            (gif.len(), 1),
            (dims.o, 1),
        ));
    }
    let gaf = evaluator.force_coefficients(state);
    if gaf.shape() != (dims.o, dims.s) {
        return Err(mismatch("force_coefficients", gaf.shape(), (dims.o, dims.s)));
    }
    let f1 = evaluator.kinematic_rhs(state);
    if f1.len() != dims.n {
        return Err(mismatch("kinematic_rhs", (f1.len(), 1), (dims.n, 1)));
    }
    Ok(())
}
