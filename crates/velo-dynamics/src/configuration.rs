//! Configuration (holonomic) constraint solver.
//!
//! Newton-Raphson on the single dependent coordinate, all other coordinates
//! held fixed. The constraint expresses front-wheel ground contact; the
//! dependent coordinate is normally pitch, chosen by the selector.

use velo_model::{Evaluator, Result, State};

use crate::selection::best_dependent_coordinate;

/// Below this magnitude the constraint derivative cannot reliably move the
/// contact point and the iteration is abandoned.
const DERIVATIVE_FLOOR: f64 = 1e-14;

/// Outcome of a configuration solve, reported as data: non-convergence and
/// degenerate pivots are for the caller to judge, not hard failures.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationReport {
    /// Newton steps taken. Zero when the solve aborted without progress.
    pub iterations: usize,
    /// Constraint residual at exit.
    pub residual: f64,
    /// The constraint derivative w.r.t. the dependent coordinate was below
    /// the floor; the coordinate was restored to its pre-call value and a
    /// different dependent coordinate should be selected.
    pub degenerate: bool,
}

impl ConfigurationReport {
    /// Whether the residual met the requested tolerance.
    pub fn converged(&self, tolerance: f64) -> bool {
        !self.degenerate && self.residual.abs() <= tolerance
    }
}

/// Drive the holonomic constraint residual to `tolerance` by adjusting
/// `q[dependent_coordinate]` in place.
///
/// Mutates only that one coordinate. On a degenerate pivot the coordinate is
/// restored and the report carries zero iterations; the caller is expected
/// to re-select via [`best_dependent_coordinate`] and retry.
pub fn solve_configuration<E: Evaluator>(
    eval: &E,
    state: &mut State,
    tolerance: f64,
    max_iterations: usize,
) -> ConfigurationReport {
    let dep = state.dependent_coordinate();
    let q_prev = state.q[dep];

    let mut f = eval.holonomic(state);
    let mut iterations = 0;

    while f.abs() > tolerance && iterations < max_iterations {
        let df = eval.holonomic_jacobian(state);
        if df[dep].abs() < DERIVATIVE_FLOOR {
            state.q[dep] = q_prev;
            return ConfigurationReport {
                iterations: 0,
                residual: f,
                degenerate: true,
            };
        }
        state.q[dep] -= f / df[dep];
        iterations += 1;
        f = eval.holonomic(state);
    }

    ConfigurationReport {
        iterations,
        residual: f,
        degenerate: false,
    }
}

/// Pitch of the reference (steady, upright) configuration.
///
/// Runs the configuration solver on an internal scratch state, so the
/// caller's state is untouched. The dependent coordinate is chosen by the
/// selector at the scratch configuration.
pub fn reference_pitch<E: Evaluator>(
    eval: &E,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64> {
    let mut scratch = State::new(&eval.dims())?;
    let dep = best_dependent_coordinate(eval, &scratch);
    scratch.set_dependent_coordinate(dep)?;
    solve_configuration(eval, &mut scratch, tolerance, max_iterations);
    Ok(scratch.q[velo_model::state::PITCH])
}
