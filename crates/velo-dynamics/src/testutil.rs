//! Synthetic evaluator with analytically known constraint geometry, shared
//! by the solver unit tests.

use velo_math::{DMat, DVec};
use velo_model::{Dimensions, Evaluator, State};

/// Evaluator over fixed, hand-chosen equation terms.
///
/// The holonomic constraint is
/// `f_c(q) = sin(q1) + 2 sin(q2) + 0.5 sin(q3) - target`,
/// so pitch (q2) is the best-conditioned dependent coordinate near upright
/// poses and the derivative vanishes exactly at q2 = π/2.
///
/// The constraint Jacobian, mass matrix, and force coefficients are held as
/// plain fields so individual tests can craft geometry (singular blocks,
/// rank-deficient subspaces, self-consistent equilibria).
pub struct SyntheticEvaluator {
    pub dims: Dimensions,
    pub target: f64,
    pub b: DMat,
    pub gradient: DVec,
    pub mass: DMat,
    pub gaf: DMat,
    pub gif_zero: DVec,
}

impl SyntheticEvaluator {
    pub fn new() -> Self {
        let dims = Dimensions::bicycle();
        Self {
            dims,
            target: 0.5,
            b: default_constraint_jacobian(&dims),
            gradient: DVec::zeros(dims.m * dims.o * dims.n_min),
            mass: default_mass_matrix(&dims),
            gaf: default_force_coefficients(&dims),
            gif_zero: DVec::zeros(dims.o),
        }
    }

    /// Variant whose contact block is exactly singular when speeds {0, 1, 2}
    /// are selected dependent (column 1 duplicates column 0).
    pub fn with_singular_contact_block() -> Self {
        let mut eval = Self::new();
        let col0 = eval.b.column(0).clone_owned();
        eval.b.set_column(1, &col0);
        eval
    }

    /// Fresh state matching this evaluator's dimensions.
    pub fn make_state(&self) -> State {
        State::new(&self.dims).unwrap()
    }
}

/// `[I | 2I | fill]`: rows are mutually orthogonal, the contact-subspace
/// singular vectors weight speeds 3..6 four times heavier than 0..3, and the
/// {3, 4, 5} dependent block is trivially invertible.
fn default_constraint_jacobian(dims: &Dimensions) -> DMat {
    let mut b = DMat::zeros(dims.m, dims.o);
    for r in 0..dims.m {
        b[(r, r)] = 1.0;
        b[(r, r + 3)] = 2.0;
    }
    for r in 0..dims.m {
        for c in 6..dims.o {
            b[(r, c)] = 0.1 * (((r + 1) * (c + 1)) % 5) as f64;
        }
    }
    b
}

/// Diagonally dominant symmetric matrix.
fn default_mass_matrix(dims: &Dimensions) -> DMat {
    DMat::from_fn(dims.o, dims.o, |r, c| {
        if r == c {
            2.0 + r as f64
        } else {
            0.1
        }
    })
}

/// Near-identity columns on the constraint force channels (so the reduced
/// 9×7 system has full column rank) and a deterministic fill elsewhere.
fn default_force_coefficients(dims: &Dimensions) -> DMat {
    let mut gaf = DMat::from_fn(dims.o, dims.s, |r, c| {
        0.2 * ((((r * 7 + c * 3) % 11) as f64) - 5.0) / 5.0
    });
    for (k, &ch) in velo_model::CONSTRAINT_FORCE_CHANNELS.iter().enumerate() {
        for r in 0..dims.o {
            gaf[(r, ch)] = if r == k {
                1.0
            } else {
                0.05 * ((r + k) as f64).sin()
            };
        }
    }
    gaf
}

impl Evaluator for SyntheticEvaluator {
    fn dims(&self) -> Dimensions {
        self.dims
    }

    fn holonomic(&self, state: &State) -> f64 {
        state.q[1].sin() + 2.0 * state.q[2].sin() + 0.5 * state.q[3].sin() - self.target
    }

    fn holonomic_jacobian(&self, state: &State) -> DVec {
        let mut df = DVec::zeros(self.dims.n);
        df[1] = state.q[1].cos();
        df[2] = 2.0 * state.q[2].cos();
        df[3] = 0.5 * state.q[3].cos();
        df
    }

    fn constraint_jacobian(&self, _state: &State) -> DMat {
        self.b.clone()
    }

    fn constraint_jacobian_gradient(&self, _state: &State) -> DVec {
        self.gradient.clone()
    }

    fn mass_matrix(&self, _state: &State) -> DMat {
        self.mass.clone()
    }

    fn inertia_forces_zero_accel(&self, _state: &State) -> DVec {
        self.gif_zero.clone()
    }

    fn force_coefficients(&self, _state: &State) -> DMat {
        self.gaf.clone()
    }

    fn kinematic_rhs(&self, state: &State) -> DVec {
        DVec::from_fn(self.dims.n, |k, _| -state.u[k])
    }
}
