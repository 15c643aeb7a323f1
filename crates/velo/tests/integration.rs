//! Integration tests for the velo solver pipeline.

use approx::assert_relative_eq;
use velo::{
    reference_pitch, Bicycle, DMat, DVec, Dimensions, Evaluator, ModelError, State,
    CONSTRAINT_FORCE_CHANNELS,
};

/// Evaluator over fixed equation terms with analytically known geometry.
///
/// Holonomic constraint: f_c = 1.8 cos(q1) sin(q2) + 0.4 sin(q3) - target,
/// so pitch is the best-conditioned dependent coordinate near upright poses.
/// Constraint Jacobian: [2I | I | fill] — the selector should prefer speeds
/// {0, 1, 2} and their dependent block is trivially invertible.
#[derive(Debug)]
struct PipelineEvaluator {
    dims: Dimensions,
    target: f64,
    b: DMat,
    mass: DMat,
    gaf: DMat,
    gif_zero: DVec,
}

impl PipelineEvaluator {
    fn new() -> Self {
        let dims = Dimensions::bicycle();

        let mut b = DMat::zeros(dims.m, dims.o);
        for r in 0..dims.m {
            b[(r, r)] = 2.0;
            b[(r, r + 3)] = 1.0;
        }
        for r in 0..dims.m {
            for c in 6..dims.o {
                b[(r, c)] = 0.2 * (((r * 3 + c) % 4) as f64) - 0.1;
            }
        }

        let mass = DMat::from_fn(dims.o, dims.o, |r, c| {
            if r == c {
                1.5 + r as f64
            } else {
                0.05
            }
        });

        let mut gaf = DMat::from_fn(dims.o, dims.s, |r, c| {
            0.1 * ((((r * 5 + c * 2) % 9) as f64) - 4.0) / 4.0
        });
        for (k, &ch) in CONSTRAINT_FORCE_CHANNELS.iter().enumerate() {
            for r in 0..dims.o {
                gaf[(r, ch)] = if r == k {
                    1.0
                } else {
                    0.04 * ((2 * r + k) as f64).cos()
                };
            }
        }

        Self {
            dims,
            target: 0.6,
            b,
            mass,
            gaf,
            gif_zero: DVec::zeros(dims.o),
        }
    }
}

impl Evaluator for PipelineEvaluator {
    fn dims(&self) -> Dimensions {
        self.dims
    }

    fn holonomic(&self, state: &State) -> f64 {
        1.8 * state.q[1].cos() * state.q[2].sin() + 0.4 * state.q[3].sin() - self.target
    }

    fn holonomic_jacobian(&self, state: &State) -> DVec {
        let mut df = DVec::zeros(self.dims.n);
        df[1] = -1.8 * state.q[1].sin() * state.q[2].sin();
        df[2] = 1.8 * state.q[1].cos() * state.q[2].cos();
        df[3] = 0.4 * state.q[3].cos();
        df
    }

    fn constraint_jacobian(&self, _state: &State) -> DMat {
        self.b.clone()
    }

    fn constraint_jacobian_gradient(&self, _state: &State) -> DVec {
        DVec::zeros(self.dims.m * self.dims.o * self.dims.n_min)
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

#[test]
fn full_pipeline_keeps_the_state_consistent() {
    let mut bike = Bicycle::new(PipelineEvaluator::new()).unwrap();

    // Selection: pitch for the coordinate, the heavy contact speeds for the
    // dependent set.
    bike.select_dependent_indices().unwrap();
    assert_eq!(bike.state().dependent_coordinate(), 2);
    assert_eq!(
        *bike.state().dependent_speeds(),
        [0, 1, 2].into_iter().collect()
    );

    // Configuration: lean and steer held fixed, pitch adjusted until the
    // front wheel touches down.
    bike.state_mut().q[1] = 0.05;
    bike.state_mut().q[3] = -0.1;
    let report = bike.solve_configuration(1e-12, 50);
    assert!(report.converged(1e-12), "residual = {:.3e}", report.residual);
    let f = bike.evaluator().holonomic(bike.state());
    assert!(f.abs() <= 1e-12, "re-evaluated residual = {f:.3e}");

    // Velocity: assign independent speeds, let the solver fill the rest.
    bike.state_mut().u[3] = 2.5;
    bike.state_mut().u[6] = 0.3;
    bike.state_mut().u[9] = -0.8;
    let residual = bike.solve_velocity_constraints();
    assert!(
        residual.amax() < 1e-10,
        "velocity residual = {:.3e}",
        residual.amax()
    );
    let b = bike.evaluator().constraint_jacobian(bike.state());
    assert!((&b * &bike.state().u).amax() < 1e-10);
}

#[test]
fn assembled_dynamics_are_reproducible_and_constraint_consistent() {
    let mut bike = Bicycle::new(PipelineEvaluator::new()).unwrap();
    bike.select_dependent_indices().unwrap();
    bike.state_mut().u[3] = 1.0;
    bike.state_mut().u[7] = -0.4;
    bike.solve_velocity_constraints();

    let dims = *bike.state().dims();
    let mut inputs = DVec::zeros(dims.s);
    inputs[0] = 0.5;
    inputs[21] = 9.81;

    let first = bike.assemble_dynamics(&inputs);
    let second = bike.assemble_dynamics(&inputs);
    assert_eq!(first, second);

    assert_eq!(first.coordinate_rates.len(), dims.n);
    assert_eq!(first.matrix.shape(), (dims.o, dims.o));

    // The constraint Jacobian is constant here, so the constraint rows of
    // the solved system require B·u̇ = 0.
    let udot = first
        .matrix
        .clone()
        .lu()
        .solve(&first.forcing)
        .expect("assembled system solvable");
    let b = bike.evaluator().constraint_jacobian(bike.state());
    assert!(
        (&b * &udot).amax() < 1e-9,
        "B·u̇ = {:.3e}",
        (&b * &udot).amax()
    );
}

#[test]
fn steady_forces_recover_a_self_consistent_equilibrium() {
    let mut eval = PipelineEvaluator::new();
    let dims = eval.dims;

    let mut inputs = DVec::zeros(dims.s);
    inputs[0] = 1.1;
    inputs[10] = -0.2;
    inputs[21] = 9.81;

    let expected = DVec::from_vec(vec![0.8, -1.2, 42.0, 0.3, 2.1, 38.5, -0.15]);
    let mut r_full = inputs.clone();
    for (k, &ch) in CONSTRAINT_FORCE_CHANNELS.iter().enumerate() {
        r_full[ch] = expected[k];
    }
    eval.gif_zero = -(&eval.gaf * &r_full);

    let mut bike = Bicycle::new(eval).unwrap();
    bike.select_dependent_indices().unwrap();

    let forces = bike.steady_constraint_forces(&inputs);
    assert_eq!(forces.len(), 7);
    for k in 0..7 {
        assert_relative_eq!(forces[k], expected[k], epsilon = 1e-8);
    }
}

#[test]
fn reference_pitch_matches_the_closed_form() {
    let eval = PipelineEvaluator::new();
    let pitch = reference_pitch(&eval, 1e-12, 50).unwrap();
    // At the upright scratch state: 1.8 sin(pitch) = target.
    assert_relative_eq!(pitch, (0.6_f64 / 1.8).asin(), epsilon = 1e-10);
}

#[test]
fn shape_lies_fail_at_construction() {
    #[derive(Debug)]
    struct WrongJacobian(PipelineEvaluator);

    impl Evaluator for WrongJacobian {
        fn dims(&self) -> Dimensions {
            self.0.dims()
        }
        fn holonomic(&self, state: &State) -> f64 {
            self.0.holonomic(state)
        }
        fn holonomic_jacobian(&self, state: &State) -> DVec {
            self.0.holonomic_jacobian(state)
        }
        fn constraint_jacobian(&self, _state: &State) -> DMat {
            DMat::zeros(2, 5)
        }
        fn constraint_jacobian_gradient(&self, state: &State) -> DVec {
            self.0.constraint_jacobian_gradient(state)
        }
        fn mass_matrix(&self, state: &State) -> DMat {
            self.0.mass_matrix(state)
        }
        fn inertia_forces_zero_accel(&self, state: &State) -> DVec {
            self.0.inertia_forces_zero_accel(state)
        }
        fn force_coefficients(&self, state: &State) -> DMat {
            self.0.force_coefficients(state)
        }
        fn kinematic_rhs(&self, state: &State) -> DVec {
            self.0.kinematic_rhs(state)
        }
    }

    let err = Bicycle::new(WrongJacobian(PipelineEvaluator::new())).unwrap_err();
    assert!(matches!(err, ModelError::DimensionMismatch(_)), "{err}");
}

#[test]
fn invalid_dimensions_fail_at_construction() {
    #[derive(Debug)]
    struct BadDims(PipelineEvaluator);

    impl Evaluator for BadDims {
        fn dims(&self) -> Dimensions {
            let mut d = self.0.dims();
            d.m = 0;
            d
        }
        fn holonomic(&self, state: &State) -> f64 {
            self.0.holonomic(state)
        }
        fn holonomic_jacobian(&self, state: &State) -> DVec {
            self.0.holonomic_jacobian(state)
        }
        fn constraint_jacobian(&self, state: &State) -> DMat {
            self.0.constraint_jacobian(state)
        }
        fn constraint_jacobian_gradient(&self, state: &State) -> DVec {
            self.0.constraint_jacobian_gradient(state)
        }
        fn mass_matrix(&self, state: &State) -> DMat {
            self.0.mass_matrix(state)
        }
        fn inertia_forces_zero_accel(&self, state: &State) -> DVec {
            self.0.inertia_forces_zero_accel(state)
        }
        fn force_coefficients(&self, state: &State) -> DMat {
            self.0.force_coefficients(state)
        }
        fn kinematic_rhs(&self, state: &State) -> DVec {
            self.0.kinematic_rhs(state)
        }
    }

    let err = Bicycle::new(BadDims(PipelineEvaluator::new())).unwrap_err();
    assert!(matches!(err, ModelError::InvalidDimensions(_)), "{err}");
}
