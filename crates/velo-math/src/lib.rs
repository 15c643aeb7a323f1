//! Math primitives for the velo bicycle dynamics solver.
//!
//! Thin f64 aliases over nalgebra plus the dependent-last speed permutation
//! used by every constraint solve.

pub mod permutation;

pub use permutation::SpeedPermutation;

use nalgebra as na;

/// Dynamic vector.
pub type DVec = na::DVector<f64>;
/// Dynamic matrix.
pub type DMat = na::DMatrix<f64>;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;
