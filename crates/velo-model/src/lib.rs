//! Model and state types for the velo bicycle dynamics solver.
//!
//! `BicycleParams` is the static description of the machine (two wheel
//! assemblies joined by a steering axis). `State` is the mutable solver
//! state: generalized coordinates and speeds plus the designation of which
//! of them are dependent on the constraints. `Evaluator` is the contract
//! with the externally supplied closed-form model equations.

pub mod dims;
pub mod error;
pub mod evaluator;
pub mod params;
pub mod state;

pub use dims::{Dimensions, ForceChannel, CONSTRAINT_FORCE_CHANNELS, CONTACT_SUBSPACE_DIM};
pub use error::{ModelError, Result};
pub use evaluator::Evaluator;
pub use params::{AssemblyParams, BicycleParams};
pub use state::State;
