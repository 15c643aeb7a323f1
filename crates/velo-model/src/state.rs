//! Mutable solver state.

use std::collections::BTreeSet;

use velo_math::{DVec, SpeedPermutation};

use crate::dims::Dimensions;
use crate::error::{ModelError, Result};

/// Default dependent coordinate: frame pitch.
pub const PITCH: usize = 2;

/// Generalized coordinates and speeds plus the designation of which of them
/// the constraints determine.
///
/// The state owns `q` and `u` exclusively; solvers borrow it mutably per
/// call and retain nothing. The only invariant is that the constraint
/// residuals are near zero *after* the respective solvers run — nothing is
/// enforced automatically on assignment.
#[derive(Debug, Clone)]
pub struct State {
    /// Generalized coordinates (heading, lean, pitch, steer, wheel angles,
    /// contact offsets). Length `n`.
    pub q: DVec,
    /// Generalized speeds. Length `o`.
    pub u: DVec,
    dims: Dimensions,
    dependent_coordinate: usize,
    dependent_speeds: BTreeSet<usize>,
    perm: SpeedPermutation,
}

impl State {
    /// Zero-initialized state for the given dimensions.
    ///
    /// Defaults: pitch is the dependent coordinate and the trailing half of
    /// the contact subspace holds the dependent speeds; both are expected to
    /// be replaced by the selector before solving near difficult
    /// configurations.
    pub fn new(dims: &Dimensions) -> Result<Self> {
        dims.validate()?;
        let dependent_speeds: BTreeSet<usize> =
            (crate::dims::CONTACT_SUBSPACE_DIM - dims.m..crate::dims::CONTACT_SUBSPACE_DIM)
                .collect();
        let perm = SpeedPermutation::dependent_last(dims.o, &dependent_speeds);
        Ok(Self {
            q: DVec::zeros(dims.n),
            u: DVec::zeros(dims.o),
            dims: *dims,
            dependent_coordinate: PITCH,
            dependent_speeds,
            perm,
        })
    }

    /// Model dimensions this state was built for.
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// Coordinate currently solved for by the configuration constraint.
    pub fn dependent_coordinate(&self) -> usize {
        self.dependent_coordinate
    }

    /// Designate the coordinate the configuration solver adjusts.
    pub fn set_dependent_coordinate(&mut self, index: usize) -> Result<()> {
        if index >= self.dims.n {
            return Err(ModelError::InvalidDependentIndex(format!(
                "coordinate {index} out of range for n={}",
                self.dims.n
            )));
        }
        self.dependent_coordinate = index;
        Ok(())
    }

    /// Speeds currently determined by the velocity constraints, ascending.
    pub fn dependent_speeds(&self) -> &BTreeSet<usize> {
        &self.dependent_speeds
    }

    /// Designate the dependent speed set and rebuild the dependent-last
    /// permutation. The set must hold exactly `m` distinct in-range indices.
    pub fn set_dependent_speeds(&mut self, speeds: BTreeSet<usize>) -> Result<()> {
        if speeds.len() != self.dims.m {
            return Err(ModelError::InvalidDependentIndex(format!(
                "expected {} dependent speeds, got {}",
                self.dims.m,
                speeds.len()
            )));
        }
        if let Some(&bad) = speeds.iter().find(|&&i| i >= self.dims.o) {
            return Err(ModelError::InvalidDependentIndex(format!(
                "speed {bad} out of range for o={}",
                self.dims.o
            )));
        }
        self.perm = SpeedPermutation::dependent_last(self.dims.o, &speeds);
        self.dependent_speeds = speeds;
        Ok(())
    }

    /// Whether speed `i` is constraint-determined.
    pub fn is_dependent_speed(&self, i: usize) -> bool {
        self.dependent_speeds.contains(&i)
    }

    /// Dependent-last reordering of the speeds.
    pub fn permutation(&self) -> &SpeedPermutation {
        &self.perm
    }

    /// The independent speeds, in reordered (leading-block) order.
    pub fn independent_speeds_vec(&self) -> DVec {
        let reordered = self.perm.gather_vec(&self.u);
        reordered.rows(0, self.dims.o - self.dims.m).clone_owned()
    }
}
