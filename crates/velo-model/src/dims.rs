//! Model dimensions and the generalized force channel map.

use crate::error::{ModelError, Result};

/// Number of generalized speeds spanning the ground-contact motion subspace.
///
/// The dependent-speed selector draws its candidates from the first
/// `CONTACT_SUBSPACE_DIM` speeds.
pub const CONTACT_SUBSPACE_DIM: usize = 6;

/// Input channels of the generalized active force coefficient matrix that
/// correspond to unknown constraint forces, in output order:
/// rear longitudinal, rear lateral, rear normal, front longitudinal,
/// front lateral, front normal, steer torque.
pub const CONSTRAINT_FORCE_CHANNELS: [usize; 7] = [4, 5, 6, 14, 15, 16, 20];

/// Input channel carrying the gravitational field strength.
pub const GRAVITY_CHANNEL: usize = 21;

/// Physically meaningful constraint force/torque quantities recovered by the
/// force reconstructor, in the order they appear in its output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceChannel {
    RearLongitudinal,
    RearLateral,
    RearNormal,
    FrontLongitudinal,
    FrontLateral,
    FrontNormal,
    SteerTorque,
}

impl ForceChannel {
    /// Position of this quantity in the reconstructor's 7-element output.
    pub fn output_index(self) -> usize {
        self as usize
    }

    /// Column of the full generalized force coefficient matrix this
    /// quantity multiplies.
    pub fn input_channel(self) -> usize {
        CONSTRAINT_FORCE_CHANNELS[self as usize]
    }
}

/// Fixed dimensions of a model topology.
///
/// These must agree between the evaluator and the solver layer; agreement is
/// checked once at construction rather than per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Generalized coordinate count.
    pub n: usize,
    /// Generalized speed count.
    pub o: usize,
    /// Velocity (nonholonomic) constraint count.
    pub m: usize,
    /// Generalized active force input channel count.
    pub s: usize,
    /// Third-axis extent of the constraint Jacobian gradient tensor
    /// (lean/pitch/steer sensitivity).
    pub n_min: usize,
}

impl Dimensions {
    /// Canonical dimensions of the bicycle model: 8 coordinates, 12 speeds,
    /// 3 rolling constraints, 22 force channels.
    pub fn bicycle() -> Self {
        Self {
            n: 8,
            o: 12,
            m: 3,
            s: 22,
            n_min: 3,
        }
    }

    /// Check internal consistency. Called by `State::new`; a violation here
    /// means the evaluator and solver layer cannot agree on array shapes, so
    /// it is a hard failure rather than a reported residual.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 || self.o == 0 || self.m == 0 {
            return Err(ModelError::InvalidDimensions(format!(
                "n={}, o={}, m={} must all be nonzero",
                self.n, self.o, self.m
            )));
        }
        if self.m >= self.o {
            return Err(ModelError::InvalidDimensions(format!(
                "constraint count m={} must be below speed count o={}",
                self.m, self.o
            )));
        }
        if self.o < CONTACT_SUBSPACE_DIM {
            return Err(ModelError::InvalidDimensions(format!(
                "speed count o={} cannot hold the {}-dimensional contact subspace",
                self.o, CONTACT_SUBSPACE_DIM
            )));
        }
        if self.m > CONTACT_SUBSPACE_DIM {
            return Err(ModelError::InvalidDimensions(format!(
                "constraint count m={} exceeds the {} contact-subspace candidates",
                self.m, CONTACT_SUBSPACE_DIM
            )));
        }
        if self.n_min != 3 {
            return Err(ModelError::InvalidDimensions(format!(
                "gradient tensor axis n_min={} must be 3 (lean, pitch, steer)",
                self.n_min
            )));
        }
        let max_channel = *CONSTRAINT_FORCE_CHANNELS.iter().max().unwrap_or(&0);
        if self.s <= GRAVITY_CHANNEL || self.s <= max_channel {
            return Err(ModelError::InvalidDimensions(format!(
                "input channel count s={} does not cover the force channel map",
                self.s
            )));
        }
        Ok(())
    }
}
