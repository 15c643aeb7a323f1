//! Static bicycle parameters.
//!
//! Parameters are immutable for the lifetime of a model instance; changing
//! them means building a new instance. The evaluator implementation consumes
//! these when computing the closed-form equation terms; the solver layer
//! never reads them directly.

use velo_math::GRAVITY;

/// Inertial and geometric parameters of one wheel assembly (wheel plus the
/// frame or fork rigidly attached to it), expressed in the assembly frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyParams {
    /// Moments of inertia about the assembly x/y/z axes (kg·m²).
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    /// Product of inertia in the assembly symmetry plane (kg·m²).
    pub ixz: f64,
    /// Wheel spin inertia (kg·m²).
    pub spin_inertia: f64,
    /// Assembly mass (kg).
    pub mass: f64,
    /// Wheel major radius (m).
    pub wheel_radius: f64,
    /// Tire casing (torus minor) radius (m).
    pub tire_radius: f64,
    /// Mass center offset from the wheel center, along and normal to the
    /// steer axis (m).
    pub cm_along: f64,
    pub cm_normal: f64,
}

/// Complete parameter set for a bicycle model instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BicycleParams {
    /// Rear wheel assembly (wheel + frame + rider).
    pub rear: AssemblyParams,
    /// Front wheel assembly (wheel + fork + handlebar).
    pub front: AssemblyParams,
    /// Offset between the wheel centers measured along the steer axis (m).
    pub steer_axis_offset: f64,
    /// Gravitational field strength (m/s²).
    pub gravity: f64,
}

impl Default for BicycleParams {
    /// A rigid-rider benchmark configuration; useful as a starting point for
    /// evaluator implementations and tests.
    fn default() -> Self {
        let wheel = AssemblyParams {
            ixx: 0.0603,
            iyy: 0.12,
            izz: 0.0603,
            ixz: 0.0,
            spin_inertia: 0.12,
            mass: 2.0,
            wheel_radius: 0.35,
            tire_radius: 0.0,
            cm_along: 0.0,
            cm_normal: 0.0,
        };
        Self {
            rear: wheel,
            front: wheel,
            steer_axis_offset: 0.2,
            gravity: GRAVITY,
        }
    }
}
