//! Minimal vehicle body
//!
//! A rigid body reduced to what the rotational core needs: a pose and the
//! distance from its origin to the nose. There is no mass, inertia tensor or
//! collision shape; only the control law moves it.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::{constants::DEFAULT_HALF_LENGTH, traits::VehicleBody};

/// Vehicle pose plus nose geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidBody {
    /// World-space origin
    pub position: Point3<f32>,
    /// Body-to-world rotation
    pub orientation: UnitQuaternion<f32>,
    /// Distance from origin to nose along `forward`
    pub half_length: f32,
    /// Forward axis in body coordinates
    pub forward: Unit<Vector3<f32>>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            half_length: DEFAULT_HALF_LENGTH,
            forward: Vector3::z_axis(),
        }
    }
}

impl RigidBody {
    /// Body at `position`, level, with the given nose distance
    pub fn new(position: Point3<f32>, half_length: f32) -> Self {
        Self {
            position,
            half_length,
            ..Self::default()
        }
    }

    /// Override the forward axis
    pub fn with_forward(mut self, forward: Unit<Vector3<f32>>) -> Self {
        self.forward = forward;
        self
    }

    /// Override the starting orientation
    pub fn with_orientation(mut self, orientation: UnitQuaternion<f32>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Snap back to identity orientation
    pub fn reset_orientation(&mut self) {
        self.orientation = UnitQuaternion::identity();
    }
}

impl VehicleBody for RigidBody {
    fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.orientation = orientation;
    }

    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn half_length(&self) -> f32 {
        self.half_length
    }

    fn forward_local(&self) -> Unit<Vector3<f32>> {
        self.forward
    }
}
