//! Collaborator traits
//!
//! The control core owns angular velocity and nothing else. The vehicle body,
//! the higher-level game mode and calibration persistence are reached through
//! these narrow seams so that no component has to import another's internals.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// Vehicle body the controller steers
///
/// The core reads position and shape to locate the nose, and writes
/// orientation once per tick.
pub trait VehicleBody {
    /// Current body-to-world orientation
    fn orientation(&self) -> UnitQuaternion<f32>;

    /// Replace the orientation (integration result or explicit reset)
    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>);

    /// World-space position of the body origin
    fn position(&self) -> Point3<f32>;

    /// Half-extent of the body along its forward axis
    fn half_length(&self) -> f32;

    /// Forward axis in body coordinates
    fn forward_local(&self) -> Unit<Vector3<f32>> {
        Vector3::z_axis()
    }

    /// Nose point in body coordinates
    fn nose_local(&self) -> Vector3<f32> {
        self.forward_local().into_inner() * self.half_length()
    }

    /// Nose point in world coordinates
    fn nose_world(&self) -> Point3<f32> {
        self.position() + self.orientation() * self.nose_local()
    }
}

/// Per-tick callback into the game-mode layer
///
/// Injected at construction so the mode layer can observe the rotational state
/// (boosts, collisions, scoring) without the core importing it.
pub trait ModePhysicsHook {
    /// Called once per advanced tick, after integration
    fn on_tick(&mut self, dt: f32, angular_velocity: &Vector3<f32>);
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHook;

impl ModePhysicsHook for NoHook {
    fn on_tick(&mut self, _dt: f32, _angular_velocity: &Vector3<f32>) {}
}

impl<F> ModePhysicsHook for F
where
    F: FnMut(f32, &Vector3<f32>),
{
    fn on_tick(&mut self, dt: f32, angular_velocity: &Vector3<f32>) {
        self(dt, angular_velocity)
    }
}

/// Values that can be checked for numeric sanity
pub trait Validatable {
    /// True when every component is finite
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for Vector3<f32> {
    fn is_valid(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_hooks() {
        let mut calls = 0;
        {
            let mut hook = |_dt: f32, _w: &Vector3<f32>| calls += 1;
            hook.on_tick(0.016, &Vector3::zeros());
            hook.on_tick(0.016, &Vector3::zeros());
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn validatable_values() {
        assert!(5.0f32.is_valid());
        assert!(!f32::NAN.is_valid());
        assert!(Vector3::new(1.0f32, 2.0, 3.0).is_valid());
        assert!(!Vector3::new(1.0f32, f32::INFINITY, 3.0).is_valid());
    }
}
