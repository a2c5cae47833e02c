//! Per-axis velocity locks
//!
//! A locked axis has its angular velocity forced to exactly zero after every
//! integration step, whatever the controller commanded. Toggles have no
//! transition restrictions.

use nalgebra::Vector3;

/// Rotation axis in body coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Body X
    Pitch,
    /// Body Y
    Yaw,
    /// Body Z
    Roll,
}

impl Axis {
    /// All axes in vector order
    pub const ALL: [Axis; 3] = [Axis::Pitch, Axis::Yaw, Axis::Roll];

    /// Component index in a `(pitch, yaw, roll)` vector
    pub const fn index(self) -> usize {
        match self {
            Self::Pitch => 0,
            Self::Yaw => 1,
            Self::Roll => 2,
        }
    }
}

/// Lock flags for the three axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisLocks {
    /// Pitch locked
    pub pitch: bool,
    /// Yaw locked
    pub yaw: bool,
    /// Roll locked
    pub roll: bool,
}

impl AxisLocks {
    /// Lock state of one axis
    pub fn is_locked(&self, axis: Axis) -> bool {
        match axis {
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
            Axis::Roll => self.roll,
        }
    }

    /// Flip one axis and return its new state
    pub fn toggle(&mut self, axis: Axis) -> bool {
        let flag = match axis {
            Axis::Pitch => &mut self.pitch,
            Axis::Yaw => &mut self.yaw,
            Axis::Roll => &mut self.roll,
        };
        *flag = !*flag;
        log_debug!("{:?} lock {}", axis, if *flag { "engaged" } else { "released" });
        *flag
    }

    /// True when any axis is locked
    pub fn any(&self) -> bool {
        self.pitch || self.yaw || self.roll
    }

    /// Zero the locked components
    pub fn apply(&self, w: &mut Vector3<f32>) {
        for axis in Axis::ALL {
            if self.is_locked(axis) {
                w[axis.index()] = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_returns_new_state() {
        let mut locks = AxisLocks::default();
        assert!(locks.toggle(Axis::Yaw));
        assert!(locks.yaw);
        assert!(!locks.toggle(Axis::Yaw));
        assert!(!locks.any());
    }

    #[test]
    fn apply_zeroes_locked_axes() {
        let locks = AxisLocks { pitch: true, yaw: false, roll: true };
        let mut w = Vector3::new(1.0, 2.0, 3.0);
        locks.apply(&mut w);
        assert_eq!(w, Vector3::new(0.0, 2.0, 0.0));
    }
}
