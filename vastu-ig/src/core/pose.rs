//! 6-DoF pose helpers.
//!
//! Poses are `nalgebra::Isometry3<f64>` mapping sensor-frame points into the
//! world frame. The sensor optical frame looks along +Z with +X to the right
//! and +Y down.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// World-from-sensor rigid transform.
pub type Pose = Isometry3<f64>;

/// Build a pose from a position and roll/pitch/yaw angles (radians).
pub fn pose_from_xyz_rpy(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Pose {
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// Build a pose at `eye` whose optical axis (+Z) points at `target`.
///
/// `up` is the world direction that should appear as "up" in the image
/// (the optical frame's -Y). Falls back to the identity rotation when
/// `eye` and `target` coincide.
pub fn look_at(eye: &Point3<f64>, target: &Point3<f64>, up: &Vector3<f64>) -> Pose {
    let forward = target - eye;
    if forward.norm() < f64::EPSILON {
        return Isometry3::from_parts(Translation3::from(eye.coords), UnitQuaternion::identity());
    }
    let z = forward.normalize();
    let mut x = (-up).cross(&z);
    if x.norm() < 1e-9 {
        // Looking along the up axis
        x = Vector3::x().cross(&z);
        if x.norm() < 1e-9 {
            x = Vector3::y().cross(&z);
        }
    }
    let x = x.normalize();
    let y = z.cross(&x);
    let rotation = nalgebra::Rotation3::from_basis_unchecked(&[x, y, z]);
    Isometry3::from_parts(
        Translation3::from(eye.coords),
        UnitQuaternion::from_rotation_matrix(&rotation),
    )
}

/// Euclidean distance between two pose positions.
#[inline]
pub fn translation_distance(a: &Pose, b: &Pose) -> f64 {
    (a.translation.vector - b.translation.vector).norm()
}

/// Rotation angle (radians, in [0, π]) between two pose orientations.
#[inline]
pub fn rotation_distance(a: &Pose, b: &Pose) -> f64 {
    a.rotation.angle_to(&b.rotation)
}
