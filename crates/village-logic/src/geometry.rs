//! Plain vector math for village plans.
//!
//! The plan speaks in ground-plane positions (y up), Euler rotations and
//! per-part scales. Rotations apply roll (about z), then pitch (about x),
//! then yaw (about y); a yaw of θ turns local +z toward +x, so a part with
//! yaw `atan2(dx, dz)` faces along `(dx, 0, dz)`.

use serde::{Deserialize, Serialize};

/// Directions shorter than this are treated as "no direction".
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// 3D vector (y up)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane.
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Length of the ground-plane projection.
    pub fn planar_length(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    pub fn min_component(&self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Euler rotation in radians.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rotation {
    /// About x.
    pub pitch: f32,
    /// About y.
    pub yaw: f32,
    /// About z.
    pub roll: f32,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub const fn from_yaw(yaw: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw,
            roll: 0.0,
        }
    }

    pub const fn from_roll(roll: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            roll,
        }
    }

    /// Yaw that turns local +z toward `target` as seen from `from`.
    /// Returns identity when the two points coincide on the ground plane.
    pub fn facing(from: Vec3, target: Vec3) -> Self {
        Self::from_yaw(yaw_towards(from, target))
    }

    /// Rotate a vector: roll, then pitch, then yaw.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // roll about z
        let (sr, cr) = self.roll.sin_cos();
        let v = Vec3::new(v.x * cr - v.y * sr, v.x * sr + v.y * cr, v.z);
        // pitch about x
        let (sp, cp) = self.pitch.sin_cos();
        let v = Vec3::new(v.x, v.y * cp - v.z * sp, v.y * sp + v.z * cp);
        // yaw about y
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(v.x * cy + v.z * sy, v.y, -v.x * sy + v.z * cy)
    }

    /// Unit vector of local +z after rotation.
    pub fn forward(&self) -> Vec3 {
        self.rotate(Vec3::new(0.0, 0.0, 1.0))
    }
}

/// Yaw (radians) that points local +z from `from` toward `target`.
pub fn yaw_towards(from: Vec3, target: Vec3) -> f32 {
    let dx = target.x - from.x;
    let dz = target.z - from.z;
    if dx.abs() < DIRECTION_EPSILON && dz.abs() < DIRECTION_EPSILON {
        return 0.0;
    }
    dx.atan2(dz)
}

/// Local placement of a part or group relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Rotation,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Rotation::IDENTITY,
        scale: Vec3::ONE,
    };

    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Map a point in this transform's local space into the parent's space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        let scaled = Vec3::new(
            local.x * self.scale.x,
            local.y * self.scale.y,
            local.z * self.scale.z,
        );
        self.position + self.rotation.rotate(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(&b) < 1e-4
    }

    #[test]
    fn yaw_of_quarter_turn_maps_z_to_x() {
        let r = Rotation::from_yaw(FRAC_PI_2);
        assert!(approx(r.forward(), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn facing_origin_points_forward_at_origin() {
        let from = Vec3::ground(30.0, 0.0);
        let forward = Rotation::facing(from, Vec3::ZERO).forward();
        assert!(approx(forward, Vec3::new(-1.0, 0.0, 0.0)), "{forward:?}");

        let from = Vec3::ground(-3.0, -4.0);
        let forward = Rotation::facing(from, Vec3::ZERO).forward();
        assert!(approx(forward, Vec3::new(0.6, 0.0, 0.8)), "{forward:?}");
    }

    #[test]
    fn facing_self_is_identity() {
        assert_eq!(Rotation::facing(Vec3::ZERO, Vec3::ZERO), Rotation::IDENTITY);
    }

    #[test]
    fn roll_tilts_x_axis_upward() {
        let r = Rotation::from_roll(PI / 2.0);
        assert!(approx(r.rotate(Vec3::new(1.0, 0.0, 0.0)), Vec3::UP));
    }

    #[test]
    fn transform_point_scales_then_rotates_then_translates() {
        let t = Transform::at(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Rotation::from_yaw(PI))
            .with_scale(Vec3::splat(2.0));
        let p = t.transform_point(Vec3::new(0.0, 1.0, 1.0));
        assert!(approx(p, Vec3::new(10.0, 2.0, -2.0)), "{p:?}");
    }

    #[test]
    fn planar_length_ignores_height() {
        assert!((Vec3::new(3.0, 100.0, 4.0).planar_length() - 5.0).abs() < f32::EPSILON);
    }
}
