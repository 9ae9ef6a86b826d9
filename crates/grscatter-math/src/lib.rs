#![warn(missing_docs)]

//! Math types for the Gaspard-Rice scattering kernel.
//!
//! Thin wrappers around nalgebra providing the handful of types the
//! billiard needs: points, vectors, rigid transforms of the
//! canonical sphere layouts, tolerance constants and spherical angles.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Uniform scale by `factor` about the origin.
    pub fn uniform_scale(factor: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = factor;
        m[(1, 1)] = factor;
        m[(2, 2)] = factor;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f64,
    /// Relative tolerance for magnitudes (e.g. direction norms).
    pub relative: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 linear, 1e-9 relative).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        relative: 1e-9,
    };

    /// Check if `v` has unit length up to the relative tolerance.
    pub fn is_unit(&self, v: &Vec3) -> bool {
        (v.norm() - 1.0).abs() < self.relative
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Spherical angles of a direction, physics convention.
///
/// `phi` is the azimuth in the XY plane, in `(-π, π]`; `theta` is the polar
/// angle measured from +Z, in `[0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalAngles {
    /// Azimuth `atan2(y, x)`.
    pub phi: f64,
    /// Polar angle `acos(z)`.
    pub theta: f64,
}

impl SphericalAngles {
    /// Angles of a (nominally unit) direction vector.
    ///
    /// The polar argument is clamped to `[-1, 1]` so float drift in the
    /// direction norm never yields NaN.
    pub fn from_direction(v: &Vec3) -> Self {
        Self {
            phi: v.y.atan2(v.x),
            theta: v.z.clamp(-1.0, 1.0).acos(),
        }
    }

    /// Angles of a point lying on (or inside) a sphere of `radius` centered
    /// at the origin.
    pub fn from_point(p: &Point3, radius: f64) -> Self {
        Self {
            phi: p.y.atan2(p.x),
            theta: (p.z / radius).clamp(-1.0, 1.0).acos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_uniform_scale() {
        let t = Transform::uniform_scale(2.0);
        let p = Point3::new(1.0, -1.0, 0.5);
        let result = t.apply_point(&p);
        assert!((result.x - 2.0).abs() < 1e-12);
        assert!((result.y + 2.0).abs() < 1e-12);
        assert!((result.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // +Z rotated by 90° about Y lands on +X
        let t = Transform::rotation_y(FRAC_PI_2);
        let result = t.apply_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((result.x - 1.0).abs() < 1e-12);
        assert!(result.y.abs() < 1e-12);
        assert!(result.z.abs() < 1e-12);
    }

    #[test]
    fn test_compose_order() {
        // rotate first, then scale
        let t = Transform::uniform_scale(3.0).then(&Transform::rotation_y(-FRAC_PI_4));
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!((result.coords.norm() - 3.0).abs() < 1e-12);
        assert!((result.x - 3.0 * FRAC_PI_4.cos()).abs() < 1e-12);
        assert!((result.z - 3.0 * FRAC_PI_4.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_is_unit() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.is_unit(&Vec3::new(0.6, 0.8, 0.0)));
        assert!(!tol.is_unit(&Vec3::new(0.6, 0.8, 0.1)));
        assert!(tol.is_unit(&Vec3::new(0.0, 0.0, 1.0 + 1e-12)));
    }

    #[test]
    fn test_spherical_angles_of_axes() {
        let x = SphericalAngles::from_direction(&Vec3::x());
        assert!(x.phi.abs() < 1e-12);
        assert!((x.theta - FRAC_PI_2).abs() < 1e-12);

        let minus_x = SphericalAngles::from_direction(&Vec3::new(-1.0, 0.0, 0.0));
        assert!((minus_x.phi - PI).abs() < 1e-12);

        let up = SphericalAngles::from_direction(&Vec3::z());
        assert!(up.theta.abs() < 1e-12);
    }

    #[test]
    fn test_spherical_angles_clamp_drift() {
        let a = SphericalAngles::from_direction(&Vec3::new(0.0, 0.0, 1.0 + 1e-12));
        assert!(a.theta.is_finite());
        let b = SphericalAngles::from_point(&Point3::new(0.0, 0.0, -6.0 - 1e-12), 6.0);
        assert!((b.theta - PI).abs() < 1e-12);
    }
}
