//! Ray state threaded through the stepping algorithm.

use grscatter_math::{Point3, SphericalAngles, Vec3};

/// A trajectory record: current position, direction of travel and the
/// number of reflections experienced so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Current position.
    pub position: Point3,
    /// Direction of travel, expected to be unit length.
    pub direction: Vec3,
    /// Number of reflections off scatterers.
    pub reflections: u32,
}

impl Ray {
    /// Create a new ray with zero reflections.
    ///
    /// The direction is used as given; callers are expected to pass a unit
    /// vector.
    pub fn new(position: Point3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
            reflections: 0,
        }
    }

    /// Evaluate the ray's line at parameter `t`: `position + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.position + t * self.direction
    }

    /// Rescale the direction back to unit length.
    pub fn renormalize_direction(&mut self) {
        self.direction.normalize_mut();
    }

    /// Spherical angles of the direction of travel.
    pub fn exit_angles(&self) -> SphericalAngles {
        SphericalAngles::from_direction(&self.direction)
    }

    /// Whether every component of position and direction is finite.
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.direction.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_new_ray_has_no_reflections() {
        let ray = Ray::new(Point3::new(-3.0, 0.2, 0.1), Vec3::x());
        assert_eq!(ray.reflections, 0);
        assert!(ray.is_finite());
    }

    #[test]
    fn test_renormalize_direction() {
        let mut ray = Ray::new(Point3::origin(), Vec3::new(3.0, 4.0, 0.0));
        ray.renormalize_direction();
        assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
        assert!((ray.direction.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_exit_angles() {
        let ray = Ray::new(Point3::origin(), Vec3::y());
        let angles = ray.exit_angles();
        assert!((angles.phi - FRAC_PI_2).abs() < 1e-12);
        assert!((angles.theta - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_detected() {
        let ray = Ray::new(Point3::new(f64::NAN, 0.0, 0.0), Vec3::x());
        assert!(!ray.is_finite());
    }
}
