//! Sphere primitive with the closed-form ray intersection and reflection.

use grscatter_math::{Point3, Vec3};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius, non-negative.
    pub radius: f64,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Distance from `point` to the center of the sphere.
    #[inline]
    pub fn center_distance(&self, point: &Point3) -> f64 {
        (self.center - point).norm()
    }

    /// Distance along `direction` from `origin` to the surface, if the ray
    /// meets it.
    ///
    /// `center_distance` is `|center - origin|`, already known to the caller
    /// from candidate ordering. With `projection = direction · (center -
    /// origin)`, the line meets the sphere when
    /// `radius² + projection² - center_distance² >= 0`. A sphere whose center
    /// projects behind the origin is rejected unless `behind_allowed`.
    ///
    /// From outside the sphere the near root is returned; from inside
    /// (`radius > center_distance`) the far root, i.e. the exit point.
    #[inline]
    pub fn hit_distance(
        &self,
        origin: &Point3,
        direction: &Vec3,
        center_distance: f64,
        behind_allowed: bool,
    ) -> Option<f64> {
        let projection = direction.dot(&(self.center - origin));
        let disc = self.radius * self.radius + projection * projection
            - center_distance * center_distance;

        if disc < 0.0 || (projection < 0.0 && !behind_allowed) {
            return None;
        }

        let mut root = -disc.sqrt();
        if self.radius > center_distance {
            root = -root;
        }
        Some(projection + root)
    }

    /// Specular reflection of `direction` at `point` on the surface.
    ///
    /// The outward normal `point - center` has length `radius` on the
    /// surface, so dividing by the radius yields the unit normal.
    #[inline]
    pub fn reflect(&self, point: &Point3, direction: &Vec3) -> Vec3 {
        let normal = (point - self.center) / self.radius;
        direction - normal * (2.0 * normal.dot(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sphere() -> Sphere {
        Sphere::new(Point3::origin(), 1.0)
    }

    #[test]
    fn test_hit_through_center() {
        let sphere = Sphere::new(Point3::origin(), 5.0);
        let origin = Point3::new(-10.0, 0.0, 0.0);
        let t = sphere
            .hit_distance(&origin, &Vec3::x(), sphere.center_distance(&origin), false)
            .unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_miss() {
        let sphere = Sphere::new(Point3::origin(), 5.0);
        let origin = Point3::new(-10.0, 10.0, 0.0);
        let dist = sphere.center_distance(&origin);
        assert!(sphere.hit_distance(&origin, &Vec3::x(), dist, false).is_none());
    }

    #[test]
    fn test_behind_rejected_unless_allowed() {
        let sphere = unit_sphere();
        let origin = Point3::new(-3.0, 0.0, 0.0);
        let away = -Vec3::x();
        let dist = sphere.center_distance(&origin);
        assert!(sphere.hit_distance(&origin, &away, dist, false).is_none());
        // The line still meets the sphere; allowing "behind" yields a negative distance.
        let t = sphere.hit_distance(&origin, &away, dist, true).unwrap();
        assert_relative_eq!(t, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_inside_takes_exit_root() {
        let sphere = Sphere::new(Point3::origin(), 6.0);
        let origin = Point3::new(1.0, 0.0, 0.0);
        let dist = sphere.center_distance(&origin);
        assert!(dist < sphere.radius);

        // Center behind the origin.
        let forward = sphere.hit_distance(&origin, &Vec3::x(), dist, true).unwrap();
        assert_relative_eq!(forward, 5.0, epsilon = 1e-12);

        // Heading through the center: the far side.
        let backward = sphere.hit_distance(&origin, &-Vec3::x(), dist, true).unwrap();
        assert_relative_eq!(backward, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_grazing_ray() {
        let sphere = unit_sphere();
        let origin = Point3::new(-3.0, 0.999, 0.0);
        let dist = sphere.center_distance(&origin);
        let t = sphere.hit_distance(&origin, &Vec3::x(), dist, false).unwrap();
        assert!(t < 3.0 && t > 2.9);
        let hit = origin + Vec3::x() * t;
        assert_relative_eq!(sphere.center_distance(&hit), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reflect_head_on() {
        let sphere = unit_sphere();
        let v = sphere.reflect(&Point3::new(-1.0, 0.0, 0.0), &Vec3::x());
        assert_relative_eq!(v, -Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_reflect_preserves_norm_for_any_radius() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.5);
        let normal = Vec3::new(1.0, -2.0, 0.5).normalize();
        let point = sphere.center + normal * sphere.radius;
        let v = Vec3::new(-0.3, 0.9, 0.1).normalize();
        let reflected = sphere.reflect(&point, &v);
        assert_relative_eq!(reflected.norm(), 1.0, epsilon = 1e-12);
        // Tangential component kept, normal component flipped.
        assert_relative_eq!(reflected.dot(&normal), -v.dot(&normal), epsilon = 1e-12);
    }
}
