//! Gaspard-Rice scene model and the intersection/reflection step.
//!
//! A [`Scene`] is an ordered list of spheres. Index 0 is the escape
//! boundary, a large sphere centered at the origin that contains the whole
//! configuration; every other sphere is a scatterer. Rays start inside the
//! boundary and bounce between scatterers until they reach it.

use grscatter_math::{Point3, Tolerance, Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::FRAC_PI_4;

use crate::error::{Result, ScatterError};
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Index of the escape boundary in [`Scene::spheres`].
pub const ESCAPE_INDEX: usize = 0;

/// Scatterer centers of the planar configuration (equilateral triangle,
/// side 2.5, centroid at the origin).
const PLANAR_CENTERS: [[f64; 3]; 3] = [
    [-0.7216878364870322, 1.25, 0.0],
    [1.4433756729740645, 0.0, 0.0],
    [-0.7216878364870322, -1.25, 0.0],
];

/// Scatterer centers of the spatial configuration (regular tetrahedron,
/// edge 2), before rotation.
const SPATIAL_CENTERS: [[f64; 3]; 4] = [
    [1.0, 0.0, -FRAC_1_SQRT_2],
    [-1.0, 0.0, -FRAC_1_SQRT_2],
    [0.0, 1.0, FRAC_1_SQRT_2],
    [0.0, -1.0, FRAC_1_SQRT_2],
];

/// Canonical scatterer arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    /// Three spheres in the z = 0 plane.
    Planar,
    /// Four spheres at the vertices of a tetrahedron.
    #[default]
    Spatial,
}

/// Candidate sphere for the first-hit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index of the sphere in the scene.
    pub index: usize,
    /// Distance from the ray position to the sphere center.
    pub distance: f64,
}

/// Result of one call to [`Scene::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The ray reflected off the scatterer with this index.
    Reflected {
        /// Scene index of the scatterer.
        sphere: usize,
    },
    /// The ray reached the escape boundary.
    Escaped,
    /// No sphere accepted the ray. Only happens for malformed scenes or
    /// rays outside the boundary.
    NoIntersection,
}

impl StepOutcome {
    /// Whether the trajectory continues after this step.
    pub fn continues(&self) -> bool {
        matches!(self, StepOutcome::Reflected { .. })
    }
}

/// How a trajectory ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The ray reached the escape boundary.
    Escaped,
    /// The step budget ran out first.
    Exhausted,
    /// A step found no intersection.
    NoIntersection,
}

/// Full path of a single ray.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Initial position followed by every impact point.
    pub points: Vec<Point3>,
    /// Final ray state.
    pub ray: Ray,
    /// How the trajectory ended.
    pub termination: Termination,
}

/// Gaspard-Rice model: reflective spheres inside an escape boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a scene holding only the escape boundary of `escape_radius`.
    ///
    /// The radius must be finite and positive.
    pub fn new(escape_radius: f64) -> Result<Self> {
        if !escape_radius.is_finite() || escape_radius <= 0.0 {
            return Err(ScatterError::InvalidSphere(format!(
                "escape radius must be finite and positive, got {escape_radius}"
            )));
        }
        Ok(Self {
            spheres: vec![Sphere::new(Point3::origin(), escape_radius)],
        })
    }

    /// Add a scatterer and return its index.
    ///
    /// The sphere must have a finite, non-negative radius and lie inside the
    /// escape boundary. Overlap with other scatterers is not checked.
    pub fn add_sphere(&mut self, center: Point3, radius: f64) -> Result<usize> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ScatterError::InvalidSphere(format!(
                "radius must be finite and non-negative, got {radius}"
            )));
        }
        if center.coords.iter().any(|c| !c.is_finite()) {
            return Err(ScatterError::InvalidSphere(format!(
                "center must be finite, got {center}"
            )));
        }
        let escape_radius = self.escape_radius();
        let reach = center.coords.norm() + radius;
        if reach > escape_radius + Tolerance::DEFAULT.linear {
            return Err(ScatterError::InvalidSphere(format!(
                "sphere reaches {reach} from the origin, outside the escape radius {escape_radius}"
            )));
        }
        self.spheres.push(Sphere::new(center, radius));
        Ok(self.spheres.len() - 1)
    }

    /// Planar configuration: three scatterers of `radius` at the corners of
    /// an equilateral triangle scaled by `spacing`.
    pub fn gaspard_rice_2d(escape_radius: f64, spacing: f64, radius: f64) -> Result<Self> {
        let mut scene = Self::new(escape_radius)?;
        let scale = Transform::uniform_scale(spacing);
        for [x, y, z] in PLANAR_CENTERS {
            scene.add_sphere(scale.apply_point(&Point3::new(x, y, z)), radius)?;
        }
        Ok(scene)
    }

    /// Spatial configuration: four scatterers of `radius` at the vertices of
    /// a tetrahedron, rotated by -π/4 about Y and scaled by `spacing`.
    pub fn gaspard_rice_3d(escape_radius: f64, spacing: f64, radius: f64) -> Result<Self> {
        let mut scene = Self::new(escape_radius)?;
        let placement =
            Transform::uniform_scale(spacing).then(&Transform::rotation_y(-FRAC_PI_4));
        for [x, y, z] in SPATIAL_CENTERS {
            scene.add_sphere(placement.apply_point(&Point3::new(x, y, z)), radius)?;
        }
        Ok(scene)
    }

    /// Build one of the canonical configurations.
    pub fn from_configuration(
        configuration: Configuration,
        escape_radius: f64,
        spacing: f64,
        radius: f64,
    ) -> Result<Self> {
        match configuration {
            Configuration::Planar => Self::gaspard_rice_2d(escape_radius, spacing, radius),
            Configuration::Spatial => Self::gaspard_rice_3d(escape_radius, spacing, radius),
        }
    }

    /// All spheres, escape boundary first.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The scatterers (every sphere but the boundary).
    pub fn scatterers(&self) -> &[Sphere] {
        &self.spheres[ESCAPE_INDEX + 1..]
    }

    /// Radius of the escape boundary.
    pub fn escape_radius(&self) -> f64 {
        self.spheres[ESCAPE_INDEX].radius
    }

    /// Candidates for the first-hit search from `position`.
    ///
    /// Scatterers come first, nearest center first (stable on ties). The
    /// escape boundary is appended last regardless of its distance.
    pub fn candidates(&self, position: &Point3) -> Vec<Candidate> {
        let mut order: Vec<Candidate> = self
            .spheres
            .iter()
            .enumerate()
            .skip(ESCAPE_INDEX + 1)
            .map(|(index, sphere)| Candidate {
                index,
                distance: sphere.center_distance(position),
            })
            .collect();
        order.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        order.push(Candidate {
            index: ESCAPE_INDEX,
            distance: position.coords.norm(),
        });
        order
    }

    /// Move `ray` to its next impact and reflect it.
    ///
    /// On [`StepOutcome::Reflected`] the position, direction and reflection
    /// count are updated. On [`StepOutcome::Escaped`] only the position
    /// moves (onto the boundary). On [`StepOutcome::NoIntersection`] the ray
    /// is left untouched.
    pub fn step(&self, ray: &mut Ray) -> StepOutcome {
        for candidate in self.candidates(&ray.position) {
            let sphere = &self.spheres[candidate.index];
            let is_boundary = candidate.index == ESCAPE_INDEX;

            let Some(t) =
                sphere.hit_distance(&ray.position, &ray.direction, candidate.distance, is_boundary)
            else {
                continue;
            };

            ray.position = ray.at(t);
            if is_boundary {
                return StepOutcome::Escaped;
            }

            ray.reflections += 1;
            ray.direction = sphere.reflect(&ray.position, &ray.direction);
            return StepOutcome::Reflected {
                sphere: candidate.index,
            };
        }
        StepOutcome::NoIntersection
    }

    /// Pure form of [`Scene::step`]: returns the updated ray.
    pub fn advance(&self, mut ray: Ray) -> (Ray, StepOutcome) {
        let outcome = self.step(&mut ray);
        (ray, outcome)
    }

    /// Step `ray` until it escapes, no intersection is found, or `max_steps`
    /// steps have been taken. With `renormalize` the direction is rescaled to
    /// unit length after every reflection.
    pub fn propagate(&self, ray: &mut Ray, max_steps: u32, renormalize: bool) -> Termination {
        for _ in 0..max_steps {
            match self.step(ray) {
                StepOutcome::Reflected { .. } => {
                    if renormalize {
                        ray.renormalize_direction();
                    }
                }
                StepOutcome::Escaped => return Termination::Escaped,
                StepOutcome::NoIntersection => return Termination::NoIntersection,
            }
        }
        Termination::Exhausted
    }

    /// Follow `ray` like [`Scene::propagate`], recording every impact point.
    pub fn trace(&self, mut ray: Ray, max_steps: u32) -> Trajectory {
        let mut points = vec![ray.position];
        let mut termination = Termination::Exhausted;

        for _ in 0..max_steps {
            let outcome = self.step(&mut ray);
            match outcome {
                StepOutcome::Reflected { .. } => points.push(ray.position),
                StepOutcome::Escaped => {
                    points.push(ray.position);
                    termination = Termination::Escaped;
                    break;
                }
                StepOutcome::NoIntersection => {
                    termination = Termination::NoIntersection;
                    break;
                }
            }
        }

        Trajectory {
            points,
            ray,
            termination,
        }
    }
}

/// Unit direction of travel for rays entering the scene.
pub fn entry_direction() -> Vec3 {
    Vec3::x()
}
