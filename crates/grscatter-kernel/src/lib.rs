#![warn(missing_docs)]

//! Ray scattering in Gaspard-Rice hard-sphere billiards.
//!
//! A fixed configuration of reflective spheres sits inside a large escape
//! sphere. Rays enter along +X from a grid of starting points, bounce off the
//! scatterers by specular reflection, and are followed until they reach the
//! escape boundary or a step budget runs out.
//!
//! # Example
//!
//! ```ignore
//! use grscatter_kernel::{scan, Scene, ScanSettings};
//!
//! let scene = Scene::gaspard_rice_3d(6.0, 1.000001, 1.0)?;
//! let settings = ScanSettings { num_x: 200, num_y: 200, ..Default::default() };
//! let result = scan(&scene, &settings)?;
//!
//! println!("escaped: {}", result.stats.escaped);
//! println!("longest transit: {}", result.stats.max_reflections);
//! ```

pub mod error;
mod ray;
pub mod scan;
pub mod scene;
mod sphere;
pub mod sweep;

pub use error::{Result, ScatterError};
pub use ray::Ray;
pub use scan::{initial_ray, ScanBounds};
pub use scene::{
    Candidate, Configuration, Scene, StepOutcome, Termination, Trajectory, ESCAPE_INDEX,
};
pub use sphere::Sphere;
pub use sweep::{exit_angle, linspace, sweep_impact_parameter, Deflection};

use serde::{Deserialize, Serialize};

/// Escape radius used by the canonical scenes.
pub const ESCAPE_RADIUS: f64 = 6.0;
/// Scatterer radius used by the canonical scenes.
pub const SPHERE_RADIUS: f64 = 1.0;
/// Center spacing factor used by the canonical scenes (leaves a tiny gap
/// between neighbouring scatterers).
pub const SPHERE_SPACING: f64 = 1.000001;
/// X coordinate of the plane incoming rays start from.
pub const ENTRY_DEPTH: f64 = -3.0;

/// Grid scan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Sampling rectangle.
    pub bounds: ScanBounds,
    /// Grid width (cells along `x1..x2`).
    pub num_x: u32,
    /// Grid height (cells along `y1..y2`).
    pub num_y: u32,
    /// Maximum number of steps per ray.
    pub max_steps: u32,
    /// X coordinate of the starting plane.
    pub depth: f64,
    /// Rescale directions to unit length after each reflection.
    pub renormalize: bool,
    /// Distribute grid rows over the rayon thread pool.
    pub parallel: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            bounds: ScanBounds::default(),
            num_x: 1000,
            num_y: 1000,
            max_steps: 100,
            depth: ENTRY_DEPTH,
            renormalize: false,
            parallel: false,
        }
    }
}

impl ScanSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.num_x == 0 || self.num_y == 0 {
            return Err(ScatterError::InvalidSettings(format!(
                "sampling must be positive, got {}x{}",
                self.num_x, self.num_y
            )));
        }
        if !self.bounds.is_finite() {
            return Err(ScatterError::InvalidSettings(
                "corner coordinates must be finite".into(),
            ));
        }
        if !self.depth.is_finite() {
            return Err(ScatterError::InvalidSettings(
                "entry depth must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.num_x as usize * self.num_y as usize
    }
}

/// Summary counts of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Rays that reached the escape boundary.
    pub escaped: usize,
    /// Rays still bouncing when the step budget ran out.
    pub exhausted: usize,
    /// Rays for which a step found no intersection.
    pub degenerate: usize,
    /// Largest reflection count over all rays.
    pub max_reflections: u32,
}

impl ScanStats {
    fn record(&mut self, ray: &Ray, termination: Termination) {
        match termination {
            Termination::Escaped => self.escaped += 1,
            Termination::Exhausted => self.exhausted += 1,
            Termination::NoIntersection => self.degenerate += 1,
        }
        self.max_reflections = self.max_reflections.max(ray.reflections);
    }
}

/// Result of a grid scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Settings the scan ran with.
    pub settings: ScanSettings,
    /// Terminal ray of every cell, row-major (`i * num_y + j`).
    pub rays: Vec<Ray>,
    /// Summary counts.
    pub stats: ScanStats,
}

impl ScanResult {
    /// Terminal ray of cell `(i, j)`.
    pub fn ray(&self, i: u32, j: u32) -> Option<&Ray> {
        if i >= self.settings.num_x || j >= self.settings.num_y {
            return None;
        }
        self.rays
            .get(i as usize * self.settings.num_y as usize + j as usize)
    }
}

/// Scan `scene` over the grid described by `settings`.
///
/// This is the main entry point. It:
/// 1. Validates the settings
/// 2. Starts one ray per grid cell on the entry plane, heading +X
/// 3. Steps each ray until it escapes or the step budget runs out
/// 4. Collects the terminal rays and summary counts
pub fn scan(scene: &Scene, settings: &ScanSettings) -> Result<ScanResult> {
    settings.validate()?;

    tracing::debug!(
        num_x = settings.num_x,
        num_y = settings.num_y,
        max_steps = settings.max_steps,
        parallel = settings.parallel,
        "scanning grid"
    );

    let cells = scan::scan_grid(scene, settings)?;

    let mut stats = ScanStats::default();
    let mut rays = Vec::with_capacity(cells.len());
    for (cell, outcome) in cells.into_iter().enumerate() {
        if outcome.termination == Termination::NoIntersection {
            tracing::warn!(cell, "ray found no intersection; scene may be malformed");
        }
        stats.record(&outcome.ray, outcome.termination);
        rays.push(outcome.ray);
    }

    tracing::debug!(
        escaped = stats.escaped,
        exhausted = stats.exhausted,
        degenerate = stats.degenerate,
        "scan finished"
    );

    Ok(ScanResult {
        settings: settings.clone(),
        rays,
        stats,
    })
}
