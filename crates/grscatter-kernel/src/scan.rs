//! Grid scan: one independent trajectory per sampled initial position.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use grscatter_math::Point3;

use crate::error::{Result, ScatterError};
use crate::ray::Ray;
use crate::scene::{entry_direction, Scene, Termination};
use crate::ScanSettings;

/// Sampling rectangle in the entry plane, `(x1, y1)` to `(x2, y2)`.
///
/// Grid `x` maps to world Y and grid `y` to world Z. Corners may be given in
/// either order; the grid runs from the first corner towards the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanBounds {
    /// First corner, grid x.
    pub x1: f64,
    /// First corner, grid y.
    pub y1: f64,
    /// Second corner, grid x.
    pub x2: f64,
    /// Second corner, grid y.
    pub y2: f64,
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self {
            x1: -1.0,
            y1: -1.0,
            x2: 1.0,
            y2: 1.0,
        }
    }
}

impl ScanBounds {
    /// Coordinates of cell `(i, j)` on an `num_x` by `num_y` grid.
    ///
    /// The last row and column stop one step short of the second corner.
    pub fn sample(&self, i: u32, j: u32, num_x: u32, num_y: u32) -> (f64, f64) {
        let u = self.x1 + (self.x2 - self.x1) * f64::from(i) / f64::from(num_x);
        let v = self.y1 + (self.y2 - self.y1) * f64::from(j) / f64::from(num_y);
        (u, v)
    }

    pub(crate) fn is_finite(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|c| c.is_finite())
    }
}

/// Terminal state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellOutcome {
    pub ray: Ray,
    pub termination: Termination,
}

/// Initial ray of cell `(u, v)`: on the entry plane `x = depth`, heading +X.
pub fn initial_ray(depth: f64, u: f64, v: f64) -> Ray {
    Ray::new(Point3::new(depth, u, v), entry_direction())
}

/// Trace every cell of row `i`.
fn scan_row(scene: &Scene, settings: &ScanSettings, i: u32) -> Result<Vec<CellOutcome>> {
    let (num_x, num_y) = (settings.num_x, settings.num_y);
    (0..num_y)
        .map(|j| {
            let (u, v) = settings.bounds.sample(i, j, num_x, num_y);
            let mut ray = initial_ray(settings.depth, u, v);
            let termination = scene.propagate(&mut ray, settings.max_steps, settings.renormalize);
            if !ray.is_finite() {
                return Err(ScatterError::NonFinite {
                    cell: i as usize * num_y as usize + j as usize,
                });
            }
            Ok(CellOutcome { ray, termination })
        })
        .collect()
}

/// Trace the whole grid in row-major order (`i * num_y + j`).
///
/// With `settings.parallel` the rows are distributed over the rayon pool;
/// the output order is the same either way.
pub(crate) fn scan_grid(scene: &Scene, settings: &ScanSettings) -> Result<Vec<CellOutcome>> {
    let row = |i| scan_row(scene, settings, i);

    let rows: Vec<Vec<CellOutcome>> = if settings.parallel {
        (0..settings.num_x)
            .into_par_iter()
            .map(row)
            .collect::<Result<_>>()?
    } else {
        (0..settings.num_x).map(row).collect::<Result<_>>()?
    };

    Ok(rows.into_iter().flatten().collect())
}
