#![warn(missing_docs)]

//! Output writers for Gaspard-Rice scans.
//!
//! - [`text`]: scan parameters plus one `reflections phi theta` line per ray
//! - [`png`]: spherical color map of the exit points
//! - [`trajectory`]: JSON dump of a single traced ray

pub mod error;
pub mod png;
pub mod text;
pub mod trajectory;

pub use error::{ExportError, Result};
pub use png::{render, save_image, shade, ColorMap};
pub use text::{save_scan, save_sweep, write_scan, write_sweep};
pub use trajectory::{save_trajectory, write_trajectory, TrajectoryRecord};

use grscatter_kernel::ScanResult;

/// Check that a result holds exactly one ray per grid cell.
pub(crate) fn check_grid(result: &ScanResult) -> Result<()> {
    let expected = result.settings.cell_count();
    let actual = result.rays.len();
    if expected != actual {
        return Err(ExportError::SizeMismatch { expected, actual });
    }
    Ok(())
}
