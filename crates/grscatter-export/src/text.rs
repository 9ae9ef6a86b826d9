//! Plain-text writers.
//!
//! Scan files start with the scan parameters on one line:
//!
//! ```text
//! x1 y1 x2 y2 numX numY
//! ```
//!
//! followed by one `reflections phi theta` record per ray, in row-major grid
//! order, where `phi`/`theta` are the spherical angles of the exit
//! direction.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use grscatter_kernel::{Deflection, ScanResult};

use crate::error::Result;
use crate::check_grid;

/// Write a scan in the text format.
pub fn write_scan<W: Write>(writer: &mut W, result: &ScanResult) -> Result<()> {
    check_grid(result)?;

    let settings = &result.settings;
    let bounds = &settings.bounds;
    writeln!(
        writer,
        "{} {} {} {} {} {}",
        bounds.x1, bounds.y1, bounds.x2, bounds.y2, settings.num_x, settings.num_y
    )?;

    for ray in &result.rays {
        let angles = ray.exit_angles();
        writeln!(writer, "{} {} {}", ray.reflections, angles.phi, angles.theta)?;
    }
    Ok(())
}

/// Write a scan to a text file at `path`.
pub fn save_scan(path: impl AsRef<Path>, result: &ScanResult) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_scan(&mut writer, result)?;
    writer.flush()?;
    Ok(())
}

/// Write an impact-parameter sweep, one `impact angle reflections` line per
/// sample.
pub fn write_sweep<W: Write>(writer: &mut W, deflections: &[Deflection]) -> Result<()> {
    for d in deflections {
        writeln!(writer, "{} {} {}", d.impact, d.angle, d.reflections)?;
    }
    Ok(())
}

/// Write an impact-parameter sweep to a text file at `path`.
pub fn save_sweep(path: impl AsRef<Path>, deflections: &[Deflection]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_sweep(&mut writer, deflections)?;
    writer.flush()?;
    Ok(())
}
