//! JSON dump of a single traced trajectory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use grscatter_kernel::{Termination, Trajectory};

use crate::error::Result;

/// Serializable form of a [`Trajectory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Start point followed by every impact point.
    pub points: Vec<[f64; 3]>,
    /// Reflections before the trajectory ended.
    pub reflections: u32,
    /// How it ended.
    pub termination: Termination,
}

impl From<&Trajectory> for TrajectoryRecord {
    fn from(trajectory: &Trajectory) -> Self {
        Self {
            points: trajectory.points.iter().map(|p| [p.x, p.y, p.z]).collect(),
            reflections: trajectory.ray.reflections,
            termination: trajectory.termination,
        }
    }
}

/// Write a trajectory as pretty-printed JSON.
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &TrajectoryRecord::from(trajectory))?;
    writeln!(writer)?;
    Ok(())
}

/// Write a trajectory as JSON to a file at `path`.
pub fn save_trajectory(path: impl AsRef<Path>, trajectory: &Trajectory) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_trajectory(&mut writer, trajectory)?;
    writer.flush()?;
    Ok(())
}
