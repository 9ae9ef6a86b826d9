//! Impact-parameter sweep: exit angle and transit length as a function of
//! the lateral offset of an incoming ray.

use std::f64::consts::TAU;

use grscatter_math::Vec3;

use crate::scan::initial_ray;
use crate::scene::{Scene, Termination};

/// Outcome for a single impact parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deflection {
    /// Lateral offset of the incoming ray (world Y).
    pub impact: f64,
    /// Exit angle `atan2(v.y, v.x)` in `[0, 2π)`.
    pub angle: f64,
    /// Number of reflections before the ray left.
    pub reflections: u32,
    /// How the trajectory ended.
    pub termination: Termination,
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|k| start + step * k as f64).collect()
        }
    }
}

/// In-plane exit angle `atan2(v.y, v.x)` of `direction`, in `[0, 2π)`.
pub fn exit_angle(direction: &Vec3) -> f64 {
    let angle = direction.y.atan2(direction.x).rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly 2π.
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Send one ray per impact parameter `b` from `(depth, b, 0)` along +X and
/// record where it leaves.
pub fn sweep_impact_parameter(
    scene: &Scene,
    impacts: &[f64],
    depth: f64,
    max_steps: u32,
) -> Vec<Deflection> {
    impacts
        .iter()
        .map(|&impact| {
            let mut ray = initial_ray(depth, impact, 0.0);
            let termination = scene.propagate(&mut ray, max_steps, false);
            Deflection {
                impact,
                angle: exit_angle(&ray.direction),
                reflections: ray.reflections,
                termination,
            }
        })
        .collect()
}
