//! Color-mapped PNG rendering of a scan.
//!
//! Each cell is colored by where its ray left the escape sphere: the exit
//! azimuth weights the primary color, the exit polar angle weights the
//! secondary one, and every reflection dims the pixel by
//! `exp(-absorption)`.

use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

use grscatter_kernel::{Ray, ScanResult};
use grscatter_math::SphericalAngles;

use crate::check_grid;
use crate::error::Result;

/// Orange.
pub const PRIMARY: [u8; 3] = [217, 102, 0];
/// Blue.
pub const SECONDARY: [u8; 3] = [89, 204, 204];

/// Colors and attenuation of the spherical color map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMap {
    /// Color weighted by `cos²(phi / 2)`.
    pub primary: [u8; 3],
    /// Color weighted by `sin²(theta)`.
    pub secondary: [u8; 3],
    /// Brightness lost per reflection, `a = exp(-reflections * absorption)`.
    pub absorption: f64,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            primary: PRIMARY,
            secondary: SECONDARY,
            absorption: 0.0,
        }
    }
}

impl ColorMap {
    /// Color map with the default palette and the given absorption.
    pub fn with_absorption(absorption: f64) -> Self {
        Self {
            absorption,
            ..Default::default()
        }
    }
}

/// Pixel color for a terminal ray.
pub fn shade(ray: &Ray, escape_radius: f64, map: &ColorMap) -> Rgb<u8> {
    let angles = SphericalAngles::from_point(&ray.position, escape_radius);
    let p = (angles.phi / 2.0).cos().powi(2);
    let t = angles.theta.sin().powi(2);
    let a = (-f64::from(ray.reflections) * map.absorption).exp();

    let channel = |k: usize| {
        let value = (p * f64::from(map.primary[k]) + t * f64::from(map.secondary[k])) * a;
        value.clamp(0.0, 255.0) as u8
    };
    Rgb([channel(0), channel(1), channel(2)])
}

/// Render a scan to an image `num_x` wide and `num_y` tall.
///
/// Grid row `j = 0` ends up at the bottom of the image.
pub fn render(result: &ScanResult, escape_radius: f64, map: &ColorMap) -> Result<RgbImage> {
    check_grid(result)?;

    let (num_x, num_y) = (result.settings.num_x, result.settings.num_y);
    let mut img: RgbImage = ImageBuffer::new(num_x, num_y);
    for i in 0..num_x {
        for j in 0..num_y {
            let ray = &result.rays[i as usize * num_y as usize + j as usize];
            img.put_pixel(i, num_y - 1 - j, shade(ray, escape_radius, map));
        }
    }
    Ok(img)
}

/// Render a scan and save it as PNG at `path`, whatever its extension.
pub fn save_image(
    path: impl AsRef<Path>,
    result: &ScanResult,
    escape_radius: f64,
    map: &ColorMap,
) -> Result<()> {
    let img = render(result, escape_radius, map)?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExportError;
    use grscatter_kernel::{ScanSettings, ScanStats};
    use grscatter_math::{Point3, Vec3};

    fn exit_at(x: f64, y: f64, z: f64, reflections: u32) -> Ray {
        let mut ray = Ray::new(Point3::new(x, y, z), Vec3::x());
        ray.reflections = reflections;
        ray
    }

    #[test]
    fn test_shade_saturates() {
        // phi = 0 and theta = π/2: both weights are 1, red and green overflow.
        let color = shade(&exit_at(6.0, 0.0, 0.0, 0), 6.0, &ColorMap::default());
        assert_eq!(color, Rgb([255, 255, 204]));
    }

    #[test]
    fn test_shade_pole_and_back() {
        let map = ColorMap::default();
        // North pole: theta = 0, only the primary color.
        assert_eq!(shade(&exit_at(0.0, 0.0, 6.0, 0), 6.0, &map), Rgb(PRIMARY));
        // Straight back: phi = π, only the secondary color.
        assert_eq!(shade(&exit_at(-6.0, 0.0, 0.0, 0), 6.0, &map), Rgb(SECONDARY));
    }

    #[test]
    fn test_shade_absorption() {
        let map = ColorMap::with_absorption(1.0);
        // exp(-1) ≈ 0.3679: 217 → 79.8, 102 → 37.5.
        assert_eq!(shade(&exit_at(0.0, 0.0, 6.0, 1), 6.0, &map), Rgb([79, 37, 0]));
        // No reflections, no dimming.
        assert_eq!(shade(&exit_at(0.0, 0.0, 6.0, 0), 6.0, &map), Rgb(PRIMARY));
    }

    fn column_result() -> ScanResult {
        ScanResult {
            settings: ScanSettings {
                num_x: 1,
                num_y: 2,
                ..Default::default()
            },
            rays: vec![exit_at(0.0, 0.0, 6.0, 0), exit_at(-6.0, 0.0, 0.0, 0)],
            stats: ScanStats::default(),
        }
    }

    #[test]
    fn test_render_flips_rows() {
        let img = render(&column_result(), 6.0, &ColorMap::default()).unwrap();
        assert_eq!(img.dimensions(), (1, 2));
        assert_eq!(*img.get_pixel(0, 1), Rgb(PRIMARY));
        assert_eq!(*img.get_pixel(0, 0), Rgb(SECONDARY));
    }

    #[test]
    fn test_render_size_mismatch() {
        let mut result = column_result();
        result.rays.push(exit_at(6.0, 0.0, 0.0, 0));
        assert!(matches!(
            render(&result, 6.0, &ColorMap::default()),
            Err(ExportError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_save_image_without_extension() {
        let path = std::env::temp_dir().join("grscatter_test_image");
        save_image(&path, &column_result(), 6.0, &ColorMap::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        std::fs::remove_file(&path).ok();
    }
}
