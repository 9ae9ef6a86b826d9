//! Scan configuration: TOML file layered under command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use grscatter_kernel::{Configuration, ScanBounds, ScanSettings};

/// Output file name used when none is given.
pub const DEFAULT_NAME: &str = "data";

/// One layer of scan options. Unset fields fall through to the next layer.
///
/// ```toml
/// name = "scan.png"
/// image = true
/// absorption = 0.2
/// corner = [-1.0, -1.0, 1.0, 1.0]
/// sampling = [400, 400]
/// maxstep = 200
/// gr2d = false
/// parallel = true
/// renormalize = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub name: Option<PathBuf>,
    pub image: Option<bool>,
    pub absorption: Option<f64>,
    pub corner: Option<[f64; 4]>,
    pub sampling: Option<[u32; 2]>,
    pub maxstep: Option<u32>,
    pub gr2d: Option<bool>,
    pub parallel: Option<bool>,
    pub renormalize: Option<bool>,
}

/// Fully resolved options for a scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub name: PathBuf,
    pub image: bool,
    pub absorption: f64,
    pub configuration: Configuration,
    pub settings: ScanSettings,
}

impl ConfigFile {
    /// Parse a TOML document.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Fill every unset field of `self` from `base`.
    pub fn overlay(self, base: ConfigFile) -> ConfigFile {
        ConfigFile {
            name: self.name.or(base.name),
            image: self.image.or(base.image),
            absorption: self.absorption.or(base.absorption),
            corner: self.corner.or(base.corner),
            sampling: self.sampling.or(base.sampling),
            maxstep: self.maxstep.or(base.maxstep),
            gr2d: self.gr2d.or(base.gr2d),
            parallel: self.parallel.or(base.parallel),
            renormalize: self.renormalize.or(base.renormalize),
        }
    }

    /// Apply defaults and validate.
    pub fn resolve(self) -> Result<RunConfig> {
        let absorption = self.absorption.unwrap_or(0.0);
        if absorption.is_nan() || absorption < 0.0 {
            bail!("absorption must be non-negative, got {absorption}");
        }

        let defaults = ScanSettings::default();
        let bounds = match self.corner {
            Some([x1, y1, x2, y2]) => ScanBounds { x1, y1, x2, y2 },
            None => defaults.bounds,
        };
        let [num_x, num_y] = self.sampling.unwrap_or([defaults.num_x, defaults.num_y]);
        let settings = ScanSettings {
            bounds,
            num_x,
            num_y,
            max_steps: self.maxstep.unwrap_or(defaults.max_steps),
            parallel: self.parallel.unwrap_or(false),
            renormalize: self.renormalize.unwrap_or(false),
            ..defaults
        };
        settings.validate()?;

        let configuration = if self.gr2d.unwrap_or(false) {
            Configuration::Planar
        } else {
            Configuration::Spatial
        };

        Ok(RunConfig {
            name: self.name.unwrap_or_else(|| PathBuf::from(DEFAULT_NAME)),
            image: self.image.unwrap_or(false),
            absorption,
            configuration,
            settings,
        })
    }
}
