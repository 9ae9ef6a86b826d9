//! grscatter - ray scattering in Gaspard-Rice hard-sphere billiards
//!
//! Scans a grid of incoming rays and writes their exit directions as text or
//! as a color-mapped PNG. Subcommands trace a single ray or sweep the impact
//! parameter of the planar configuration.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use grscatter_export::ColorMap;
use grscatter_kernel::{
    initial_ray, linspace, sweep_impact_parameter, Configuration, Scene, ENTRY_DEPTH,
    ESCAPE_RADIUS, SPHERE_RADIUS, SPHERE_SPACING,
};

mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "grscatter")]
#[command(about = "Ray scattering in Gaspard-Rice hard-sphere billiards", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Log progress and timing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options of the default grid scan.
#[derive(Args)]
struct ScanArgs {
    /// Output file name [default: data]
    #[arg(long, value_name = "FILE")]
    name: Option<PathBuf>,

    /// Write a PNG image instead of text
    #[arg(long)]
    image: bool,

    /// Absorption coefficient per reflection [default: 0]
    #[arg(long, value_name = "A")]
    absorption: Option<f64>,

    /// Sampling rectangle [default: -1 -1 1 1]
    #[arg(
        long,
        num_args = 4,
        value_names = ["X1", "Y1", "X2", "Y2"],
        allow_negative_numbers = true
    )]
    corner: Option<Vec<f64>>,

    /// Grid size [default: 1000 1000]
    #[arg(long, num_args = 2, value_names = ["NX", "NY"])]
    sampling: Option<Vec<u32>>,

    /// Maximum number of steps per ray [default: 100]
    #[arg(long, value_name = "N")]
    maxstep: Option<u32>,

    /// Use the planar three-sphere configuration
    #[arg(long)]
    gr2d: bool,

    /// Scan rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Rescale directions to unit length after every reflection
    #[arg(long)]
    renormalize: bool,

    /// TOML file with any of the options above
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace a single ray and dump its path as JSON
    Trace {
        /// Lateral offset of the incoming ray
        #[arg(long, allow_negative_numbers = true)]
        impact: f64,
        /// Maximum number of steps
        #[arg(long, default_value_t = 100)]
        maxstep: u32,
        /// Use the planar three-sphere configuration
        #[arg(long)]
        gr2d: bool,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sweep the impact parameter across the planar configuration
    Sweep {
        /// First and last impact parameter
        #[arg(
            long,
            required = true,
            num_args = 2,
            value_names = ["START", "END"],
            allow_negative_numbers = true
        )]
        range: Vec<f64>,
        /// Number of samples, both ends included
        #[arg(long, default_value_t = 1000)]
        samples: usize,
        /// Maximum number of steps per ray
        #[arg(long, default_value_t = 1000)]
        maxstep: u32,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl ScanArgs {
    /// Options given on the command line, as a configuration layer.
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            name: self.name.clone(),
            image: self.image.then_some(true),
            absorption: self.absorption,
            corner: self
                .corner
                .as_deref()
                .map(|c| [c[0], c[1], c[2], c[3]]),
            sampling: self.sampling.as_deref().map(|s| [s[0], s[1]]),
            maxstep: self.maxstep,
            gr2d: self.gr2d.then_some(true),
            parallel: self.parallel.then_some(true),
            renormalize: self.renormalize.then_some(true),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Trace {
            impact,
            maxstep,
            gr2d,
            output,
        }) => {
            trace_ray(impact, maxstep, gr2d, output)?;
        }
        Some(Commands::Sweep {
            range,
            samples,
            maxstep,
            output,
        }) => {
            sweep(range[0], range[1], samples, maxstep, output)?;
        }
        None => {
            run_scan(&cli.scan)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_scene(configuration: Configuration) -> Result<Scene> {
    let scene =
        Scene::from_configuration(configuration, ESCAPE_RADIUS, SPHERE_SPACING, SPHERE_RADIUS)?;

    info!(
        ?configuration,
        escape_radius = scene.escape_radius(),
        scatterers = scene.scatterers().len(),
        "built scene"
    );
    for (index, sphere) in scene.scatterers().iter().enumerate() {
        info!(
            index = index + 1,
            x = sphere.center.x,
            y = sphere.center.y,
            z = sphere.center.z,
            radius = sphere.radius,
            "scatterer"
        );
    }
    Ok(scene)
}

fn run_scan(args: &ScanArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let run = args.overrides().overlay(file).resolve()?;
    let scene = build_scene(run.configuration)?;

    let settings = &run.settings;
    info!(
        num_x = settings.num_x,
        num_y = settings.num_y,
        max_steps = settings.max_steps,
        parallel = settings.parallel,
        renormalize = settings.renormalize,
        "starting scan"
    );

    let start = Instant::now();
    let result = grscatter_kernel::scan(&scene, settings)?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        escaped = result.stats.escaped,
        exhausted = result.stats.exhausted,
        degenerate = result.stats.degenerate,
        max_reflections = result.stats.max_reflections,
        "scan complete"
    );

    let start = Instant::now();
    if run.image {
        let map = ColorMap::with_absorption(run.absorption);
        grscatter_export::save_image(&run.name, &result, scene.escape_radius(), &map)?;
    } else {
        grscatter_export::save_scan(&run.name, &result)?;
    }
    info!(
        path = %run.name.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "output written"
    );

    Ok(())
}

fn trace_ray(impact: f64, max_steps: u32, gr2d: bool, output: Option<PathBuf>) -> Result<()> {
    let configuration = if gr2d {
        Configuration::Planar
    } else {
        Configuration::Spatial
    };
    let scene = build_scene(configuration)?;
    let trajectory = scene.trace(initial_ray(ENTRY_DEPTH, impact, 0.0), max_steps);
    info!(
        reflections = trajectory.ray.reflections,
        termination = ?trajectory.termination,
        "traced ray"
    );

    match output {
        Some(path) => grscatter_export::save_trajectory(&path, &trajectory)?,
        None => grscatter_export::write_trajectory(&mut std::io::stdout().lock(), &trajectory)?,
    }
    Ok(())
}

fn sweep(
    start: f64,
    end: f64,
    samples: usize,
    max_steps: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let scene = build_scene(Configuration::Planar)?;
    let impacts = linspace(start, end, samples);

    let timer = Instant::now();
    let deflections = sweep_impact_parameter(&scene, &impacts, ENTRY_DEPTH, max_steps);
    info!(
        samples,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "sweep complete"
    );

    match output {
        Some(path) => grscatter_export::save_sweep(&path, &deflections)?,
        None => grscatter_export::write_sweep(&mut std::io::stdout().lock(), &deflections)?,
    }
    Ok(())
}
