//! cubefield - images and noise to tiled hollow-cube STL reliefs
//!
//! Every field cell becomes a hollow cube whose wall height follows the
//! cell value. The cube grid is cut into tiles, one STL file each.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::stdout;
use std::path::PathBuf;

use cubefield_cli::{inspect_stl, write_diffuser, FieldRenderer};
use cubefield_core::source::{
    FieldSource, GreyscaleMethod, NoiseDistribution, RandomSource, WindowKind,
};
use cubefield_core::{
    DiffuserParams, OutputConfig, Pipeline, PipelineConfig, StlFormat, TilingConfig,
};

#[derive(Parser)]
#[command(name = "cubefield")]
#[command(about = "Turn images and noise into tiled hollow-cube STL reliefs")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline from a TOML config file
    Run {
        /// Path to the config file
        config: PathBuf,
    },

    /// Relief from an image
    Image {
        /// Input PNG/JPG file
        input: PathBuf,

        /// Target width in cells (default: 144)
        #[arg(long)]
        resize: Option<u32>,

        /// Keep the image at its original size
        #[arg(long, conflicts_with = "resize")]
        no_resize: bool,

        /// Greyscale conversion
        #[arg(long, value_enum, default_value_t = Greyscale::CieY)]
        greyscale: Greyscale,

        /// Bright pixels become tall cubes instead of dark ones
        #[arg(long)]
        no_invert: bool,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// Relief from i.i.d. random values
    Noise {
        #[arg(long, default_value_t = 30)]
        rows: usize,

        #[arg(long, default_value_t = 30)]
        cols: usize,

        #[arg(long, value_enum, default_value_t = Distribution::Gaussian)]
        distribution: Distribution,

        /// RNG seed (default: random, logged)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// Windowed-noise panel
    Window {
        #[arg(long, value_enum, default_value_t = Window::Blackman)]
        window: Window,

        /// RNG seed (default: random, logged)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// Quadratic-residue diffuser panel
    Diffuser {
        /// Design frequency in Hz
        #[arg(short, long, default_value_t = 6850.0)]
        frequency: f64,

        #[arg(long, default_value_t = 7)]
        rows: usize,

        #[arg(long, default_value_t = 7)]
        cols: usize,

        #[command(flatten)]
        tiles: TileArgs,
    },

    /// Show the normalized field of a config as a terminal heat map
    Preview {
        /// Path to the config file
        config: PathBuf,

        /// Columns to draw (default: terminal width)
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Print triangle counts and bounds of STL files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Cube geometry overrides on top of a preset
#[derive(Args)]
struct MeshArgs {
    /// Cube edge length
    #[arg(long)]
    cube_size: Option<f64>,

    /// Fraction of half the edge a full wall may take
    #[arg(long)]
    wall_scale: Option<f64>,

    /// Minimum wall thickness
    #[arg(long)]
    wall_floor: Option<f64>,

    /// Wall height at value 1.0
    #[arg(long)]
    height_scale: Option<f64>,

    /// Minimum wall height
    #[arg(long)]
    height_floor: Option<f64>,

    /// Thick walls for low values (true/false)
    #[arg(long)]
    invert_thickness: Option<bool>,

    /// Print the resulting config as TOML instead of running it
    #[arg(long)]
    dump_config: bool,

    #[command(flatten)]
    tiles: TileArgs,
}

#[derive(Args)]
struct TileArgs {
    /// Cells per tile along columns
    #[arg(long)]
    tile_width: Option<usize>,

    /// Cells per tile along rows
    #[arg(long)]
    tile_height: Option<usize>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file base name
    #[arg(short, long)]
    name: Option<String>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Greyscale {
    CieY,
    Luma,
}

#[derive(Clone, Copy, ValueEnum)]
enum Distribution {
    Gaussian,
    Uniform,
}

#[derive(Clone, Copy, ValueEnum)]
enum Window {
    Blackman,
    BlackmanHarris,
}

impl MeshArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        let cube = &mut config.cube;
        if let Some(v) = self.cube_size {
            cube.cube_size = v;
        }
        if let Some(v) = self.wall_scale {
            cube.inner_wall_scale = v;
        }
        if let Some(v) = self.wall_floor {
            cube.inner_wall_floor = v;
        }
        if let Some(v) = self.height_scale {
            cube.height_scale = v;
        }
        if let Some(v) = self.height_floor {
            cube.height_floor = v;
        }
        if let Some(v) = self.invert_thickness {
            cube.invert_thickness = v;
        }
        self.tiles.apply(&mut config.tiling, &mut config.output);
    }
}

impl TileArgs {
    fn apply(&self, tiling: &mut TilingConfig, output: &mut OutputConfig) {
        if self.tile_width.is_some() {
            tiling.tile_width = self.tile_width;
        }
        if self.tile_height.is_some() {
            tiling.tile_height = self.tile_height;
        }
        if self.output.is_some() {
            output.dir = self.output.clone();
        }
        if self.name.is_some() {
            output.base = self.name.clone();
        }
        if self.ascii {
            output.format = StlFormat::Ascii;
        }
    }
}

impl Commands {
    /// Pipeline config for the field commands, `None` for the others
    fn pipeline_config(&self) -> Result<Option<PipelineConfig>> {
        let config = match self {
            Commands::Run { config } => PipelineConfig::load(config)
                .with_context(|| format!("failed to load {}", config.display()))?,

            Commands::Image {
                input,
                resize,
                no_resize,
                greyscale,
                no_invert,
                mesh,
            } => {
                let mut config = PipelineConfig::image_preset(input);
                if let FieldSource::Image(source) = &mut config.source {
                    if *no_resize {
                        source.resize_target = None;
                    } else if resize.is_some() {
                        source.resize_target = *resize;
                    }
                    source.greyscale_method = match greyscale {
                        Greyscale::CieY => GreyscaleMethod::CieY,
                        Greyscale::Luma => GreyscaleMethod::Luma,
                    };
                }
                config.normalize.invert_value = !no_invert;
                mesh.apply(&mut config);
                config
            }

            Commands::Noise {
                rows,
                cols,
                distribution,
                seed,
                mesh,
            } => {
                let distribution = match distribution {
                    Distribution::Gaussian => NoiseDistribution::default(),
                    Distribution::Uniform => NoiseDistribution::Uniform {
                        low: 0.0,
                        high: 1.0,
                    },
                };
                let mut config = PipelineConfig {
                    source: FieldSource::Random(RandomSource {
                        rows: *rows,
                        cols: *cols,
                        distribution,
                        seed: *seed,
                    }),
                    ..Default::default()
                };
                mesh.apply(&mut config);
                config
            }

            Commands::Window { window, seed, mesh } => {
                let mut config = PipelineConfig::window_noise_preset();
                if let FieldSource::WindowNoise(source) = &mut config.source {
                    source.window = match window {
                        Window::Blackman => WindowKind::Blackman,
                        Window::BlackmanHarris => WindowKind::BlackmanHarris,
                    };
                    source.seed = *seed;
                }
                mesh.apply(&mut config);
                config
            }

            Commands::Diffuser { .. } | Commands::Preview { .. } | Commands::Inspect { .. } => {
                return Ok(None)
            }
        };
        Ok(Some(config))
    }

    fn dump_config(&self) -> bool {
        match self {
            Commands::Image { mesh, .. }
            | Commands::Noise { mesh, .. }
            | Commands::Window { mesh, .. } => mesh.dump_config,
            _ => false,
        }
    }
}

fn diffuser_job(
    frequency: f64,
    rows: usize,
    cols: usize,
    tiles: &TileArgs,
) -> (DiffuserParams, TilingConfig, OutputConfig) {
    let params = DiffuserParams {
        design_frequency: frequency,
        rows,
        cols,
        ..Default::default()
    };
    let mut tiling = TilingConfig::default();
    let mut output = OutputConfig::default();
    tiles.apply(&mut tiling, &mut output);
    (params, tiling, output)
}

fn run_pipeline(config: PipelineConfig) -> Result<()> {
    let pipeline = Pipeline::new(config).context("invalid configuration")?;
    let paths = pipeline.run()?;
    for path in &paths {
        println!("{}", path.display());
    }
    tracing::info!("Done! {} tiles written", paths.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(config) = cli.command.pipeline_config()? {
        if cli.command.dump_config() {
            print!("{}", config.to_toml_string()?);
        } else {
            run_pipeline(config)?;
        }
        return Ok(());
    }

    match cli.command {
        Commands::Diffuser {
            frequency,
            rows,
            cols,
            tiles,
        } => {
            let (params, tiling, output) = diffuser_job(frequency, rows, cols, &tiles);
            let paths = write_diffuser(&params, &tiling, &output)?;
            for path in &paths {
                println!("{}", path.display());
            }
            tracing::info!("Done! {} tiles written", paths.len());
        }

        Commands::Preview { config, width } => {
            let config = PipelineConfig::load(&config)
                .with_context(|| format!("failed to load {}", config.display()))?;
            let field = Pipeline::new(config)?.field()?;
            let width = match width {
                Some(width) => width,
                None => crossterm::terminal::size()
                    .map(|(w, _)| usize::from(w))
                    .unwrap_or(80),
            };
            FieldRenderer::new(&field, width).draw(&mut stdout())?;
        }

        Commands::Inspect { files } => {
            for file in &files {
                println!("{}", inspect_stl(file)?);
            }
        }

        Commands::Run { .. }
        | Commands::Image { .. }
        | Commands::Noise { .. }
        | Commands::Window { .. } => {}
    }

    Ok(())
}
