/// Example: draw a windowed-noise field in the terminal
///
/// Usage: cargo run --example preview_window -- [seed]
use std::env;
use std::io::stdout;

use anyhow::Context;
use cubefield_cli::FieldRenderer;
use cubefield_core::source::FieldSource;
use cubefield_core::{Pipeline, PipelineConfig};

fn main() -> anyhow::Result<()> {
    let seed = match env::args().nth(1) {
        Some(arg) => Some(arg.parse::<u64>().context("seed must be an integer")?),
        None => None,
    };

    let mut config = PipelineConfig::window_noise_preset();
    if let FieldSource::WindowNoise(source) = &mut config.source {
        source.seed = seed;
    }

    let field = Pipeline::new(config)?.field()?;
    println!("{}x{} windowed-noise field:", field.rows(), field.cols());
    FieldRenderer::new(&field, field.cols()).draw(&mut stdout())?;
    Ok(())
}
