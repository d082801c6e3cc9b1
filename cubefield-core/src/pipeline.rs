//! Field → cubes → tiles → files.
//!
//! ```no_run
//! use cubefield_core::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::window_noise_preset())?;
//! for path in pipeline.run()? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), cubefield_core::Error>(())
//! ```

use std::path::PathBuf;

use crate::chunker::{chunk, CellGrid, Tile};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::field::Field;
use crate::mesher::mesh_field;
use crate::writer::write_tiles;

/// A validated configuration ready to run
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load and normalize the field
    pub fn field(&self) -> Result<Field> {
        let raw = self.config.source.load()?;
        let (lo, hi) = raw.range();
        tracing::debug!(lo, hi, "raw field range");
        self.config.normalize.apply(raw)
    }

    pub fn grid(&self) -> Result<CellGrid> {
        mesh_field(&self.field()?, &self.config.cube)
    }

    pub fn tiles(&self) -> Result<Vec<Tile>> {
        chunk(&self.grid()?, &self.config.tiling)
    }

    /// Run every stage and write the tiles, returning their paths
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        let tiles = self.tiles()?;
        let prefix = self.config.output_prefix();
        write_tiles(&prefix, &tiles, self.config.output.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::TilingConfig;
    use crate::error::Error;
    use crate::mesher::TRIANGLES_PER_CUBE;
    use crate::source::{FieldSource, RandomSource};

    fn random_config(rows: usize, cols: usize) -> PipelineConfig {
        PipelineConfig {
            source: FieldSource::Random(RandomSource {
                rows,
                cols,
                seed: Some(11),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let mut config = random_config(3, 3);
        config.cube.cube_size = -1.0;
        assert!(matches!(Pipeline::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_field_is_normalized() {
        let pipeline = Pipeline::new(random_config(5, 4)).unwrap();
        let (lo, hi) = pipeline.field().unwrap().range();
        assert!(lo.abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiles_cover_field() {
        let mut config = random_config(5, 7);
        config.tiling = TilingConfig::new(3, 2);
        let tiles = Pipeline::new(config).unwrap().tiles().unwrap();
        assert_eq!(tiles.len(), 9);
        let triangles: usize = tiles.iter().map(|t| t.mesh.len()).sum();
        assert_eq!(triangles, 35 * TRIANGLES_PER_CUBE);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let pipeline = Pipeline::new(random_config(4, 4)).unwrap();
        assert_eq!(pipeline.tiles().unwrap(), pipeline.tiles().unwrap());
    }
}
