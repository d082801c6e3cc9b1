//! Field sources: where the numbers come from.

pub mod noise;
pub mod raster;
pub mod window;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::Field;

pub use noise::{NoiseDistribution, RandomSource};
pub use raster::{GreyscaleMethod, ImageSource, ResizeAxis};
pub use window::{AuxNoise, WindowKind, WindowNoiseSource};

/// Selects how the field is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    Image(ImageSource),
    Random(RandomSource),
    WindowNoise(WindowNoiseSource),
}

impl Default for FieldSource {
    fn default() -> Self {
        FieldSource::Random(RandomSource::default())
    }
}

impl FieldSource {
    pub fn validate(&self) -> Result<()> {
        match self {
            FieldSource::Image(source) => source.validate(),
            FieldSource::Random(source) => source.validate(),
            FieldSource::WindowNoise(source) => source.validate(),
        }
    }

    /// Produce the raw (un-normalized) field
    pub fn load(&self) -> Result<Field> {
        let field = match self {
            FieldSource::Image(source) => source.load()?,
            FieldSource::Random(source) => source.generate()?,
            FieldSource::WindowNoise(source) => source.generate()?,
        };
        tracing::info!(
            rows = field.rows(),
            cols = field.cols(),
            aux = field.aux().is_some(),
            "loaded {} field",
            self.name()
        );
        Ok(field)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldSource::Image(_) => "image",
            FieldSource::Random(_) => "random",
            FieldSource::WindowNoise(_) => "windowed-noise",
        }
    }

    /// Output file base name when none is configured: the image path without
    /// its extension, or a fixed name for generated fields.
    pub fn default_base(&self) -> String {
        match self {
            FieldSource::Image(source) => source
                .path
                .with_extension("")
                .to_string_lossy()
                .into_owned(),
            FieldSource::Random(_) => "random-noise".to_string(),
            FieldSource::WindowNoise(_) => "windowed-noise".to_string(),
        }
    }
}

/// PCG generator from a fixed seed, or from a fresh random seed that is logged
/// so the run can be repeated.
pub(crate) fn seeded_rng(seed: Option<u64>) -> Pcg64Mcg {
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed configured, drew one");
        seed
    });
    Pcg64Mcg::seed_from_u64(seed)
}
