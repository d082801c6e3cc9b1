//! Pipeline configuration, loadable from TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunker::TilingConfig;
use crate::error::{Error, Result};
use crate::mesher::CubeParams;
use crate::normalize::NormalizeConfig;
use crate::source::{FieldSource, ImageSource, ResizeAxis, WindowNoiseSource};
use crate::writer::OutputConfig;

/// Everything one pipeline run needs. Missing tables fall back to defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source: FieldSource,
    pub normalize: NormalizeConfig,
    pub cube: CubeParams,
    pub tiling: TilingConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), source = config.source.name(), "loaded config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::invalid_config(format!("cannot serialize config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        self.source.validate()?;
        self.normalize.validate()?;
        self.cube.validate()?;
        self.tiling.validate()
    }

    /// `<dir>/<base>` prefix for the written tiles
    pub fn output_prefix(&self) -> PathBuf {
        self.output.prefix(&self.source.default_base())
    }

    /// Windowed-noise panel: 24x36 cells in 12x8 tiles, walls thinning as
    /// the auxiliary noise rises.
    pub fn window_noise_preset() -> Self {
        Self {
            source: FieldSource::WindowNoise(WindowNoiseSource::default()),
            normalize: NormalizeConfig {
                value_range: [0.05, 1.0],
                ..Default::default()
            },
            cube: CubeParams {
                cube_size: 10.0,
                inner_wall_scale: 0.95,
                inner_wall_floor: 1.0,
                height_scale: 50.0,
                height_floor: 0.5,
                invert_thickness: true,
            },
            tiling: TilingConfig::new(12, 8),
            output: OutputConfig::default(),
        }
    }

    /// Image relief: resized to 144 columns, dark pixels become tall
    /// thick-walled cubes.
    pub fn image_preset(path: impl Into<PathBuf>) -> Self {
        Self {
            source: FieldSource::Image(ImageSource {
                resize_axis: ResizeAxis::Width,
                resize_target: Some(144),
                ..ImageSource::new(path)
            }),
            normalize: NormalizeConfig {
                invert_value: true,
                ..Default::default()
            },
            cube: CubeParams {
                cube_size: 8.0,
                inner_wall_scale: 0.95,
                inner_wall_floor: 1.5,
                height_scale: 35.0,
                height_floor: 0.5,
                invert_thickness: true,
            },
            tiling: TilingConfig::new(48, 47),
            output: OutputConfig::default(),
        }
    }
}
