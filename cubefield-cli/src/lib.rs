//! Command helpers for the cubefield binary

use anyhow::{Context, Result};
use cubefield_core::stl::parse_stl;
use cubefield_core::{
    build_diffuser, chunk, write_tiles, Bounds, DiffuserParams, OutputConfig, TilingConfig,
};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod preview;

pub use preview::FieldRenderer;

/// Triangle count and extent of one STL file
#[derive(Debug, Clone, PartialEq)]
pub struct StlSummary {
    pub path: PathBuf,
    pub triangles: usize,
    pub surface_area: f32,
    pub bounds: Option<Bounds>,
}

impl fmt::Display for StlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} triangles, area {:.3}",
            self.path.display(),
            self.triangles,
            self.surface_area
        )?;
        if let Some(Bounds { min, max }) = self.bounds {
            write!(
                f,
                ", bounds [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        Ok(())
    }
}

pub fn inspect_stl(path: &Path) -> Result<StlSummary> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mesh = parse_stl(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(StlSummary {
        path: path.to_path_buf(),
        triangles: mesh.len(),
        surface_area: mesh.surface_area(),
        bounds: mesh.bounds(),
    })
}

/// Build a diffuser panel and write it as tiles
pub fn write_diffuser(
    params: &DiffuserParams,
    tiling: &TilingConfig,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    let grid = build_diffuser(params)?;
    let tiles = chunk(&grid, tiling)?;
    let prefix = output.prefix("diffuser");
    let paths = write_tiles(&prefix, &tiles, output.format)
        .with_context(|| format!("failed to write diffuser tiles to {}", prefix.display()))?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_core::diffuser::TRIANGLES_PER_UNIT;

    #[test]
    fn test_diffuser_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let params = DiffuserParams {
            rows: 5,
            cols: 3,
            ..Default::default()
        };
        let output = OutputConfig {
            dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let paths = write_diffuser(&params, &TilingConfig::default(), &output).unwrap();
        assert_eq!(paths, [dir.path().join("diffuser-0-0.stl")]);

        let summary = inspect_stl(&paths[0]).unwrap();
        assert_eq!(summary.triangles, 15 * TRIANGLES_PER_UNIT);
        let bounds = summary.bounds.unwrap();
        assert_eq!(bounds.min.x, 0.0);
        assert!(bounds.max.x > bounds.max.y);
        assert!(summary.surface_area > 0.0);
        assert!(summary.to_string().contains("1620 triangles, area "));
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = inspect_stl(Path::new("/nonexistent/tile-0-0.stl")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_inspect_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.stl");
        std::fs::write(&path, b"not an stl").unwrap();
        assert!(inspect_stl(&path).is_err());
    }
}
