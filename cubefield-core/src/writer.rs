//! Tile writer: one STL file per tile

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunker::Tile;
use crate::error::{Error, Result};
use crate::stl::{write_stl, StlFormat};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the tiles land in; relative bases resolve against it
    pub dir: Option<PathBuf>,
    /// File name stem; defaults to one derived from the field source
    pub base: Option<String>,
    pub format: StlFormat,
}

impl OutputConfig {
    /// Resolved `<dir>/<base>` prefix
    pub fn prefix(&self, default_base: &str) -> PathBuf {
        let base = self.base.as_deref().unwrap_or(default_base);
        match &self.dir {
            Some(dir) => dir.join(base),
            None => PathBuf::from(base),
        }
    }
}

/// `<prefix>-<x>-<y>.stl`
pub fn tile_path(prefix: &Path, tile: &Tile) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("-{}.stl", tile.label()));
    PathBuf::from(name)
}

/// Write one tile, replacing any existing file
pub fn write_tile(path: &Path, tile: &Tile, format: StlFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_stl(&tile.mesh, format, BufWriter::new(file)).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), triangles = tile.mesh.len(), "wrote tile");
    Ok(())
}

/// Write every tile under `prefix`, returning the paths in tile order
pub fn write_tiles(prefix: &Path, tiles: &[Tile], format: StlFormat) -> Result<Vec<PathBuf>> {
    if let Some(parent) = prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut paths = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let path = tile_path(prefix, tile);
        write_tile(&path, tile, format)?;
        paths.push(path);
    }

    tracing::info!(files = paths.len(), prefix = %prefix.display(), "wrote tiles");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::stl::parse_stl;
    use nalgebra::Point3;

    fn tile(x: usize, y: usize) -> Tile {
        Tile {
            x,
            y,
            cells: 1,
            mesh: Mesh::block(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
        }
    }

    #[test]
    fn test_tile_path() {
        let path = tile_path(Path::new("out/rothko"), &tile(3, 1));
        assert_eq!(path, PathBuf::from("out/rothko-3-1.stl"));
    }

    #[test]
    fn test_prefix() {
        let config = OutputConfig::default();
        assert_eq!(config.prefix("windowed-noise"), PathBuf::from("windowed-noise"));

        let config = OutputConfig {
            dir: Some(PathBuf::from("build")),
            base: Some("panel".to_string()),
            ..Default::default()
        };
        assert_eq!(config.prefix("ignored"), PathBuf::from("build/panel"));
    }

    #[test]
    fn test_write_tiles_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("nested").join("grid");

        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/grid-0-0.stl"), b"stale").unwrap();

        let tiles = [tile(0, 0), tile(1, 0)];
        let paths = write_tiles(&prefix, &tiles, StlFormat::Binary).unwrap();
        assert_eq!(paths.len(), 2);

        for (path, tile) in paths.iter().zip(&tiles) {
            let mesh = parse_stl(&std::fs::read(path).unwrap()).unwrap();
            assert_eq!(mesh, tile.mesh);
        }
    }
}
