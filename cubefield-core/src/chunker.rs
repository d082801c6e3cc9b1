//! Partition a grid of cell meshes into rectangular tiles.
//!
//! Each tile becomes one output file. Tiles are labelled `(x, y)` where `x`
//! counts tiles across columns and `y` counts tiles down rows. Edge tiles
//! shrink to whatever is left over.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Mesh;

/// Row-major grid of per-cell meshes
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Mesh>,
}

impl CellGrid {
    pub fn new(rows: usize, cols: usize, cells: Vec<Mesh>) -> Result<Self> {
        if cells.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                got: (cells.len() / cols.max(1), cols),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Mesh> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn triangle_count(&self) -> usize {
        self.cells.iter().map(Mesh::len).sum()
    }
}

/// Tile size in cells; `None` spans the whole grid along that axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Columns per tile
    pub tile_width: Option<usize>,
    /// Rows per tile
    pub tile_height: Option<usize>,
}

impl TilingConfig {
    pub fn new(tile_width: usize, tile_height: usize) -> Self {
        Self {
            tile_width: Some(tile_width),
            tile_height: Some(tile_height),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_width == Some(0) || self.tile_height == Some(0) {
            return Err(Error::invalid_config(
                "tile_width and tile_height must be at least 1",
            ));
        }
        Ok(())
    }
}

/// One output mesh: a rectangular block of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Tile column index
    pub x: usize,
    /// Tile row index
    pub y: usize,
    /// Number of cells merged into this tile
    pub cells: usize,
    pub mesh: Mesh,
}

impl Tile {
    /// `x-y` label used in file names
    pub fn label(&self) -> String {
        format!("{}-{}", self.x, self.y)
    }
}

/// Split the grid into `ceil(rows / h) * ceil(cols / w)` tiles, ordered by
/// `y` then `x`.
pub fn chunk(grid: &CellGrid, tiling: &TilingConfig) -> Result<Vec<Tile>> {
    tiling.validate()?;
    if grid.is_empty() {
        return Err(Error::EmptyField {
            rows: grid.rows,
            cols: grid.cols,
        });
    }

    let tile_w = tiling.tile_width.unwrap_or(grid.cols).min(grid.cols);
    let tile_h = tiling.tile_height.unwrap_or(grid.rows).min(grid.rows);
    let tiles_x = grid.cols.div_ceil(tile_w);
    let tiles_y = grid.rows.div_ceil(tile_h);

    let mut tiles = Vec::with_capacity(tiles_x * tiles_y);
    for y in 0..tiles_y {
        let row_range = y * tile_h..((y + 1) * tile_h).min(grid.rows);
        for x in 0..tiles_x {
            let col_range = x * tile_w..((x + 1) * tile_w).min(grid.cols);

            let mut mesh = Mesh::new();
            let mut cells = 0;
            for row in row_range.clone() {
                for col in col_range.clone() {
                    if let Some(cell) = grid.cell(row, col) {
                        mesh.append(cell);
                        cells += 1;
                    }
                }
            }

            tracing::debug!(x, y, cells, triangles = mesh.len(), "built tile");
            tiles.push(Tile { x, y, cells, mesh });
        }
    }

    tracing::info!(tiles = tiles.len(), tiles_x, tiles_y, "partitioned grid");
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use nalgebra::Point3;

    /// Grid whose cell (r, c) holds `r * cols + c + 1` marker triangles
    fn marker_grid(rows: usize, cols: usize) -> CellGrid {
        let cells = (0..rows * cols)
            .map(|i| {
                let mut mesh = Mesh::new();
                for _ in 0..=i {
                    mesh.add_triangle(Triangle::new(
                        Point3::new(i as f32, 0.0, 0.0),
                        Point3::new(i as f32 + 1.0, 0.0, 0.0),
                        Point3::new(i as f32, 1.0, 0.0),
                    ));
                }
                mesh
            })
            .collect();
        CellGrid::new(rows, cols, cells).unwrap()
    }

    #[test]
    fn test_even_partition() {
        let grid = marker_grid(4, 4);
        let tiles = chunk(&grid, &TilingConfig::new(2, 2)).unwrap();
        let labels: Vec<_> = tiles.iter().map(Tile::label).collect();
        assert_eq!(labels, ["0-0", "1-0", "0-1", "1-1"]);
        assert!(tiles.iter().all(|t| t.cells == 4));
    }

    #[test]
    fn test_ragged_edges() {
        let grid = marker_grid(5, 7);
        let tiles = chunk(&grid, &TilingConfig::new(3, 2)).unwrap();
        // ceil(5 / 2) * ceil(7 / 3)
        assert_eq!(tiles.len(), 9);

        let cells = |x, y| tiles.iter().find(|t| t.x == x && t.y == y).unwrap().cells;
        assert_eq!(cells(0, 0), 6);
        assert_eq!(cells(2, 0), 2);
        assert_eq!(cells(0, 2), 3);
        assert_eq!(cells(2, 2), 1);
    }

    #[test]
    fn test_partition_is_exact() {
        let grid = marker_grid(6, 5);
        for (w, h) in [(1, 1), (2, 3), (4, 4), (5, 6), (9, 9)] {
            let tiles = chunk(&grid, &TilingConfig::new(w, h)).unwrap();
            let cells: usize = tiles.iter().map(|t| t.cells).sum();
            let triangles: usize = tiles.iter().map(|t| t.mesh.len()).sum();
            assert_eq!(cells, grid.len());
            assert_eq!(triangles, grid.triangle_count());
        }
    }

    #[test]
    fn test_default_is_single_tile() {
        let grid = marker_grid(3, 4);
        let tiles = chunk(&grid, &TilingConfig::default()).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].label(), "0-0");
        assert_eq!(tiles[0].cells, 12);
    }

    #[test]
    fn test_tile_width_counts_columns() {
        let grid = marker_grid(2, 6);
        let tiles = chunk(&grid, &TilingConfig::new(3, 2)).unwrap();
        assert_eq!(tiles.len(), 2);
        // Tile 1-0 holds columns 3..6 of both rows: cells 3,4,5,9,10,11
        let expected: usize = [3, 4, 5, 9, 10, 11].iter().map(|i| i + 1).sum();
        assert_eq!(tiles[1].mesh.len(), expected);
    }

    #[test]
    fn test_zero_tile_rejected() {
        let grid = marker_grid(2, 2);
        assert!(matches!(
            chunk(&grid, &TilingConfig::new(0, 1)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_grid_shape_checked() {
        assert!(CellGrid::new(2, 2, vec![Mesh::new(); 3]).is_err());
        let grid = CellGrid::new(1, 2, vec![Mesh::new(); 2]).unwrap();
        assert!(grid.cell(0, 2).is_none());
        assert!(grid.cell(1, 0).is_none());
    }
}
