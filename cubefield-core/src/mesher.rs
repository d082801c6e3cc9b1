//! Cube mesher: one hollow cube per field cell

use serde::{Deserialize, Serialize};

use crate::chunker::CellGrid;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::geometry::{Mesh, CUBOID_TRIANGLES};
use crate::wall::Ring;

/// Triangles emitted per cube: four walls of one cuboid each
pub const TRIANGLES_PER_CUBE: usize = 4 * CUBOID_TRIANGLES;

/// How cell values become wall thickness and height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeParams {
    /// Edge length of each cube
    pub cube_size: f64,
    /// Fraction of half the cube edge a full-scale wall may occupy
    pub inner_wall_scale: f64,
    /// Minimum wall thickness
    pub inner_wall_floor: f64,
    /// Wall height at value 1.0
    pub height_scale: f64,
    /// Minimum wall height
    pub height_floor: f64,
    /// Thick walls for low values instead of high ones
    pub invert_thickness: bool,
}

impl Default for CubeParams {
    fn default() -> Self {
        Self {
            cube_size: 10.0,
            inner_wall_scale: 0.5,
            inner_wall_floor: 0.5,
            height_scale: 10.0,
            height_floor: 0.5,
            invert_thickness: false,
        }
    }
}

impl CubeParams {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.cube_size,
            self.inner_wall_scale,
            self.inner_wall_floor,
            self.height_scale,
            self.height_floor,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::invalid_config("cube parameters must be finite"));
        }
        if self.cube_size <= 0.0 {
            return Err(Error::invalid_config(format!(
                "cube_size must be positive, got {}",
                self.cube_size
            )));
        }
        if self.inner_wall_scale <= 0.0 || self.inner_wall_scale > 1.0 {
            return Err(Error::invalid_config(format!(
                "inner_wall_scale must lie in (0, 1], got {}",
                self.inner_wall_scale
            )));
        }
        if self.inner_wall_floor <= 0.0 || self.inner_wall_floor >= self.cube_size / 2.0 {
            return Err(Error::invalid_config(format!(
                "inner_wall_floor must lie in (0, cube_size / 2), got {}",
                self.inner_wall_floor
            )));
        }
        if self.height_scale < 0.0 {
            return Err(Error::invalid_config(format!(
                "height_scale must not be negative, got {}",
                self.height_scale
            )));
        }
        if self.height_floor <= 0.0 {
            return Err(Error::invalid_config(format!(
                "height_floor must be positive, got {}",
                self.height_floor
            )));
        }
        Ok(())
    }

    /// Wall thickness for thickness driver `t`, never below the floor.
    ///
    /// The driver is clamped to `[0, 1]` so a wall never exceeds half the
    /// cube edge, whatever range the field was remapped to.
    pub fn wall_width(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let t = if self.invert_thickness { 1.0 - t } else { t };
        (t * self.cube_size * self.inner_wall_scale / 2.0).max(self.inner_wall_floor)
    }

    /// Wall height for value `v`, never below the floor
    pub fn wall_height(&self, v: f64) -> f64 {
        (v * self.height_scale).max(self.height_floor)
    }
}

/// Transient description of one cell's cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub row: usize,
    pub col: usize,
    pub size: f64,
    pub wall_width: f64,
    pub wall_height: f64,
}

impl Cube {
    /// Four walls standing on z = 0. Cell `(row, col)` sits at
    /// `x = row * size`, `y = col * size`.
    pub fn mesh(&self) -> Mesh {
        let size = self.size as f32;
        let ring = Ring {
            origin: (self.row as f32 * size, self.col as f32 * size),
            size,
            width: self.wall_width as f32,
            z0: 0.0,
            z1: self.wall_height as f32,
        };
        let mut mesh = Mesh::with_capacity(TRIANGLES_PER_CUBE);
        ring.add_to(&mut mesh);
        mesh
    }
}

/// Describe every cell's cube. The auxiliary channel, when present, drives
/// thickness; the primary channel always drives height.
pub fn cubes(field: &Field, params: &CubeParams) -> Result<Vec<Cube>> {
    field.ensure_finite()?;
    let values = field.values();
    let thickness = field.aux().unwrap_or(values);

    let cubes = values
        .indexed_iter()
        .map(|((row, col), &v)| Cube {
            row,
            col,
            size: params.cube_size,
            wall_width: params.wall_width(thickness[[row, col]]),
            wall_height: params.wall_height(v),
        })
        .collect();
    Ok(cubes)
}

/// Mesh every cell into a hollow cube
pub fn mesh_field(field: &Field, params: &CubeParams) -> Result<CellGrid> {
    params.validate()?;
    let cells = cubes(field, params)?.iter().map(Cube::mesh).collect();
    let grid = CellGrid::new(field.rows(), field.cols(), cells)?;
    tracing::info!(
        cubes = grid.len(),
        triangles = grid.triangle_count(),
        "meshed field"
    );
    Ok(grid)
}
