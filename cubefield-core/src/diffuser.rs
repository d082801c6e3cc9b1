//! Quadratic-residue (Schroeder) diffuser panels.
//!
//! Each unit is a solid base, a thin perimeter wall enclosing a resonant
//! cavity, and a top ring whose opening shrinks with the unit's quadratic
//! residue `(i² + j²) mod N`. Units are laid out on the same grid as cubes and
//! go through the same chunker and writer.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::chunker::CellGrid;
use crate::error::{Error, Result};
use crate::geometry::{Mesh, CUBOID_TRIANGLES};
use crate::wall::Ring;

/// Triangles per unit: base slab, perimeter ring, top ring
pub const TRIANGLES_PER_UNIT: usize = CUBOID_TRIANGLES + 2 * 4 * CUBOID_TRIANGLES;

/// Speed of sound in air, mm/s
pub const SPEED_OF_SOUND_MM: f64 = 343_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffuserParams {
    /// Design frequency in Hz
    pub design_frequency: f64,
    /// Units along x; also the residue modulus
    pub rows: usize,
    /// Units along y
    pub cols: usize,
    /// Speed of sound in mm/s, which makes every length below millimetres
    pub speed_of_sound: f64,
    pub base_height: f64,
    pub top_height: f64,
    pub wall_width: f64,
}

impl Default for DiffuserParams {
    fn default() -> Self {
        Self {
            design_frequency: 6850.0,
            rows: 7,
            cols: 7,
            speed_of_sound: SPEED_OF_SOUND_MM,
            base_height: 1.0,
            top_height: 1.0,
            wall_width: 1.0,
        }
    }
}

impl DiffuserParams {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::invalid_config(format!(
                "diffuser needs at least 1x1 units, got {}x{}",
                self.rows, self.cols
            )));
        }
        let positive = [
            self.design_frequency,
            self.speed_of_sound,
            self.base_height,
            self.top_height,
            self.wall_width,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
        if !positive {
            return Err(Error::invalid_config(
                "diffuser frequency, speed and dimensions must be positive",
            ));
        }
        if self.wall_width >= self.unit_width() / 2.0 {
            return Err(Error::invalid_config(format!(
                "wall_width {} leaves no cavity in a {:.3} unit",
                self.wall_width,
                self.unit_width()
            )));
        }
        Ok(())
    }

    pub fn wavelength(&self) -> f64 {
        self.speed_of_sound / self.design_frequency
    }

    /// Half a wavelength
    pub fn unit_width(&self) -> f64 {
        self.wavelength() / 2.0
    }

    pub fn cavity_height(&self) -> f64 {
        self.wavelength() / 20.0
    }

    pub fn residue(&self, row: usize, col: usize) -> usize {
        (row * row + col * col) % self.rows
    }

    /// Width of the opening in the top ring of unit `(row, col)`
    pub fn opening(&self, row: usize, col: usize) -> f64 {
        self.unit_width() * self.residue(row, col) as f64 / (2.0 * self.rows as f64)
    }

    pub fn unit_mesh(&self, row: usize, col: usize) -> Mesh {
        let size = self.unit_width() as f32;
        let origin = (row as f32 * size, col as f32 * size);
        let base = self.base_height as f32;
        let cavity = self.cavity_height() as f32;

        let mut mesh = Mesh::block(
            Point3::new(origin.0, origin.1, 0.0),
            Point3::new(origin.0 + size, origin.1 + size, base),
        );

        Ring {
            origin,
            size,
            width: self.wall_width as f32,
            z0: base,
            z1: base + cavity,
        }
        .add_to(&mut mesh);

        let top_width = (self.unit_width() - self.opening(row, col)) / 2.0;
        Ring {
            origin,
            size,
            width: top_width as f32,
            z0: base + cavity,
            z1: base + cavity + self.top_height as f32,
        }
        .add_to(&mut mesh);

        mesh
    }
}

/// Build every unit of the panel
pub fn build_diffuser(params: &DiffuserParams) -> Result<CellGrid> {
    params.validate()?;
    tracing::info!(
        wavelength = params.wavelength(),
        unit_width = params.unit_width(),
        cavity_height = params.cavity_height(),
        "building {}x{} diffuser",
        params.rows,
        params.cols
    );

    let cells = (0..params.rows)
        .flat_map(|row| (0..params.cols).map(move |col| (row, col)))
        .map(|(row, col)| params.unit_mesh(row, col))
        .collect();
    CellGrid::new(params.rows, params.cols, cells)
}
