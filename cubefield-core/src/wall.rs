//! Ring-segment walls.
//!
//! A hollow cell is four slabs arranged as a pinwheel so that they tile the
//! square annulus without overlapping: each slab owns one corner of the ring.

use crate::geometry::{box_corners, Mesh};

/// Which side of the square ring a slab sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    /// Plan-view rectangle `(x0, y0, x1, y1)` of this side's slab relative to
    /// the cell origin, for a cell of edge `size` and wall thickness `width`.
    pub fn rect(self, size: f32, width: f32) -> (f32, f32, f32, f32) {
        let inner = size - width;
        match self {
            Side::Left => (0.0, 0.0, width, inner),
            Side::Right => (inner, width, size, size),
            Side::Bottom => (width, 0.0, size, width),
            Side::Top => (0.0, inner, inner, size),
        }
    }
}

/// Placement and extent of one ring of walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    /// Plan-view origin of the cell
    pub origin: (f32, f32),
    /// Cell edge length
    pub size: f32,
    /// Wall thickness
    pub width: f32,
    /// Bottom of the walls
    pub z0: f32,
    /// Top of the walls
    pub z1: f32,
}

impl Ring {
    /// Append a single side's slab (12 triangles)
    pub fn add_segment(&self, mesh: &mut Mesh, side: Side) {
        let (x0, y0, x1, y1) = side.rect(self.size, self.width);
        let (ox, oy) = self.origin;
        mesh.add_cuboid(&box_corners(
            ox + x0,
            oy + y0,
            ox + x1,
            oy + y1,
            self.z0,
            self.z1,
        ));
    }

    /// Append all four sides (48 triangles)
    pub fn add_to(&self, mesh: &mut Mesh) {
        for side in Side::ALL {
            self.add_segment(mesh, side);
        }
    }
}
