//! Geometry primitives for STL triangle soups

use nalgebra::{Point3, Vector3};

/// Face template for an 8-vertex box: bottom ring 0-3, top ring 4-7,
/// both counter-clockwise from the min corner.
pub const CUBOID_FACES: [[usize; 3]; 12] = [
    [0, 3, 1],
    [1, 3, 2],
    [0, 4, 7],
    [0, 7, 3],
    [4, 5, 6],
    [4, 6, 7],
    [5, 1, 2],
    [5, 2, 6],
    [2, 3, 6],
    [3, 7, 6],
    [0, 1, 5],
    [0, 5, 4],
];

/// Number of triangles in one cuboid
pub const CUBOID_TRIANGLES: usize = CUBOID_FACES.len();

/// A triangle facet with its normal, as stored in STL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub normal: Vector3<f32>,
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Build a facet from its corners, deriving the normal from the winding
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        let mut triangle = Self {
            normal: Vector3::zeros(),
            vertices: [v0, v1, v2],
        };
        triangle.normal = triangle.calculate_normal();
        triangle
    }

    /// Build a facet with an explicit normal (as read from a file)
    pub fn with_normal(normal: Vector3<f32>, vertices: [Point3<f32>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Zero-area facets get a zero normal instead of NaN.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }
}

/// Axis-aligned bounds of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A flat triangle list; the only artifact the pipeline persists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Concatenate another mesh's triangles onto this one
    pub fn append(&mut self, other: &Mesh) {
        self.triangles.extend_from_slice(&other.triangles);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Add a closed box from 8 corners using [`CUBOID_FACES`]
    pub fn add_cuboid(&mut self, corners: &[Point3<f32>; 8]) {
        for face in &CUBOID_FACES {
            self.add_triangle(Triangle::new(
                corners[face[0]],
                corners[face[1]],
                corners[face[2]],
            ));
        }
    }

    /// Axis-aligned box spanning `min`..`max`
    pub fn block(min: Point3<f32>, max: Point3<f32>) -> Self {
        let mut mesh = Self::with_capacity(CUBOID_TRIANGLES);
        mesh.add_cuboid(&box_corners(min.x, min.y, max.x, max.y, min.z, max.z));
        mesh
    }

    /// Sum of facet areas
    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Bounding box over all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.triangles.first()?.vertices[0];
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for vertex in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            bounds.min = bounds.min.inf(vertex);
            bounds.max = bounds.max.sup(vertex);
        }
        Some(bounds)
    }
}

/// Corners of a plan-view rectangle extruded from `z0` to `z1`, in
/// [`CUBOID_FACES`] order.
pub fn box_corners(x0: f32, y0: f32, x1: f32, y1: f32, z0: f32, z1: f32) -> [Point3<f32>; 8] {
    [
        Point3::new(x0, y0, z0), // bottom back left
        Point3::new(x1, y0, z0), // bottom back right
        Point3::new(x1, y1, z0), // bottom front right
        Point3::new(x0, y1, z0), // bottom front left
        Point3::new(x0, y0, z1), // top back left
        Point3::new(x1, y0, z1), // top back right
        Point3::new(x1, y1, z1), // top front right
        Point3::new(x0, y1, z1), // top front left
    ]
}
