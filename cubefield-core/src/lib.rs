//! cubefield core library
//!
//! Turns a 2D scalar field (an image or generated noise) into a grid of
//! hollow cubes whose wall height and thickness follow the field, then
//! splits the grid into tiles and writes each tile as an STL file.

pub mod chunker;
pub mod config;
pub mod diffuser;
pub mod error;
pub mod field;
pub mod geometry;
pub mod mesher;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod stl;
pub mod wall;
pub mod writer;

// Re-export commonly used types
pub use chunker::{chunk, CellGrid, Tile, TilingConfig};
pub use config::PipelineConfig;
pub use diffuser::{build_diffuser, DiffuserParams};
pub use error::{Error, Result};
pub use field::Field;
pub use geometry::{Bounds, Mesh, Triangle};
pub use mesher::{mesh_field, CubeParams};
pub use normalize::{FlatFieldPolicy, NormalizeConfig};
pub use pipeline::Pipeline;
pub use source::FieldSource;
pub use stl::StlFormat;
pub use writer::{write_tiles, OutputConfig};
