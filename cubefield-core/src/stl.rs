//! STL reading and writing, binary and ASCII

use std::io::Write;

use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle};

/// 80-byte header plus the u32 triangle count
const HEADER_SIZE: usize = 80;
/// Normal, three vertices, attribute byte count
const RECORD_SIZE: usize = 50;

const HEADER_TEXT: &[u8] = b"binary STL written by cubefield";

/// On-disk STL flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Serialize a mesh in the given format
pub fn write_stl<W: Write>(mesh: &Mesh, format: StlFormat, writer: W) -> std::io::Result<()> {
    match format {
        StlFormat::Binary => write_binary_stl(mesh, writer),
        StlFormat::Ascii => write_ascii_stl(mesh, "cubefield", writer),
    }
}

/// Write a binary STL
pub fn write_binary_stl<W: Write>(mesh: &Mesh, mut writer: W) -> std::io::Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} triangles exceed the binary STL limit", mesh.len()),
        )
    })?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; RECORD_SIZE];
    for triangle in &mesh.triangles {
        let normal = triangle.normal;
        let mut offset = 0;
        for value in normal
            .iter()
            .chain(triangle.vertices.iter().flat_map(|v| v.coords.iter()))
        {
            record[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            offset += 4;
        }
        // Attribute byte count stays zero
        record[48..50].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }

    writer.flush()
}

/// Write an ASCII STL
pub fn write_ascii_stl<W: Write>(mesh: &Mesh, name: &str, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for triangle in &mesh.triangles {
        let n = triangle.normal;
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &triangle.vertices {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    writer.flush()
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(Error::StlParse("file too small to be a valid STL".to_string()));
    }

    // Skip 80-byte header
    let data = &data[HEADER_SIZE..];

    let triangle_count = read_u32(data, 0) as usize;
    let body = &data[4..];
    if body.len() < triangle_count * RECORD_SIZE {
        return Err(Error::StlParse(format!(
            "header declares {} triangles but only {} bytes follow",
            triangle_count,
            body.len()
        )));
    }

    let mut mesh = Mesh::with_capacity(triangle_count);
    for record in body.chunks_exact(RECORD_SIZE).take(triangle_count) {
        let normal = read_vector(record, 0);
        let vertices = [
            Point3::from(read_vector(record, 12)),
            Point3::from(read_vector(record, 24)),
            Point3::from(read_vector(record, 36)),
        ];
        mesh.add_triangle(Triangle::with_normal(normal, vertices));
    }

    Ok(mesh)
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_vector(data: &[u8], offset: usize) -> Vector3<f32> {
    Vector3::new(
        read_f32(data, offset),
        read_f32(data, offset + 4),
        read_f32(data, offset + 8),
    )
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(Error::StlParse(format!("invalid ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        Triangle::with_normal(Vector3::from(normal), [v1, v2, v3]),
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, xyz) = parse_vector3(input)?;
    Ok((input, Point3::from(xyz)))
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    // Binary headers may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CUBOID_TRIANGLES;

    fn sample_mesh() -> Mesh {
        Mesh::block(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 2.5, 7.25))
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_binary_layout() {
        let mesh = sample_mesh();
        let mut data = Vec::new();
        write_binary_stl(&mesh, &mut data).unwrap();

        assert_eq!(data.len(), 84 + CUBOID_TRIANGLES * 50);
        assert!(!data.starts_with(b"solid"));
        assert_eq!(read_u32(&data, 80) as usize, CUBOID_TRIANGLES);
    }

    #[test]
    fn test_binary_read_back() {
        let mesh = sample_mesh();
        let mut data = Vec::new();
        write_stl(&mesh, StlFormat::Binary, &mut data).unwrap();
        assert_eq!(parse_stl(&data).unwrap(), mesh);
    }

    #[test]
    fn test_ascii_read_back() {
        let mesh = sample_mesh();
        let mut data = Vec::new();
        write_stl(&mesh, StlFormat::Ascii, &mut data).unwrap();

        let text = String::from_utf8(data.clone()).unwrap();
        assert!(text.starts_with("solid cubefield\n"));
        assert!(text.trim_end().ends_with("endsolid cubefield"));

        let parsed = parse_stl(&data).unwrap();
        assert_eq!(parsed.len(), mesh.len());
        assert_eq!(parsed.bounds(), mesh.bounds());
    }

    #[test]
    fn test_truncated_binary() {
        let mut data = Vec::new();
        write_binary_stl(&sample_mesh(), &mut data).unwrap();
        data.truncate(data.len() - 10);
        assert!(matches!(parse_stl(&data), Err(Error::StlParse(_))));
    }

    #[test]
    fn test_ascii_without_name() {
        let text = "solid\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid\n";
        let mesh = parse_ascii_stl(text).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[1], Point3::new(1.0, 0.0, 0.0));
    }
}
