/// STL file parser for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{LoadError, LoadResult};
use crate::geometry::Geometry;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// One STL facet: normal followed by three corners
#[derive(Debug, Clone, Copy)]
struct Facet {
    normal: [f32; 3],
    vertices: [[f32; 3]; 3],
}

fn facets_to_geometry(facets: &[Facet]) -> Geometry {
    let mut positions = Vec::with_capacity(facets.len() * 3);
    let mut normals = Vec::with_capacity(facets.len() * 3);

    for facet in facets {
        for vertex in facet.vertices {
            positions.push(Point3::from(vertex));
            normals.push(Vector3::from(facet.normal));
        }
    }

    Geometry::new(positions).with_normals(normals)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> LoadResult<Geometry> {
    if data.len() < HEADER_LEN + 4 {
        return Err(LoadError::stl("file too small to be a valid STL"));
    }

    let (body, triangle_count) = binary_header(data)
        .map_err(|e| LoadError::stl(format!("failed to read STL header: {e:?}")))?;
    let triangle_count = triangle_count as usize;

    let expected = triangle_count.saturating_mul(FACET_LEN);
    if body.len() < expected {
        return Err(LoadError::stl(format!(
            "unexpected end of file: header declares {triangle_count} triangles ({expected} bytes) but {} remain",
            body.len()
        )));
    }

    let (_, facets) = count(binary_facet, triangle_count)(body)
        .map_err(|e| LoadError::stl(format!("failed to read STL facets: {e:?}")))?;

    Ok(facets_to_geometry(&facets))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, normal) = binary_vector3(input)?;
    let (input, v1) = binary_vector3(input)?;
    let (input, v2) = binary_vector3(input)?;
    let (input, v3) = binary_vector3(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;

    Ok((
        input,
        Facet {
            normal,
            vertices: [v1, v2, v3],
        },
    ))
}

fn binary_vector3(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> LoadResult<Geometry> {
    match parse_ascii_stl_impl(input) {
        Ok((_, facets)) => Ok(facets_to_geometry(&facets)),
        Err(e) => Err(LoadError::stl(format!("failed to parse ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
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
        Facet {
            normal,
            vertices: [v1, v2, v3],
        },
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
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

/// Detect and parse STL file (binary or ASCII).
///
/// Some binary exporters also start their header with `solid`, so a failed
/// ASCII parse falls back to the binary reader.
pub fn parse_stl(data: &[u8]) -> LoadResult<Geometry> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(geometry) => return Ok(geometry),
                Err(err) => log::debug!("not an ASCII STL, trying binary: {err}"),
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
pub(crate) fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_LEN];
    data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for triangle in triangles {
        data.extend(std::iter::repeat(0u8).take(12)); // normal
        for vertex in triangle {
            for component in vertex {
                data.extend_from_slice(&component.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TRIANGLE: &str = "solid demo part
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1.5 0 0
      vertex 0 -2.5e0 0
    endloop
  endfacet
endsolid demo part
";

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let result = parse_binary_stl(&data);
        assert!(result.is_ok());
        let geometry = result.unwrap();
        assert_eq!(geometry.vertex_count(), 0);
    }

    #[test]
    fn test_parse_binary_triangles() {
        let data = binary_stl(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
        ]);

        let geometry = parse_stl(&data).unwrap();
        assert_eq!(geometry.vertex_count(), 6);
        assert_eq!(geometry.face_count(), 2);
        assert!(geometry.indices.is_none());
        assert_eq!(geometry.positions[4], Point3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut data = binary_stl(&[[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
        data.truncate(data.len() - 10);
        assert!(matches!(parse_binary_stl(&data), Err(LoadError::Stl(_))));

        assert!(parse_binary_stl(&[0u8; 20]).is_err());
    }

    #[test]
    fn test_parse_ascii_with_name() {
        let geometry = parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.positions[2], Point3::new(0.0, -2.5, 0.0));

        let normals = geometry.normals.unwrap();
        assert!(normals.iter().all(|n| *n == Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut data = binary_stl(&[[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
        data[..5].copy_from_slice(b"solid");

        let geometry = parse_stl(&data).unwrap();
        assert_eq!(geometry.face_count(), 1);
    }
}
