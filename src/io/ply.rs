//! PLY (Stanford polygon) format support.
//!
//! Meshes are read through `ply-rs` and written as ASCII PLY with
//! double-precision coordinates, so a save followed by a load keeps positions
//! exact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, CornerMesh, MeshIndex};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use clers::io::ply;
/// use clers::mesh::CornerMesh;
///
/// let mesh: CornerMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<CornerMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Extract vertices
    let vertex_element = ply.payload.get("vertex").ok_or_else(|| MeshError::LoadError {
        path: path.to_path_buf(),
        message: "PLY file has no vertex element".to_string(),
    })?;

    let coordinate = |vertex: &DefaultElement, name: &str| {
        get_float_property(vertex, name).ok_or_else(|| MeshError::LoadError {
            path: path.to_path_buf(),
            message: format!("vertex missing {} coordinate", name),
        })
    };
    let positions = vertex_element
        .iter()
        .map(|vertex| {
            Ok(Point3::new(
                coordinate(vertex, "x")?,
                coordinate(vertex, "y")?,
                coordinate(vertex, "z")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    // Extract faces
    let face_element = ply.payload.get("face").ok_or_else(|| MeshError::LoadError {
        path: path.to_path_buf(),
        message: "PLY file has no face element".to_string(),
    })?;

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| MeshError::LoadError {
                path: path.to_path_buf(),
                message: "face missing vertex_indices property".to_string(),
            })?;

        // Fan-triangulate polygons; faces with fewer than three indices are skipped.
        for i in 1..indices.len().saturating_sub(1) {
            triangles.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    if triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "PLY file contains no faces".to_string(),
        });
    }

    log::debug!(
        "loaded {} vertices and {} triangles",
        positions.len(),
        triangles.len()
    );
    build_from_triangles(&positions, &triangles)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save the visible triangles of a mesh to an ASCII PLY file.
///
/// # Example
///
/// ```no_run
/// use clers::io::ply;
/// use clers::mesh::CornerMesh;
///
/// # let mesh: CornerMesh = ply::load("model.ply").unwrap();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &CornerMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by clers")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    writer.flush()?;
    Ok(())
}
