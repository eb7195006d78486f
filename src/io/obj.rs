//! Wavefront OBJ format support.
//!
//! Loading goes through `tobj`, which fan-triangulates polygons and resolves
//! negative (relative) indices. Only positions and faces are kept; normals,
//! texture coordinates and materials are ignored.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, CornerMesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// All objects and groups in the file are merged into one mesh.
///
/// # Example
///
/// ```no_run
/// use clers::io::obj;
/// use clers::mesh::CornerMesh;
///
/// let mesh: CornerMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<CornerMesh<I>> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let offset = positions.len();

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        triangles.extend(mesh.indices.chunks_exact(3).map(|t| {
            [
                offset + t[0] as usize,
                offset + t[1] as usize,
                offset + t[2] as usize,
            ]
        }));
    }

    if triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    log::debug!(
        "loaded {} vertices and {} triangles from {} object(s)",
        positions.len(),
        triangles.len(),
        models.len()
    );
    build_from_triangles(&positions, &triangles)
}

/// Save the visible triangles of a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use clers::io::obj;
/// use clers::mesh::CornerMesh;
///
/// # let mesh: CornerMesh = obj::load("model.obj").unwrap();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &CornerMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by clers")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;

    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    // OBJ indices are 1-based.
    for f in &faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clers-obj-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_save_load_round_trip() {
        let mesh = fixtures::octahedron();
        let path = temp_path("octahedron.obj");

        save(&mesh, &path).unwrap();
        let loaded: CornerMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), 6);
        assert_eq!(loaded.num_triangles(), 8);
        assert!(loaded.table().is_closed());

        // Vertices may be renumbered; match them by position.
        let original: Vec<usize> = loaded
            .geometry()
            .positions()
            .iter()
            .map(|p| {
                mesh.geometry()
                    .positions()
                    .iter()
                    .position(|q| q == p)
                    .unwrap()
            })
            .collect();
        let relabelled = fixtures::triangle_list(&loaded)
            .into_iter()
            .map(|t| [original[t[0]], original[t[1]], original[t[2]]]);
        assert_eq!(
            fixtures::canonical_triangles(relabelled),
            fixtures::canonical_triangles(fixtures::triangle_list(&mesh))
        );
    }

    #[test]
    fn test_polygons_and_negative_indices() {
        let path = temp_path("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 2 0 0\nv 2 1 0\nf 1 2 3 4\nf -5 -2 -1 -4\n",
        )
        .unwrap();

        let loaded: CornerMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), 6);
        assert_eq!(loaded.num_triangles(), 4);
        // The two quads share the edge 1-2.
        assert_eq!(loaded.table().border_corners().count(), 6);
    }

    #[test]
    fn test_no_faces() {
        let path = temp_path("points.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\n").unwrap();
        let result: Result<CornerMesh> = load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }
}
