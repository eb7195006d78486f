//! Connected components by edge adjacency.

use std::collections::VecDeque;

use crate::mesh::{CornerMesh, CornerTable, MeshIndex, TriangleId, VertexId};

/// Component label of every triangle.
#[derive(Debug, Clone)]
pub struct Components {
    labels: Vec<usize>,
    sizes: Vec<usize>,
}

impl Components {
    /// Number of components.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Component of a triangle.
    pub fn label<I: MeshIndex>(&self, t: TriangleId<I>) -> usize {
        self.labels[t.index()]
    }

    /// Per-triangle labels.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of triangles in each component.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Triangles of component `k`, in id order.
    pub fn triangles<I: MeshIndex>(&self, k: usize) -> Vec<TriangleId<I>> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == k)
            .map(|(t, _)| TriangleId::new(t))
            .collect()
    }
}

/// Label triangles that can reach each other across shared edges.
///
/// Components are numbered in order of their lowest triangle id.
pub fn connected_components<I: MeshIndex>(table: &CornerTable<I>) -> Components {
    let mut labels = vec![usize::MAX; table.num_triangles()];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();

    for start in table.triangle_ids() {
        if labels[start.index()] != usize::MAX {
            continue;
        }

        let label = sizes.len();
        let mut size = 0;
        labels[start.index()] = label;
        queue.push_back(start);

        while let Some(t) = queue.pop_front() {
            size += 1;
            for c in t.corners() {
                if table.is_border(c) {
                    continue;
                }
                let u = table.raw_opposite(c).triangle();
                if labels[u.index()] == usize::MAX {
                    labels[u.index()] = label;
                    queue.push_back(u);
                }
            }
        }

        sizes.push(size);
    }

    log::debug!("found {} component(s)", sizes.len());
    Components { labels, sizes }
}

/// Copy component `k` into its own mesh.
///
/// Returns the mesh and, for each of its vertices, the vertex of `mesh` it
/// came from. A vertex shared by two components is copied into both.
pub fn extract_component<I: MeshIndex>(
    mesh: &CornerMesh<I>,
    components: &Components,
    k: usize,
) -> (CornerMesh<I>, Vec<VertexId<I>>) {
    let mut part = mesh.clone();
    for t in mesh.table().triangle_ids() {
        if components.label(t) != k {
            part.hide(t);
        }
    }

    let remap = part.compact();
    let mut origin = vec![VertexId::invalid(); part.num_vertices()];
    for (old, new) in remap.iter().enumerate() {
        if let Some(new) = new {
            origin[new.index()] = VertexId::new(old);
        }
    }

    (part, origin)
}
