//! Assembly of decoded vertices and triangles into geometry records.

use std::collections::HashSet;

use crate::strip::Triangle;
use crate::vertex::Vertex;

/// One decoded sub-mesh: the decoder's output unit. Records are independent
/// of their siblings and never merged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryRecord {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

/// Combine decoded data into a record, dropping any triangle that cannot
/// become a valid face: an index at or beyond the vertex count, fewer than
/// three distinct indices, or a vertex set another triangle in this record
/// already used. Strip stitching produces the degenerate and duplicate cases
/// routinely. Returns the record and the number of dropped triangles; a
/// dropped triangle is never replaced by a degenerate one.
pub fn assemble(
    name: String,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
) -> (GeometryRecord, usize) {
    let vertex_count = vertices.len();
    let mut dropped = 0usize;
    let mut seen = HashSet::new();
    let triangles: Vec<Triangle> = triangles
        .into_iter()
        .filter(|triangle| {
            let in_range = triangle.iter().all(|&index| (index as usize) < vertex_count);
            // Faces are keyed by vertex set, not winding, when deduplicating.
            let mut key = *triangle;
            key.sort_unstable();
            let distinct = key[0] != key[1] && key[1] != key[2];
            let keep = in_range && distinct && seen.insert(key);
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();

    if dropped > 0 {
        tracing::warn!(
            mesh = %name,
            dropped,
            "dropped out-of-range, degenerate, or duplicate triangles"
        );
    }

    (
        GeometryRecord {
            name,
            vertices,
            triangles,
        },
        dropped,
    )
}
