//! Interleaved vertex attribute decoding.
//!
//! Vertex records are `stride` bytes apart. The first 12 bytes are the
//! big-endian position; the last 8 bytes are the big-endian UV pair. Whatever
//! the format interleaves between them (normals, weights) is skipped. The V
//! coordinate is stored flipped relative to the file value.

use crate::chunk::VertexLayout;
use crate::cursor::ByteCursor;
use crate::error::DecodeResult;

/// A decoded vertex: position and texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Decode every vertex record described by `layout`.
pub fn decode_vertices(
    cursor: &mut ByteCursor<'_>,
    layout: &VertexLayout,
) -> DecodeResult<Vec<Vertex>> {
    let stride = layout.stride as usize;
    let mut vertices = Vec::with_capacity(layout.vertex_count as usize);

    for index in 0..layout.vertex_count as usize {
        let record_start = layout.vertex_start + index * stride;
        cursor.seek(record_start)?;
        let position = cursor.read_f32_be(3)?;

        cursor.seek(record_start + stride - 8)?;
        let uv = cursor.read_f32_be(2)?;

        vertices.push(Vertex {
            position: [position[0], position[1], position[2]],
            uv: [uv[0], 1.0 - uv[1]],
        });
    }

    Ok(vertices)
}
