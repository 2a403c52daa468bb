//! Whole-file decode driver.
//!
//! Scans the buffer for mesh-chunk signatures and decodes every sub-mesh into
//! an independent [`GeometryRecord`]. A corrupt chunk or sub-mesh is logged,
//! counted, and skipped; it never aborts the rest of the file.

use crate::assemble::{self, GeometryRecord};
use crate::chunk::{self, MeshChunkHeader, SubMeshEntry};
use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::scan;
use crate::strip::{self, Triangle};
use crate::vertex::{self, Vertex};

/// Counters describing how much of a file decoded cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeStats {
    pub chunks_found: usize,
    pub sub_meshes_decoded: usize,
    pub sub_meshes_skipped: usize,
    pub triangles_dropped: usize,
}

/// The decoder's output: one record per successfully decoded sub-mesh, in
/// chunk-then-sub-mesh order, plus decode counters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedMeshes {
    pub records: Vec<GeometryRecord>,
    pub stats: DecodeStats,
}

/// Decode every mesh chunk found in `data`.
///
/// Pure and deterministic: the same bytes always produce the same records in
/// the same order.
pub fn decode_buffer(data: &[u8]) -> DecodedMeshes {
    let mut stats = DecodeStats::default();
    let mut records = Vec::new();
    let mut cursor = ByteCursor::new(data);

    for (chunk_index, match_end) in
        scan::find_all(data, &scan::MESH_CHUNK_SIGNATURE).enumerate()
    {
        stats.chunks_found += 1;

        let (header, entries) = match chunk::resolve_chunk(&mut cursor, match_end) {
            Ok(resolved) => resolved,
            Err(report) => {
                tracing::warn!(chunk_index, %report, "skipping chunk with unresolvable header");
                continue;
            }
        };
        tracing::debug!(
            chunk_index,
            chunk_start = header.chunk_start,
            sub_meshes = entries.len(),
            "resolved mesh chunk"
        );

        for entry in &entries {
            match decode_sub_mesh(&mut cursor, &header, entry) {
                Ok((vertices, triangles)) => {
                    let name = format!("Mesh_{chunk_index}_{}", entry.table_index);
                    let (record, dropped) = assemble::assemble(name, vertices, triangles);
                    stats.triangles_dropped += dropped;
                    stats.sub_meshes_decoded += 1;
                    records.push(record);
                }
                Err(report) => {
                    stats.sub_meshes_skipped += 1;
                    tracing::warn!(
                        chunk_index,
                        sub_mesh = entry.table_index,
                        %report,
                        "skipping sub-mesh"
                    );
                }
            }
        }
    }

    DecodedMeshes { records, stats }
}

fn decode_sub_mesh(
    cursor: &mut ByteCursor<'_>,
    header: &MeshChunkHeader,
    entry: &SubMeshEntry,
) -> DecodeResult<(Vec<Vertex>, Vec<Triangle>)> {
    let location = chunk::resolve_sub_mesh(cursor, header, entry)?;
    let triangles = strip::decode_triangles(cursor, &location.face_stream)?;
    let vertices = vertex::decode_vertices(cursor, &location.vertex_layout)?;
    Ok((vertices, triangles))
}
