//! Offset-table resolution for mesh chunks and their sub-meshes.
//!
//! A chunk located by signature scan carries a small header (the only
//! little-endian fields in the format), an outer offset table, and a table of
//! sub-entries. Each sub-entry points, through one more level of indirection,
//! at a 0x34-byte descriptor giving the vertex-buffer layout and the
//! face-strip stream for one sub-mesh. All fixed skip amounts below are
//! bit-exact format constants.

use rootcause::Report;
use winnow::Parser;
use winnow::binary::be_u32;
use winnow::error::ContextError;
use winnow::token::take;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};

type WResult<T> = Result<T, winnow::error::ErrMode<ContextError>>;

/// Size of one entry in the sub-entry table.
pub const SUB_ENTRY_SIZE: usize = 0xC;

/// Size of the per-sub-mesh descriptor holding vertex layout and face stream
/// fields.
pub const SUB_MESH_DESC_SIZE: usize = 0x34;

/// Header of one mesh chunk. `face_data_offset` and `data_size` are the only
/// little-endian fields in the chunk; every other integer is big-endian.
#[derive(Debug, Clone)]
pub struct MeshChunkHeader {
    pub face_data_offset: u32,
    pub data_size: u32,
    /// Absolute position immediately after the two header fields. All
    /// chunk-internal offsets are relative to this.
    pub chunk_start: usize,
}

/// One entry of a chunk's sub-entry table.
#[derive(Debug, Clone)]
pub struct SubMeshEntry {
    pub table_index: usize,
    /// Offset read from the entry, relative to the chunk start.
    pub resolved_offset: u32,
}

/// Resolved vertex-buffer layout for one sub-mesh.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    pub total_size: u32,
    pub stride: u32,
    pub vertex_count: u32,
    /// Absolute offset of the first vertex record.
    pub vertex_start: usize,
}

/// Resolved face-index stream for one sub-mesh.
#[derive(Debug, Clone)]
pub struct FaceStream {
    /// Number of 16-bit indices (the raw byte count halved).
    pub index_count: u32,
    /// Absolute offset of the first index.
    pub face_start: usize,
}

/// Fully resolved byte ranges for one sub-mesh.
#[derive(Debug, Clone)]
pub struct SubMeshLocation {
    pub vertex_layout: VertexLayout,
    pub face_stream: FaceStream,
}

/// Read the chunk header following a signature match and walk the offset
/// tables to collect the sub-entry table.
///
/// `match_end` is the offset one past the signature; four bytes of the header
/// separate it from the two little-endian fields.
pub fn resolve_chunk(
    cursor: &mut ByteCursor<'_>,
    match_end: usize,
) -> DecodeResult<(MeshChunkHeader, Vec<SubMeshEntry>)> {
    cursor.seek(match_end + 4)?;
    let face_data_offset = cursor.read_u32_le()?;
    let data_size = cursor.read_u32_le()?;
    let chunk_start = cursor.position();

    cursor.skip(0x14)?;
    let table_count = cursor.read_u32_be()?;
    let sub_count = cursor.read_u32_be()?;

    // Outer-table entries are consumed only to land the cursor on the
    // sub-entry table.
    for _ in 0..table_count {
        cursor.skip(4)?;
        let _outer_offset = cursor.read_u32_be()?;
    }

    // The count is attacker-controlled bytes; make sure the table it claims
    // actually fits in the buffer before sizing any allocation by it.
    let sub_table_start = cursor.position();
    check_range(cursor, sub_table_start, sub_count as usize * SUB_ENTRY_SIZE)?;

    let mut entries = Vec::with_capacity(sub_count as usize);
    for table_index in 0..sub_count as usize {
        cursor.seek(sub_table_start + table_index * SUB_ENTRY_SIZE + 8)?;
        let resolved_offset = cursor.read_u32_be()?;
        entries.push(SubMeshEntry {
            table_index,
            resolved_offset,
        });
    }

    Ok((
        MeshChunkHeader {
            face_data_offset,
            data_size,
            chunk_start,
        },
        entries,
    ))
}

/// Fields of the 0x34-byte sub-mesh descriptor.
struct SubMeshFields {
    total_size: u32,
    stride: u32,
    vertex_start_rel: u32,
    raw_index_bytes: u32,
    face_start_rel: u32,
}

fn parse_sub_mesh_fields(input: &mut &[u8]) -> WResult<SubMeshFields> {
    let total_size = be_u32.parse_next(input)?;
    let stride = be_u32.parse_next(input)?;
    let _ = take(8usize).parse_next(input)?;
    let vertex_start_rel = be_u32.parse_next(input)?;
    let _ = take(0x14usize).parse_next(input)?;
    let raw_index_bytes = be_u32.parse_next(input)?;
    let _ = take(4usize).parse_next(input)?;
    let face_start_rel = be_u32.parse_next(input)?;
    Ok(SubMeshFields {
        total_size,
        stride,
        vertex_start_rel,
        raw_index_bytes,
        face_start_rel,
    })
}

/// Resolve one sub-entry to the absolute vertex-buffer and face-stream
/// ranges it points at.
///
/// Buffer positions are range-checked here so the strip and vertex decoders
/// can rely on their start offsets being inside the buffer.
pub fn resolve_sub_mesh(
    cursor: &mut ByteCursor<'_>,
    header: &MeshChunkHeader,
    entry: &SubMeshEntry,
) -> DecodeResult<SubMeshLocation> {
    cursor.seek(entry.resolved_offset as usize + header.chunk_start + 0xC)?;
    let descriptor_pos = cursor.read_u32_be()? as usize + header.chunk_start;
    cursor.seek(descriptor_pos)?;

    let input = &mut cursor.remaining();
    let fields = parse_sub_mesh_fields(input).map_err(|_| DecodeError::TruncatedData {
        offset: descriptor_pos,
        len: SUB_MESH_DESC_SIZE,
        buffer_len: cursor.len(),
    })?;

    // The trailing 8 bytes of every vertex record hold the UV pair, so a
    // stride that cannot contain them is as malformed as a non-exact division.
    if fields.stride < 8 || fields.total_size % fields.stride != 0 {
        return Err(Report::new(DecodeError::InvalidStride {
            total_size: fields.total_size,
            stride: fields.stride,
        }));
    }
    let vertex_count = fields.total_size / fields.stride;

    let data_base = header.face_data_offset as usize + header.chunk_start;
    let vertex_start = fields.vertex_start_rel as usize + data_base;
    let face_start = fields.face_start_rel as usize + data_base;
    let index_count = fields.raw_index_bytes / 2;

    check_range(cursor, vertex_start, fields.total_size as usize)?;
    check_range(cursor, face_start, index_count as usize * 2)?;

    Ok(SubMeshLocation {
        vertex_layout: VertexLayout {
            total_size: fields.total_size,
            stride: fields.stride,
            vertex_count,
            vertex_start,
        },
        face_stream: FaceStream {
            index_count,
            face_start,
        },
    })
}

fn check_range(cursor: &ByteCursor<'_>, start: usize, len: usize) -> DecodeResult<()> {
    let out_of_range = start
        .checked_add(len)
        .is_none_or(|end| end > cursor.len());
    if out_of_range {
        return Err(Report::new(DecodeError::OffsetOutOfRange {
            offset: start,
            buffer_len: cursor.len(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_header_fields_are_little_endian() {
        // match_end = 0; 4 skipped bytes, then the two LE fields, then the
        // 0x14-byte header region and the two BE counts.
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&0x100u32.to_le_bytes());
        data.extend_from_slice(&0x2000u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 0x14]);
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());

        let mut cursor = ByteCursor::new(&data);
        let (header, entries) = resolve_chunk(&mut cursor, 0).unwrap();
        assert_eq!(header.face_data_offset, 0x100);
        assert_eq!(header.data_size, 0x2000);
        assert_eq!(header.chunk_start, 12);
        assert!(entries.is_empty());
    }

    #[test]
    fn huge_sub_count_is_rejected_before_allocation() {
        // A sub_count far beyond what the buffer can hold must fail like any
        // other out-of-range offset rather than sizing an allocation from it.
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 0x14]);
        data.extend_from_slice(&0u32.to_be_bytes()); // table_count
        data.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes()); // sub_count
        assert_eq!(data.len(), 44);

        let mut cursor = ByteCursor::new(&data);
        let report = resolve_chunk(&mut cursor, 0).unwrap_err();
        assert!(report.to_string().contains("outside the buffer"));
    }

    #[test]
    fn truncated_chunk_header_is_an_error() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        assert!(resolve_chunk(&mut cursor, 0).is_err());
    }

    #[test]
    fn non_exact_stride_division_is_invalid() {
        // Descriptor directly at chunk_start, reached via a zero-offset
        // entry whose pointer block sits right before it.
        let chunk_start = 0usize;
        let mut data = Vec::new();
        // entry.resolved_offset + chunk_start + 0xC points here:
        data.extend_from_slice(&[0u8; 0xC]);
        data.extend_from_slice(&0x10u32.to_be_bytes()); // descriptor at 0x10
        data.extend_from_slice(&[
            0x00, 0x00, 0x00, 0x1D, // total_size = 29
            0x00, 0x00, 0x00, 0x1C, // stride = 28, 29 % 28 != 0
        ]);
        data.extend_from_slice(&[0u8; SUB_MESH_DESC_SIZE - 8]);

        let header = MeshChunkHeader {
            face_data_offset: 0,
            data_size: 0,
            chunk_start,
        };
        let entry = SubMeshEntry {
            table_index: 0,
            resolved_offset: 0,
        };
        let mut cursor = ByteCursor::new(&data);
        let report = resolve_sub_mesh(&mut cursor, &header, &entry).unwrap_err();
        assert!(report.to_string().contains("invalid vertex stride"));
    }

    #[test]
    fn out_of_range_vertex_buffer_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0u8; 0xC]);
        data.extend_from_slice(&0x10u32.to_be_bytes());
        let mut desc = Vec::new();
        desc.extend_from_slice(&28u32.to_be_bytes()); // total_size
        desc.extend_from_slice(&28u32.to_be_bytes()); // stride
        desc.extend_from_slice(&[0u8; 8]);
        desc.extend_from_slice(&0xFFFF_0000u32.to_be_bytes()); // vertex_start_rel, far outside
        desc.extend_from_slice(&[0u8; 0x14]);
        desc.extend_from_slice(&0u32.to_be_bytes()); // raw_index_bytes
        desc.extend_from_slice(&[0u8; 4]);
        desc.extend_from_slice(&0u32.to_be_bytes()); // face_start_rel
        assert_eq!(desc.len(), SUB_MESH_DESC_SIZE);
        data.extend_from_slice(&desc);

        let header = MeshChunkHeader {
            face_data_offset: 0,
            data_size: 0,
            chunk_start: 0,
        };
        let entry = SubMeshEntry {
            table_index: 0,
            resolved_offset: 0,
        };
        let mut cursor = ByteCursor::new(&data);
        let report = resolve_sub_mesh(&mut cursor, &header, &entry).unwrap_err();
        assert!(report.to_string().contains("outside the buffer"));
    }
}
