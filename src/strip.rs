//! Triangle-strip index decoding.
//!
//! Face data is stored as one flat stream of big-endian 16-bit indices.
//! The value `0xFFFF` is a restart sentinel separating strips; it is never a
//! vertex index. Each strip expands to a triangle list with alternating
//! winding so consecutive strip triangles keep a consistent facing.

use itertools::Itertools;

use crate::chunk::FaceStream;
use crate::cursor::ByteCursor;
use crate::error::DecodeResult;

/// Index value marking a strip restart.
pub const STRIP_RESTART: u16 = 0xFFFF;

/// A triangle's three vertex indices, local to its sub-mesh.
pub type Triangle = [u16; 3];

/// Read the full index stream for a sub-mesh.
pub fn read_indices(cursor: &mut ByteCursor<'_>, faces: &FaceStream) -> DecodeResult<Vec<u16>> {
    cursor.seek(faces.face_start)?;
    (0..faces.index_count)
        .map(|_| cursor.read_u16_be())
        .collect()
}

/// Split an index stream into strip segments at each restart sentinel.
/// Consecutive sentinels produce empty segments, which are discarded.
pub fn split_segments(indices: &[u16]) -> Vec<&[u16]> {
    indices
        .split(|&index| index == STRIP_RESTART)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Expand one strip segment into a triangle list.
///
/// A segment of length N yields N - 2 triangles. At step `x`, even steps emit
/// `(s[x+1], s[x+2], s[x])` and odd steps emit `(s[x+2], s[x+1], s[x])`,
/// undoing the strip's per-triangle winding flip. Segments shorter than 3
/// yield nothing.
pub fn strip_to_triangles(strip: &[u16]) -> Vec<Triangle> {
    strip
        .iter()
        .copied()
        .tuple_windows()
        .enumerate()
        .map(|(x, (a, b, c))| if x % 2 == 0 { [b, c, a] } else { [c, b, a] })
        .collect()
}

/// Read and expand every strip in a sub-mesh's face stream.
pub fn decode_triangles(
    cursor: &mut ByteCursor<'_>,
    faces: &FaceStream,
) -> DecodeResult<Vec<Triangle>> {
    let indices = read_indices(cursor, faces)?;
    Ok(split_segments(&indices)
        .into_iter()
        .flat_map(strip_to_triangles)
        .collect())
}
