//! Decoder for the `.preinstanced` mesh containers used by The Simpsons
//! Game. Mesh chunks are located by signature scan, their offset tables
//! resolved, and their triangle-strip and interleaved vertex buffers decoded
//! into plain geometry records for a host to materialize.

/// Geometry record assembly and triangle-index validation.
pub mod assemble;
/// Mesh-chunk and sub-mesh offset-table resolution.
pub mod chunk;
/// Positioned reads over an immutable byte buffer.
pub mod cursor;
/// Whole-file decode driver.
pub mod decoder;
/// Error definitions.
pub mod error;
/// Materialization of decoded geometry for host tools.
#[cfg(feature = "obj")]
pub mod export;
/// Wildcard byte-signature scanning.
pub mod scan;
/// Triangle-strip segmentation and expansion.
pub mod strip;
/// Interleaved vertex attribute decoding.
pub mod vertex;

pub use assemble::GeometryRecord;
pub use decoder::{DecodeStats, DecodedMeshes, decode_buffer};
pub use error::{DecodeError, DecodeResult};
pub use strip::Triangle;
pub use vertex::Vertex;
