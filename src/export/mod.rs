/// Wavefront OBJ materialization of decoded geometry.
pub mod obj;
