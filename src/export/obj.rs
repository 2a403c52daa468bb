//! Wavefront OBJ output for decoded geometry records.
//!
//! This is host-adapter territory: the decoder hands over raw records and
//! the OBJ writer applies the fixed orientation correction the game's meshes
//! need, the same +90 degrees about X the original importer applied to every
//! object.

use std::io::Write;

use crate::assemble::GeometryRecord;

/// Rotate +90 degrees about the X axis: `(x, y, z) -> (x, -z, y)`.
fn orient(position: [f32; 3]) -> [f32; 3] {
    [position[0], -position[2], position[1]]
}

/// Write `records` as one OBJ document, one `o` block per record.
///
/// OBJ indexes vertices globally and 1-based, so each record's faces are
/// offset by the running vertex count of the records before it.
pub fn write_obj<W: Write>(out: &mut W, records: &[GeometryRecord]) -> std::io::Result<()> {
    let mut vertex_base = 1usize;
    for record in records {
        writeln!(out, "o {}", record.name)?;
        for vertex in &record.vertices {
            let [x, y, z] = orient(vertex.position);
            writeln!(out, "v {x} {y} {z}")?;
        }
        for vertex in &record.vertices {
            writeln!(out, "vt {} {}", vertex.uv[0], vertex.uv[1])?;
        }
        for triangle in &record.triangles {
            let a = triangle[0] as usize + vertex_base;
            let b = triangle[1] as usize + vertex_base;
            let c = triangle[2] as usize + vertex_base;
            writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }
        vertex_base += record.vertices.len();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::vertex::Vertex;

    use super::*;

    #[test]
    fn faces_use_global_one_based_indices() {
        let vertex = Vertex {
            position: [1.0, 2.0, 3.0],
            uv: [0.5, 0.5],
        };
        let records = vec![
            GeometryRecord {
                name: "Mesh_0_0".to_string(),
                vertices: vec![vertex; 3],
                triangles: vec![[0, 1, 2]],
            },
            GeometryRecord {
                name: "Mesh_0_1".to_string(),
                vertices: vec![vertex; 3],
                triangles: vec![[2, 1, 0]],
            },
        ];

        let mut out = Vec::new();
        write_obj(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Orientation correction: (1, 2, 3) -> (1, -3, 2).
        assert!(text.contains("v 1 -3 2"));
        assert!(text.contains("f 1/1 2/2 3/3"));
        // Second record's faces continue the global numbering.
        assert!(text.contains("f 6/6 5/5 4/4"));
    }
}
