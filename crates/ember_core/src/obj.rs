//! Wavefront OBJ text parser.
//!
//! Only the subset the renderer needs: `v` lines define vertices, `f`
//! lines define faces. Face indices are 1-based, may carry `/`-suffixed
//! texture/normal references (ignored), and may be negative to count
//! backward from the current vertex count. Polygons with more than
//! three corners are fan-triangulated from the first corner.

use crate::Mesh;
use glam::Vec3;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from OBJ loading.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed vertex")]
    Vertex { line: usize },

    #[error("line {line}: face index {index} out of range (have {count} vertices)")]
    Index {
        line: usize,
        index: i64,
        count: usize,
    },
}

/// Load and parse an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::info!("Opened OBJ file: {}", path.display());
    parse_obj(&text)
}

/// Parse OBJ text into a mesh.
pub fn parse_obj(text: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = || -> Option<f32> { tokens.next()?.parse().ok() };
                let (x, y, z) = match (coord(), coord(), coord()) {
                    (Some(x), Some(y), Some(z)) => (x, y, z),
                    _ => return Err(ObjError::Vertex { line: line_no }),
                };
                positions.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let mut corners: Vec<usize> = Vec::new();
                for token in tokens {
                    // "7", "7/1" and "7/1/3" all name vertex 7
                    let vertex_ref = token.split('/').next().unwrap_or(token);
                    let index: i64 = match vertex_ref.parse() {
                        Ok(i) => i,
                        Err(_) => continue,
                    };

                    let resolved = if index < 0 {
                        positions.len() as i64 + index
                    } else {
                        index - 1
                    };

                    if resolved < 0 || resolved as usize >= positions.len() {
                        return Err(ObjError::Index {
                            line: line_no,
                            index,
                            count: positions.len(),
                        });
                    }
                    corners.push(resolved as usize);
                }

                // Fan triangulation (0, i, i+1) for polygons
                for i in 1..corners.len().saturating_sub(1) {
                    triangles.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {} // comments, normals, texcoords, groups
        }
    }

    Ok(Mesh::new(positions, triangles))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "\
# a unit quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";

    #[test]
    fn test_parse_vertices_and_fan() {
        let mesh = parse_obj(QUAD_OBJ).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        // One quad fan-triangulated into two triangles from corner 0
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_parse_slash_suffixed_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_parse_negative_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_parse_out_of_range_index() {
        let text = "v 0 0 0\nf 1 2 3\n";
        assert!(matches!(
            parse_obj(text),
            Err(ObjError::Index { index: 2, .. })
        ));
    }

    #[test]
    fn test_parse_malformed_vertex() {
        let text = "v 0 zero 0\n";
        assert!(matches!(parse_obj(text), Err(ObjError::Vertex { line: 1 })));
    }

    #[test]
    fn test_load_obj_missing_file() {
        assert!(matches!(
            load_obj("does/not/exist.obj"),
            Err(ObjError::Io(_))
        ));
    }

    #[test]
    fn test_skips_unknown_lines() {
        let text = "vn 0 1 0\nvt 0 0\ng group\nv 0 0 0\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.positions.len(), 1);
        assert!(mesh.triangles.is_empty());
    }
}
