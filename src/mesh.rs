//! Triangle meshes and the Wavefront OBJ loader.
//!
//! The loader recognizes the `v`, `vt`, `vn` and `f` directives and silently
//! skips everything else (comments, groups, material references, ...). Face
//! corners use the OBJ `vIdx[/[vtIdx][/vnIdx]]` form with 1-based indices,
//! which are rebased to 0-based on load. A file that cannot be opened yields
//! an empty mesh; malformed numeric tokens terminate the current line and
//! processing continues with the next one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// A polygonal face referencing mesh attribute arrays by index.
///
/// `positions` has one entry per corner. `texcoords` and `normals` are either
/// empty (the OBJ face carried no such references) or parallel to `positions`.
/// Indices are 0-based; out-of-range entries are tolerated and resolve to a
/// zero attribute at render time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub positions: Vec<usize>,
    pub texcoords: Vec<usize>,
    pub normals: Vec<usize>,
}

impl Face {
    /// Number of corners in this face.
    pub fn arity(&self) -> usize {
        self.positions.len()
    }
}

/// An indexed triangle mesh: attribute arrays plus faces referencing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mesh from a Wavefront OBJ file.
    ///
    /// A file that cannot be opened yields an empty mesh rather than an error;
    /// an empty mesh renders as a no-op.
    pub fn load<P: AsRef<Path>>(path: P) -> Mesh {
        match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(_) => Mesh::new(),
        }
    }

    /// Parse a mesh from any buffered OBJ text source.
    pub fn from_reader<R: BufRead>(reader: R) -> Mesh {
        let mut mesh = Mesh::new();

        for line in reader.lines() {
            let Ok(line) = line else { break };
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some("v") => {
                    let mut v = [0.0f32; 3];
                    parse_floats(tokens, &mut v);
                    mesh.vertices.push(Vec3::new(v[0], v[1], v[2]));
                }
                Some("vt") => {
                    let mut vt = [0.0f32; 2];
                    parse_floats(tokens, &mut vt);
                    mesh.texcoords.push(Vec2::new(vt[0], vt[1]));
                }
                Some("vn") => {
                    let mut vn = [0.0f32; 3];
                    parse_floats(tokens, &mut vn);
                    mesh.normals.push(Vec3::new(vn[0], vn[1], vn[2]));
                }
                Some("f") => {
                    mesh.faces.push(parse_face(tokens));
                }
                _ => {} // unknown directive, comment or blank line
            }
        }

        mesh
    }

    /// True when the mesh holds no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Fan-triangulate every face with more than three corners.
    ///
    /// Each n-gon becomes `n - 2` triangles sharing corner 0, preserving the
    /// per-corner texcoord/normal references when the source face carried a
    /// full set of them. Triangles pass through unchanged. The render pipeline
    /// consumes only 3-corner faces, so meshes with quads or n-gons should be
    /// run through this first.
    pub fn triangulated(&self) -> Mesh {
        let mut faces = Vec::with_capacity(self.faces.len());

        for face in &self.faces {
            let arity = face.arity();
            if arity <= 3 {
                faces.push(face.clone());
                continue;
            }

            let has_texcoords = face.texcoords.len() == arity;
            let has_normals = face.normals.len() == arity;

            for i in 1..arity - 1 {
                let corners = [0, i, i + 1];
                faces.push(Face {
                    positions: corners.iter().map(|&c| face.positions[c]).collect(),
                    texcoords: if has_texcoords {
                        corners.iter().map(|&c| face.texcoords[c]).collect()
                    } else {
                        Vec::new()
                    },
                    normals: if has_normals {
                        corners.iter().map(|&c| face.normals[c]).collect()
                    } else {
                        Vec::new()
                    },
                });
            }
        }

        Mesh {
            vertices: self.vertices.clone(),
            texcoords: self.texcoords.clone(),
            normals: self.normals.clone(),
            faces,
        }
    }
}

/// Fill `out` with floats parsed from consecutive tokens.
///
/// Parsing stops at the first missing or malformed token; remaining slots keep
/// their zero defaults, so a partially valid line still contributes an entry.
fn parse_floats<'a, I>(mut tokens: I, out: &mut [f32])
where
    I: Iterator<Item = &'a str>,
{
    for slot in out {
        match tokens.next().and_then(|t| t.parse().ok()) {
            Some(value) => *slot = value,
            None => break,
        }
    }
}

/// Parse the corner tokens of an `f` directive.
///
/// Each token reads up to three `/`-separated integers: position index,
/// then optionally texcoord and normal indices. A token whose position index
/// does not parse terminates the line; a missing or malformed texcoord/normal
/// reference just leaves that attribute out for the corner.
fn parse_face<'a, I>(tokens: I) -> Face
where
    I: Iterator<Item = &'a str>,
{
    let mut face = Face::default();

    for token in tokens {
        let mut indices = token
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<i64>());

        let Some(Ok(position)) = indices.next() else {
            break;
        };
        // OBJ indices start at 1; negative or zero values wrap out of range
        // and resolve to a zero attribute at render time.
        face.positions.push((position - 1) as usize);

        if let Some(Ok(texcoord)) = indices.next() {
            face.texcoords.push((texcoord - 1) as usize);

            if let Some(Ok(normal)) = indices.next() {
                face.normals.push((normal - 1) as usize);
            }
        }
    }

    face
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Mesh {
        Mesh::from_reader(Cursor::new(text))
    }

    #[test]
    fn parses_vertices_texcoords_normals_and_faces() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.texcoords.len(), 3);
        assert_eq!(mesh.normals.len(), 0);
        assert_eq!(mesh.faces.len(), 1);

        let face = &mesh.faces[0];
        assert_eq!(face.positions, vec![0, 1, 2]);
        assert_eq!(face.texcoords, vec![0, 1, 2]);
        assert_eq!(face.normals, Vec::<usize>::new());
    }

    #[test]
    fn line_counts_round_trip() {
        let mesh = parse(
            "v 1 2 3\nv 4 5 6\nv 7 8 9\nv 1 1 1\n\
             vt 0 0\nvt 1 1\n\
             vn 0 0 1\nvn 0 1 0\nvn 1 0 0\n\
             f 1 2 3\nf 2 3 4\n",
        );
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.texcoords.len(), 2);
        assert_eq!(mesh.normals.len(), 3);
        assert_eq!(mesh.faces.len(), 2);
    }

    #[test]
    fn full_corner_references_are_rebased() {
        let mesh = parse("f 1/2/3 4/5/6 7/8/9\n");
        let face = &mesh.faces[0];
        assert_eq!(face.positions, vec![0, 3, 6]);
        assert_eq!(face.texcoords, vec![1, 4, 7]);
        assert_eq!(face.normals, vec![2, 5, 8]);
    }

    #[test]
    fn empty_slots_collapse() {
        // With the slashes acting as plain separators, `a//b` reads two
        // integers: position a and second integer b.
        let mesh = parse("f 1//3 2//4 3//5\n");
        let face = &mesh.faces[0];
        assert_eq!(face.positions, vec![0, 1, 2]);
        assert_eq!(face.texcoords, vec![2, 3, 4]);
        assert_eq!(face.normals, Vec::<usize>::new());
    }

    #[test]
    fn unknown_directives_are_skipped() {
        let mesh = parse(
            "# a comment\no cube\ng side\ns off\nmtllib cube.mtl\nusemtl wood\nv 1 2 3\n",
        );
        assert_eq!(mesh.vertices.len(), 1);
        assert_eq!(mesh.vertices[0], Vec3::new(1.0, 2.0, 3.0));
        assert!(mesh.is_empty());
    }

    #[test]
    fn trailing_content_is_ignored() {
        let mesh = parse("v 1 2 3 1.0 extra\nvt 0.5 0.5 0.0\n");
        assert_eq!(mesh.vertices[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.texcoords[0], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn malformed_numbers_keep_parsed_prefix() {
        let mesh = parse("v 1 oops 2\nv 4 5 6\n");
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.vertices[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1], Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn malformed_face_token_terminates_the_line() {
        let mesh = parse("f 1 bad 3\nf 1 2 3\n");
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[0].positions, vec![0]);
        assert_eq!(mesh.faces[1].positions, vec![0, 1, 2]);
    }

    #[test]
    fn missing_file_yields_empty_mesh() {
        let mesh = Mesh::load("definitely/not/here.obj");
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn quads_fan_triangulate() {
        let mesh = parse("f 1/1/1 2/2/2 3/3/3 4/4/4\n").triangulated();
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[0].positions, vec![0, 1, 2]);
        assert_eq!(mesh.faces[1].positions, vec![0, 2, 3]);
        assert_eq!(mesh.faces[0].texcoords, vec![0, 1, 2]);
        assert_eq!(mesh.faces[1].normals, vec![0, 2, 3]);
    }

    #[test]
    fn triangulation_preserves_triangles() {
        let source = parse("f 1 2 3\nf 3 2 1\n");
        assert_eq!(source.triangulated(), source);
    }
}
