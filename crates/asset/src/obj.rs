//! Minimal OBJ parser: vertex positions and faces only.
//!
//! Face tokens may carry texture/normal references (`1/2/3`, `1//3`); only the
//! position index before the first slash is read.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{AssetError, AssetResult},
    text,
};

/// One classified OBJ line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjLine<'a> {
    /// `v x y z`; holds everything after the tag.
    Vertex(&'a str),
    /// `f a b c ...`; holds everything after the tag.
    Face(&'a str),
    Comment,
    /// Blank lines and every directive we do not consume (`vn`, `vt`, `g`, ...).
    Other,
}

/// Classify a raw line by its leading directive.
pub fn classify_line(line: &str) -> ObjLine<'_> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return ObjLine::Comment;
    }
    let (tag, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    match tag {
        "v" => ObjLine::Vertex(rest.trim_start()),
        "f" => ObjLine::Face(rest.trim_start()),
        _ => ObjLine::Other,
    }
}

/// How faces with more than three vertices become triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Triangulation {
    /// Only the first three vertices form a triangle; the rest only add edges.
    #[default]
    FirstTriangle,
    /// Full fan around the first vertex.
    Fan,
}

/// Raw parse result, before edge extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjData {
    /// Positions, stride 3.
    pub vertices: Vec<f32>,
    /// Triangles, stride 3, 0-based.
    pub triangle_indices: Vec<u32>,
    /// Every accepted face as 0-based position indices, file order.
    pub faces: Vec<Vec<u32>>,
    /// Faces dropped for having fewer than three vertices.
    pub skipped_faces: usize,
}

impl ObjData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Load an OBJ file from a path.
///
/// Only a failure to open the file maps to [`AssetError::FileNotFound`] or
/// [`AssetError::Io`]; a failure while reading is [`AssetError::Read`].
pub fn load_obj_from_path(
    path: impl AsRef<Path>,
    triangulation: Triangulation,
) -> AssetResult<ObjData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::open(path, e))?;
    parse_obj(BufReader::new(file), triangulation)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(
    reader: R,
    triangulation: Triangulation,
) -> AssetResult<ObjData> {
    parse_obj(reader, triangulation)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, triangulation: Triangulation) -> AssetResult<ObjData> {
    parse_obj(io::Cursor::new(contents), triangulation)
}

/// A face as written: 1-based position indices plus its line.
struct RawFace {
    line_no: usize,
    indices: Vec<u32>,
}

fn parse_obj<R: BufRead>(reader: R, triangulation: Triangulation) -> AssetResult<ObjData> {
    let mut data = ObjData::default();
    let mut raw_faces = Vec::new();

    text::for_each_line(reader, |line_no, line| {
        let line = match line {
            Ok(line) => line,
            Err(bytes) => {
                // Undecodable comments and unknown directives are harmless.
                let what = match text::leading_tag(bytes) {
                    b"v" => "vertex line",
                    b"f" => "face line",
                    _ => return Ok(()),
                };
                return Err(AssetError::MalformedNumber {
                    line: line_no,
                    content: text::lossy(bytes).trim().to_owned(),
                    what,
                });
            }
        };

        match classify_line(line) {
            ObjLine::Vertex(rest) => {
                let mut parts = rest.split_whitespace();
                for what in ["x coordinate", "y coordinate", "z coordinate"] {
                    let value = parse_f32(parts.next(), line, line_no, what)?;
                    data.vertices.push(value);
                }
            }
            ObjLine::Face(rest) => {
                let indices = rest
                    .split_whitespace()
                    .map(|token| parse_face_index(token, line, line_no))
                    .collect::<AssetResult<Vec<u32>>>()?;
                raw_faces.push(RawFace { line_no, indices });
            }
            ObjLine::Comment | ObjLine::Other => {}
        }
        Ok(())
    })?;

    // Faces may reference vertices declared further down.
    let vertex_count = data.vertex_count();
    for RawFace { line_no, indices } in raw_faces {
        let face = indices
            .into_iter()
            .map(|raw| match raw.checked_sub(1) {
                Some(idx) if (idx as usize) < vertex_count => Ok(idx),
                _ => Err(AssetError::IndexOutOfBounds {
                    line: line_no,
                    index: u64::from(raw),
                    vertex_count,
                }),
            })
            .collect::<AssetResult<Vec<u32>>>()?;

        if face.len() < 3 {
            log::debug!(
                "Skipping degenerate face on line {} ({} vertices)",
                line_no,
                face.len()
            );
            data.skipped_faces += 1;
            continue;
        }

        match triangulation {
            Triangulation::FirstTriangle => {
                data.triangle_indices
                    .extend_from_slice(&[face[0], face[1], face[2]]);
            }
            Triangulation::Fan => {
                for tri in 1..(face.len() - 1) {
                    data.triangle_indices
                        .extend_from_slice(&[face[0], face[tri], face[tri + 1]]);
                }
            }
        }
        data.faces.push(face);
    }

    Ok(data)
}

fn parse_f32(value: Option<&str>, line: &str, line_no: usize, what: &'static str) -> AssetResult<f32> {
    let token = value.ok_or_else(|| AssetError::MissingValue {
        line: line_no,
        content: line.trim().to_owned(),
        what,
    })?;
    token.parse::<f32>().map_err(|_| AssetError::MalformedNumber {
        line: line_no,
        content: line.trim().to_owned(),
        what,
    })
}

/// Parse the position part of a face token; the result is still 1-based.
fn parse_face_index(token: &str, line: &str, line_no: usize) -> AssetResult<u32> {
    let position = token.split('/').next().unwrap_or(token);
    position
        .parse::<u32>()
        .map_err(|_| AssetError::MalformedNumber {
            line: line_no,
            content: line.trim().to_owned(),
            what: "face index",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn classify_directives() {
        assert_eq!(classify_line("v 1 2 3"), ObjLine::Vertex("1 2 3"));
        assert_eq!(classify_line("  f 1 2 3\r"), ObjLine::Face("1 2 3"));
        assert_eq!(classify_line("# f 1 2 3"), ObjLine::Comment);
        assert_eq!(classify_line("vn 0 0 1"), ObjLine::Other);
        assert_eq!(classify_line("vt 0 1"), ObjLine::Other);
        assert_eq!(classify_line("usemtl Blue"), ObjLine::Other);
        assert_eq!(classify_line(""), ObjLine::Other);
    }

    #[test]
    fn parse_simple_triangle() {
        let obj = load_obj_from_str(TRIANGLE, Triangulation::default()).expect("parse triangle");
        assert_eq!(obj.vertices, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(obj.triangle_indices, vec![0, 1, 2]);
        assert_eq!(obj.faces, vec![vec![0, 1, 2]]);
        assert_eq!(obj.skipped_faces, 0);
    }

    #[test]
    fn only_position_index_of_composite_tokens_is_used() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            f 1/1/1 2//1 3/1
        "#;
        let obj = load_obj_from_str(src, Triangulation::default()).expect("parse");
        assert_eq!(obj.triangle_indices, vec![0, 1, 2]);
    }

    #[test]
    fn quad_keeps_first_triangle_by_default() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let obj = load_obj_from_str(src, Triangulation::FirstTriangle).expect("parse");
        assert_eq!(obj.triangle_indices, vec![0, 1, 2]);
        assert_eq!(obj.faces, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn quad_fan_triangulation() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let obj = load_obj_from_str(src, Triangulation::Fan).expect("parse");
        assert_eq!(obj.triangle_indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn degenerate_face_is_counted_and_skipped() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\nf 1\n";
        let obj = load_obj_from_str(src, Triangulation::default()).expect("parse");
        assert!(obj.triangle_indices.is_empty());
        assert!(obj.faces.is_empty());
        assert_eq!(obj.skipped_faces, 2);
    }

    #[test]
    fn extra_vertex_component_is_ignored() {
        let obj = load_obj_from_str("v 1 2 3 1.0\n", Triangulation::default()).expect("parse");
        assert_eq!(obj.vertices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn malformed_coordinate_reports_line_and_content() {
        let err = load_obj_from_str("v 0 0 0\nv 1 oops 0\n", Triangulation::default())
            .expect_err("must fail");
        match err {
            AssetError::MalformedNumber { line, content, what } => {
                assert_eq!(line, 2);
                assert_eq!(content, "v 1 oops 0");
                assert_eq!(what, "y coordinate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_coordinate_is_an_error() {
        let err = load_obj_from_str("v 1 2\n", Triangulation::default()).expect_err("must fail");
        assert!(matches!(err, AssetError::MissingValue { line: 1, .. }));
    }

    #[test]
    fn malformed_face_index_fails() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 two 3\n";
        let err = load_obj_from_str(src, Triangulation::default()).expect_err("must fail");
        assert!(matches!(err, AssetError::MalformedNumber { line: 4, what: "face index", .. }));
    }

    #[test]
    fn negative_index_is_not_supported() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let err = load_obj_from_str(src, Triangulation::default()).expect_err("must fail");
        assert!(matches!(err, AssetError::MalformedNumber { .. }));
    }

    #[test]
    fn zero_and_out_of_range_indices_fail() {
        let zero = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n", Triangulation::default())
            .expect_err("index 0");
        assert!(matches!(
            zero,
            AssetError::IndexOutOfBounds { line: 4, index: 0, vertex_count: 3 }
        ));

        let past_end =
            load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n", Triangulation::default())
                .expect_err("index 4");
        assert!(matches!(past_end, AssetError::IndexOutOfBounds { index: 4, .. }));
    }

    #[test]
    fn faces_may_precede_their_vertices() {
        let src = "f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n";
        let obj = load_obj_from_str(src, Triangulation::default()).expect("parse");
        assert_eq!(obj.triangle_indices, vec![0, 1, 2]);
        assert_eq!(obj.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn out_of_range_index_reports_face_line_and_final_count() {
        let src = "v 0 0 0\nf 1 2 5\nv 1 0 0\nv 0 1 0\n";
        let err = load_obj_from_str(src, Triangulation::default()).expect_err("index 5");
        assert!(matches!(
            err,
            AssetError::IndexOutOfBounds { line: 2, index: 5, vertex_count: 3 }
        ));
    }

    #[test]
    fn non_utf8_comment_is_ignored() {
        let src: &[u8] = b"# Cr\xe9\xe9 par Blender\nv 0 0 0\nv 1 0 0\nv 0 1 0\ng pi\xe8ce\nf 1 2 3\n";
        let obj = load_obj_from_reader(io::Cursor::new(src), Triangulation::default())
            .expect("latin-1 comment");
        assert_eq!(obj.vertex_count(), 3);
        assert_eq!(obj.triangle_indices, vec![0, 1, 2]);
    }

    #[test]
    fn non_utf8_vertex_line_is_malformed() {
        let src: &[u8] = b"v 0 0 0\nv 1 \xff 0\n";
        let err = load_obj_from_reader(io::Cursor::new(src), Triangulation::default())
            .expect_err("must fail");
        assert!(matches!(err, AssetError::MalformedNumber { line: 2, what: "vertex line", .. }));
    }

    #[test]
    fn reader_failure_is_a_read_error() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
        }

        let err = load_obj_from_reader(io::BufReader::new(Broken), Triangulation::default())
            .expect_err("must fail");
        assert!(matches!(err, AssetError::Read { line: 1, .. }));
    }

    #[test]
    fn every_triangle_index_is_in_range() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\nf 2 4 3\n";
        let obj = load_obj_from_str(src, Triangulation::default()).expect("parse");
        assert!(obj.triangle_indices.iter().all(|&i| (i as usize) < obj.vertex_count()));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_obj_from_path("definitely/not/here.obj", Triangulation::default())
            .expect_err("must fail");
        assert!(err.is_not_found());
    }
}
