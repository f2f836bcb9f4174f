//! Wireframe edge extraction.

use std::collections::BTreeSet;

/// Collect the undirected edges of every face into a flat line index list.
///
/// Each face contributes one edge per vertex (cyclic, last back to first).
/// Pairs are stored smaller index first and emitted in ascending order, so the
/// result does not depend on face order.
pub fn extract_edges<F>(faces: &[F]) -> Vec<u32>
where
    F: AsRef<[u32]>,
{
    let mut edges: BTreeSet<(u32, u32)> = BTreeSet::new();
    for face in faces {
        let face = face.as_ref();
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            edges.insert(if a > b { (b, a) } else { (a, b) });
        }
    }

    let mut out = Vec::with_capacity(edges.len() * 2);
    for (a, b) in edges {
        out.push(a);
        out.push(b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_has_three_sorted_edges() {
        assert_eq!(extract_edges(&[[0u32, 1, 2]]), vec![0, 1, 0, 2, 1, 2]);
    }

    #[test]
    fn quad_has_four_edges() {
        let edges = extract_edges(&[vec![0u32, 1, 2, 3]]);
        assert_eq!(edges, vec![0, 1, 0, 3, 1, 2, 2, 3]);
    }

    #[test]
    fn shared_edge_is_emitted_once() {
        // Two triangles of a square share the diagonal 0-2 in opposite order.
        let edges = extract_edges(&[[0u32, 1, 2], [2, 3, 0]]);
        assert_eq!(edges.len(), 5 * 2);
        let pairs: Vec<_> = edges.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        assert_eq!(pairs.iter().filter(|&&p| p == (0, 2)).count(), 1);
        assert!(pairs.iter().all(|&(a, b)| a <= b));
    }

    #[test]
    fn order_of_faces_does_not_matter() {
        let a = extract_edges(&[[0u32, 1, 2], [1, 3, 2], [3, 4, 2]]);
        let b = extract_edges(&[[3u32, 4, 2], [0, 1, 2], [1, 3, 2]]);
        assert_eq!(a, b);
    }

    #[test]
    fn no_faces_no_edges() {
        let faces: Vec<Vec<u32>> = Vec::new();
        assert!(extract_edges(&faces).is_empty());
    }
}
