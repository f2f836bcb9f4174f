use std::path::PathBuf;

use asset::{LoadOptions, MaterialSource, load_mesh, mtl::DEFAULT_MATERIAL};

fn asset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../assets")
        .join(name)
}

#[test]
fn bundled_prism_loads() {
    let material = MaterialSource::new(asset_path("prism.mtl"), DEFAULT_MATERIAL);
    let loaded = load_mesh(asset_path("prism.obj"), Some(&material), LoadOptions::default())
        .expect("bundled prism");
    let mesh = &loaded.mesh;

    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.triangle_count(), 8);
    // 9 prism edges plus one diagonal per rectangular side.
    assert_eq!(mesh.edge_count(), 12);
    assert_eq!(mesh.color, [0.0, 0.0, 1.0]);
    assert!(loaded.stats.material_resolved);
    assert_eq!(loaded.stats.skipped_faces, 0);
    assert!(mesh.validate().is_ok());
}

#[test]
fn bundled_prism_edges_are_sorted_pairs() {
    let loaded = load_mesh(asset_path("prism.obj"), None, LoadOptions::default()).unwrap();
    let pairs: Vec<(u32, u32)> = loaded
        .mesh
        .edge_indices
        .chunks_exact(2)
        .map(|p| (p[0], p[1]))
        .collect();

    assert!(pairs.iter().all(|&(a, b)| a < b));
    assert!(pairs.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(pairs.first(), Some(&(0, 1)));
    assert_eq!(pairs.last(), Some(&(4, 5)));
}

#[test]
fn bundled_prism_red_material() {
    let material = MaterialSource::new(asset_path("prism.mtl"), "Red");
    let loaded = load_mesh(asset_path("prism.obj"), Some(&material), LoadOptions::default())
        .unwrap();
    assert_eq!(loaded.mesh.color, [1.0, 0.0, 0.0]);
}
