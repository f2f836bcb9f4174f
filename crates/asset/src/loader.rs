//! Mesh loading front door: OBJ geometry + edge list + optional MTL color.

use std::path::{Path, PathBuf};

use crate::{
    edges::extract_edges,
    error::{AssetError, AssetResult},
    mesh::{FALLBACK_COLOR, Mesh},
    mtl,
    obj::{self, ObjData, Triangulation},
};

/// What to do when an input file cannot be opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingFilePolicy {
    /// Fail with [`AssetError::FileNotFound`] / [`AssetError::Io`].
    #[default]
    Error,
    /// Legacy behavior: missing OBJ gives an empty mesh, missing MTL gives the
    /// fallback color.
    Empty,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub triangulation: Triangulation,
    pub missing_file: MissingFilePolicy,
}

/// Companion MTL file and the material to pick from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialSource {
    pub path: PathBuf,
    pub name: String,
}

impl MaterialSource {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Diagnostics gathered while loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Faces with fewer than three vertices.
    pub skipped_faces: usize,
    /// `true` if the color came from an MTL block rather than the fallback.
    pub material_resolved: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedMesh {
    pub mesh: Mesh,
    pub stats: LoadStats,
}

/// Load a mesh from an OBJ path and, if given, color it from an MTL block.
pub fn load_mesh(
    obj_path: impl AsRef<Path>,
    material: Option<&MaterialSource>,
    options: LoadOptions,
) -> AssetResult<LoadedMesh> {
    let obj_path = obj_path.as_ref();
    log::info!("Loading mesh from {}", obj_path.display());

    let data = match obj::load_obj_from_path(obj_path, options.triangulation) {
        Ok(data) => data,
        // Open failures only; read errors are `Read` and always propagate.
        Err(err @ (AssetError::FileNotFound { .. } | AssetError::Io { .. }))
            if options.missing_file == MissingFilePolicy::Empty =>
        {
            log::warn!("{}; continuing with an empty mesh", err);
            ObjData::default()
        }
        Err(err) => return Err(err),
    };

    let (color, material_resolved) = match material {
        Some(source) => resolve_color(source, options.missing_file)?,
        None => (FALLBACK_COLOR, false),
    };

    let loaded = assemble(data, color, material_resolved)?;
    log::info!(
        "Loaded {}: {} vertices, {} triangles, {} edges, color {:?}",
        obj_path.display(),
        loaded.mesh.vertex_count(),
        loaded.mesh.triangle_count(),
        loaded.mesh.edge_count(),
        loaded.mesh.color
    );
    Ok(loaded)
}

/// Build a mesh from OBJ text with the fallback color.
pub fn load_mesh_from_str(contents: &str, options: LoadOptions) -> AssetResult<LoadedMesh> {
    let data = obj::load_obj_from_str(contents, options.triangulation)?;
    assemble(data, FALLBACK_COLOR, false)
}

fn resolve_color(
    source: &MaterialSource,
    policy: MissingFilePolicy,
) -> AssetResult<([f32; 3], bool)> {
    let file = match std::fs::File::open(&source.path) {
        Ok(file) => file,
        Err(e) => {
            let err = AssetError::open(&source.path, e);
            if policy == MissingFilePolicy::Empty {
                log::warn!("{}; using fallback color", err);
                return Ok((FALLBACK_COLOR, false));
            }
            return Err(err);
        }
    };

    match mtl::find_diffuse(std::io::BufReader::new(file), &source.name)? {
        Some(color) => Ok((color, true)),
        None => {
            log::warn!(
                "Material '{}' not found in {}; using fallback color",
                source.name,
                source.path.display()
            );
            Ok((FALLBACK_COLOR, false))
        }
    }
}

fn assemble(data: ObjData, color: [f32; 3], material_resolved: bool) -> AssetResult<LoadedMesh> {
    let count = data.vertex_count();
    if u32::try_from(count).is_err() {
        return Err(AssetError::TooManyVertices { count });
    }
    if data.skipped_faces > 0 {
        log::warn!("Skipped {} degenerate face(s)", data.skipped_faces);
    }

    let edge_indices = extract_edges(&data.faces);
    Ok(LoadedMesh {
        mesh: Mesh::new(data.vertices, data.triangle_indices, edge_indices, color),
        stats: LoadStats {
            skipped_faces: data.skipped_faces,
            material_resolved,
        },
    })
}
