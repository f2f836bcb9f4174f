//! Asset loading: OBJ geometry, wireframe edges and MTL diffuse color.

pub mod edges;
pub mod error;
pub mod loader;
pub mod mesh;
pub mod mtl;
pub mod obj;
mod text;

pub use error::{AssetError, AssetResult};
pub use loader::{
    LoadOptions, LoadStats, LoadedMesh, MaterialSource, MissingFilePolicy, load_mesh,
    load_mesh_from_str,
};
pub use mesh::{FALLBACK_COLOR, Mesh};
pub use obj::Triangulation;
