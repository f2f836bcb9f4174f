//! Core types: math re-exports, camera, rotation state, viewport.

pub use glam::{Mat4, Vec3, vec3};

pub mod camera;
pub mod error;
pub mod rotation;
pub mod viewport;

pub use error::{CoreError, CoreResult};
