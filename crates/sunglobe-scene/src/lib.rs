//! Sunglobe Scene - the parameters the renderer consumes
//!
//! The renderer itself (meshes, textures, shaders) lives outside this
//! workspace. This crate computes what it needs from the zone clock:
//! - Sun light position and the shader's sun direction
//! - The day/night blend weight used by the terminator shader
//! - Viewport-dependent globe layout and camera projection

pub mod camera;
pub mod sun;
pub mod vector;

pub use camera::*;
pub use sun::*;
pub use vector::*;
