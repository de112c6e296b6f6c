//! Engine data structures.
//!
//! - `transform` holds position, rotation and scale of a node and the uniform derived from it
//! - `material` contains colours, draw order and stencil configuration
//! - `scene_graph` is the hierarchy loaded models end up in
//! - `model` contains the vertex layout and GPU buffers of a mesh
//! - `texture` wraps the depth/stencil attachment

pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
